use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetKind {
    #[default]
    Coco,
    #[serde(alias = "vg")]
    VisualGenome,
}

impl DatasetKind {
    pub fn from_str(dataset: &str) -> Option<Self> {
        match dataset.to_lowercase().as_str() {
            "coco" => Some(DatasetKind::Coco),
            "vg" | "visual_genome" => Some(DatasetKind::VisualGenome),
            _ => None,
        }
    }

    /// Short name used in directory names.
    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetKind::Coco => "coco",
            DatasetKind::VisualGenome => "vg",
        }
    }

    /// Number of object classes, background included.
    pub fn num_classes(&self) -> usize {
        match self {
            DatasetKind::Coco => 184,
            DatasetKind::VisualGenome => 179,
        }
    }

    /// Object slots per layout.
    pub fn num_obj(&self) -> usize {
        match self {
            DatasetKind::Coco => 8,
            DatasetKind::VisualGenome => 31,
        }
    }

    /// Conventional depth cache directory: `<root>/datasets/<dataset>-depth/<split>`.
    pub fn depth_dir(&self, root: impl AsRef<Path>, split: Split) -> PathBuf {
        root.as_ref()
            .join("datasets")
            .join(format!("{}-depth", self.as_str()))
            .join(split.as_str())
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Split {
    #[default]
    Train,
    Val,
    Test,
}

impl Split {
    pub fn from_str(split: &str) -> Option<Self> {
        match split.to_lowercase().as_str() {
            "train" => Some(Split::Train),
            "val" => Some(Split::Val),
            "test" => Some(Split::Test),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Val => "val",
            Split::Test => "test",
        }
    }
}
