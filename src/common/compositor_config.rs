use std::path::Path;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use crate::common::{BoxFormat, DepthConvention, LayoutError, ReferencePair, BACKGROUND_CLASS};
use crate::data::DatasetKind;

/// What a batch does with a sample that failed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchPolicy {
    #[default]
    SkipAndLog,
    Abort,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositorConfig {
    /// Must be set explicitly, there is no fallback.
    pub depth_convention: Option<DepthConvention>,
    pub reference_pair: Option<ReferencePair>,
    pub target_range: (f32, f32),
    pub num_obj: usize,
    pub background_class: u32,
    pub box_format: BoxFormat,
    pub resize_depth: bool,
    pub depth_dir: Option<String>,
    pub depth_suffix: String,
    pub batch_policy: BatchPolicy,
    pub profile: bool,
}

impl Default for CompositorConfig {
    fn default() -> Self {
        Self {
            depth_convention: None,
            reference_pair: None,
            target_range: (0., 1.),
            num_obj: DatasetKind::Coco.num_obj(),
            background_class: BACKGROUND_CLASS,
            box_format: BoxFormat::Xywh,
            resize_depth: false,
            depth_dir: None,
            depth_suffix: ".npy".to_string(),
            batch_policy: BatchPolicy::SkipAndLog,
            profile: false,
        }
    }
}

impl CompositorConfig {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("unable to read config {}", path.display()))?;
        let config = serde_json::from_str(&text)
            .with_context(|| format!("unable to parse config {}", path.display()))?;
        Ok(config)
    }

    pub fn with_depth_convention(mut self, x: DepthConvention) -> Self {
        self.depth_convention = Some(x);
        self
    }

    pub fn with_reference_pair(mut self, near: f32, far: f32) -> Self {
        self.reference_pair = Some(ReferencePair::new(near, far));
        self
    }

    pub fn with_target_range(mut self, lo: f32, hi: f32) -> Self {
        self.target_range = (lo, hi);
        self
    }

    pub fn with_num_obj(mut self, n: usize) -> Self {
        self.num_obj = n;
        self
    }

    pub fn with_dataset(mut self, kind: DatasetKind) -> Self {
        self.num_obj = kind.num_obj();
        self
    }

    pub fn with_background_class(mut self, class_id: u32) -> Self {
        self.background_class = class_id;
        self
    }

    pub fn with_box_format(mut self, x: BoxFormat) -> Self {
        self.box_format = x;
        self
    }

    pub fn with_resize_depth(mut self, x: bool) -> Self {
        self.resize_depth = x;
        self
    }

    pub fn with_depth_dir(mut self, dir: &str) -> Self {
        self.depth_dir = Some(dir.to_string());
        self
    }

    pub fn with_depth_suffix(mut self, suffix: &str) -> Self {
        self.depth_suffix = suffix.to_string();
        self
    }

    pub fn with_batch_policy(mut self, x: BatchPolicy) -> Self {
        self.batch_policy = x;
        self
    }

    pub fn with_profile(mut self, profile: bool) -> Self {
        self.profile = profile;
        self
    }

    /// Checks the settings that would otherwise corrupt every sample.
    ///
    /// Returns the declared depth convention.
    pub fn validate(&self) -> Result<DepthConvention, LayoutError> {
        let convention = self.depth_convention.ok_or_else(|| {
            LayoutError::InvalidDepthConvention(
                "depth_convention is not set (expected `nearer_higher` or `nearer_lower`)".to_string(),
            )
        })?;

        if let Some(pair) = &self.reference_pair {
            convention.check_reference(pair)?;
        }

        let (lo, hi) = self.target_range;
        if !lo.is_finite() || !hi.is_finite() || lo >= hi {
            return Err(LayoutError::InvalidConfig(format!(
                "target range ({lo}, {hi}) must be finite and increasing"
            )));
        }

        Ok(convention)
    }

    pub fn to_string(&self) -> String {
        format!("Depth Convention: {}\n\
        Reference Pair: {:?}\n\
        Target Range: {:?}\n\
        Max Objects: {}\n\
        Background Class: {}\n\
        Box Format: {}\n\
        Resize Depth: {}\n\
        Depth Dir: {}\n\
        Depth Suffix: {}\n\
        Batch Policy: {:?}",
                self.depth_convention.map(|c| c.as_str()).unwrap_or("<unset>"),
                self.reference_pair, self.target_range, self.num_obj,
                self.background_class, self.box_format.as_str(), self.resize_depth,
                self.depth_dir.as_deref().unwrap_or("<default>"),
                self.depth_suffix, self.batch_policy)
    }
}
