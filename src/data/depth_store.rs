//! Filename-addressed depth map caches.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use ndarray::Array2;
use ndarray_npy::{read_npy, write_npy, ReadNpyError};
use parking_lot::RwLock;
use crate::common::{DepthMap, LayoutError};
use crate::data::FsAccess;
use crate::Result;

/// Lookup of precomputed depth maps by image filename.
pub trait DepthStore {
    /// Loads the depth map cached for `filename`, or fails with
    /// [`LayoutError::MissingDepthMap`].
    fn load(&self, filename: &str) -> Result<Arc<DepthMap>>;

    fn contains(&self, filename: &str) -> bool;
}

/// Directory of NumPy `.npy` files, one per image, named `<filename><suffix>`.
#[derive(Debug, Clone)]
pub struct NpyDepthStore {
    root: PathBuf,
    suffix: String,
}

impl NpyDepthStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            suffix: ".npy".to_string(),
        }
    }

    /// Store under `~/.cache/depth_layout/depth/<subs...>`.
    pub fn default_cache(subs: &[&str]) -> anyhow::Result<Self> {
        let mut dirs = vec!["depth"];
        dirs.extend_from_slice(subs);
        Ok(Self::new(FsAccess::Cache.path_with_subs(&dirs)?))
    }

    pub fn with_suffix(mut self, suffix: &str) -> Self {
        self.suffix = suffix.to_string();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, filename: &str) -> PathBuf {
        self.root.join(format!("{}{}", filename, self.suffix))
    }

    /// Writes `map` as a `float32` array, creating the directory if needed.
    pub fn save(&self, filename: &str, map: &DepthMap) -> Result<PathBuf> {
        let path = self.path_for(filename);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        write_npy(&path, &map.depth).map_err(|source| LayoutError::DepthEncode {
            path: path.clone(),
            source,
        })?;
        log::debug!("Saved depth map {} ({}x{})", path.display(), map.height(), map.width());
        Ok(path)
    }
}

impl DepthStore for NpyDepthStore {
    fn load(&self, filename: &str) -> Result<Arc<DepthMap>> {
        let path = self.path_for(filename);
        if !path.is_file() {
            return Err(LayoutError::MissingDepthMap {
                filename: filename.to_string(),
            });
        }

        // numpy saves float64 unless told otherwise
        let depth = match read_npy::<_, Array2<f32>>(&path) {
            Ok(depth) => DepthMap::from(depth),
            Err(ReadNpyError::WrongDescriptor(_)) => {
                let depth = read_npy::<_, Array2<f64>>(&path)
                    .map_err(|source| LayoutError::DepthDecode { path: path.clone(), source })?;
                DepthMap::from(depth)
            }
            Err(source) => return Err(LayoutError::DepthDecode { path, source }),
        };

        log::trace!("Loaded depth map {} ({}x{})", path.display(), depth.height(), depth.width());
        Ok(Arc::new(depth))
    }

    fn contains(&self, filename: &str) -> bool {
        self.path_for(filename).is_file()
    }
}

/// In-process store, shareable across batch workers.
#[derive(Debug, Default)]
pub struct MemoryDepthStore {
    maps: RwLock<HashMap<String, Arc<DepthMap>>>,
}

impl MemoryDepthStore {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn insert(&self, filename: &str, map: DepthMap) -> Option<Arc<DepthMap>> {
        self.maps.write().insert(filename.to_string(), Arc::new(map))
    }

    pub fn remove(&self, filename: &str) -> Option<Arc<DepthMap>> {
        self.maps.write().remove(filename)
    }

    pub fn len(&self) -> usize {
        self.maps.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.maps.read().is_empty()
    }
}

impl DepthStore for MemoryDepthStore {
    fn load(&self, filename: &str) -> Result<Arc<DepthMap>> {
        self.maps
            .read()
            .get(filename)
            .cloned()
            .ok_or_else(|| LayoutError::MissingDepthMap {
                filename: filename.to_string(),
            })
    }

    fn contains(&self, filename: &str) -> bool {
        self.maps.read().contains_key(filename)
    }
}
