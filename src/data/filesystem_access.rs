//! Well-known directories, with a `depth_layout` subdirectory for this crate's files.

use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum FsAccess {
    Home,
    Cache,
    Config,
    Current,
}

impl FsAccess {
    /// Retrieves the base path for the directory type, optionally appending the
    /// `depth_layout` subdirectory (`.depth_layout` under home).
    fn get_path(&self, raw: bool) -> anyhow::Result<PathBuf> {
        let base_path = match self {
            FsAccess::Home => dirs::home_dir(),
            FsAccess::Cache => dirs::cache_dir(),
            FsAccess::Config => dirs::config_dir(),
            FsAccess::Current => std::env::current_dir().ok(),
        };

        let mut path = base_path.ok_or_else(|| {
            anyhow::anyhow!("No {:?} directory on this platform.", self)
        })?;

        if !raw {
            if let FsAccess::Home = self {
                path.push(".depth_layout");
            } else {
                path.push("depth_layout");
            }
        }
        Ok(path)
    }

    /// Returns the crate directory, creating it if it does not exist.
    ///
    /// Examples:
    /// `~/.cache/depth_layout`, `~/.config/depth_layout`, `~/.depth_layout`.
    pub fn path(&self) -> anyhow::Result<PathBuf> {
        let d = self.get_path(false)?;
        Self::create_directory(&d)?;
        Ok(d)
    }

    /// Returns the directory without the crate subdirectory.
    pub fn raw_path(&self) -> anyhow::Result<PathBuf> {
        self.get_path(true)
    }

    /// Crate directory with `subs` appended, created if missing.
    ///
    /// Examples:
    /// `~/.cache/depth_layout/depth/coco`, `~/.config/depth_layout/presets`.
    pub fn path_with_subs(&self, subs: &[&str]) -> anyhow::Result<PathBuf> {
        let mut d = self.get_path(false)?;
        Self::append_subs(&mut d, subs)?;
        Ok(d)
    }

    fn append_subs(path: &mut PathBuf, subs: &[&str]) -> anyhow::Result<()> {
        for sub in subs {
            path.push(sub);
        }
        Self::create_directory(path)
    }

    fn create_directory(path: &Path) -> anyhow::Result<()> {
        if !path.exists() {
            std::fs::create_dir_all(path)?;
        }
        Ok(())
    }
}
