//! Asset resolution
//!
//! Images are resolved by name before the loop starts. Any failure aborts
//! startup; the simulation itself never touches assets.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::AssetError;

/// Images every session needs
pub const REQUIRED_ASSETS: [&str; 5] = ["background", "player", "enemy", "bullet", "power_up"];

/// A resolved image resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetHandle {
    pub name: String,
    /// Encoded image size in bytes
    pub byte_len: usize,
}

/// Resolves named image resources
pub trait AssetLoader {
    fn load(&mut self, name: &str) -> Result<AssetHandle, AssetError>;
}

/// Resolved assets, keyed by name
#[derive(Debug, Clone, Default)]
pub struct Assets {
    handles: HashMap<String, AssetHandle>,
}

impl Assets {
    /// Resolve every name, failing on the first error
    pub fn load_all<'a>(
        loader: &mut dyn AssetLoader,
        names: impl IntoIterator<Item = &'a str>,
    ) -> Result<Self, AssetError> {
        let mut handles = HashMap::new();
        for name in names {
            let handle = loader.load(name)?;
            log::debug!("Loaded asset `{}` ({} bytes)", name, handle.byte_len);
            handles.insert(name.to_string(), handle);
        }
        log::info!("Loaded {} assets", handles.len());
        Ok(Self { handles })
    }

    pub fn get(&self, name: &str) -> Option<&AssetHandle> {
        self.handles.get(name)
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

/// In-memory loader for headless runs and tests
#[derive(Debug, Clone, Default)]
pub struct MemoryAssets {
    images: HashMap<String, Vec<u8>>,
}

impl MemoryAssets {
    /// A loader that provides a placeholder for every required asset
    pub fn placeholders() -> Self {
        let mut assets = Self::default();
        for name in REQUIRED_ASSETS {
            assets.insert(name, Vec::new());
        }
        assets
    }

    pub fn insert(&mut self, name: impl Into<String>, bytes: Vec<u8>) {
        self.images.insert(name.into(), bytes);
    }
}

impl AssetLoader for MemoryAssets {
    fn load(&mut self, name: &str) -> Result<AssetHandle, AssetError> {
        let bytes = self.images.get(name).ok_or_else(|| AssetError::Missing {
            name: name.to_string(),
        })?;
        Ok(AssetHandle {
            name: name.to_string(),
            byte_len: bytes.len(),
        })
    }
}

/// Loads `<root>/<name>.png` from disk
#[derive(Debug, Clone)]
pub struct DirAssets {
    root: PathBuf,
}

impl DirAssets {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.png"))
    }
}

impl AssetLoader for DirAssets {
    fn load(&mut self, name: &str) -> Result<AssetHandle, AssetError> {
        let path = self.path_for(name);
        let bytes = std::fs::read(&path).map_err(|source| AssetError::Io {
            name: name.to_string(),
            path: path.clone(),
            source,
        })?;
        Ok(AssetHandle {
            name: name.to_string(),
            byte_len: bytes.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholders_cover_required() {
        let mut loader = MemoryAssets::placeholders();
        let assets = Assets::load_all(&mut loader, REQUIRED_ASSETS).unwrap();
        assert_eq!(assets.len(), REQUIRED_ASSETS.len());
        assert!(assets.get("player").is_some());
    }

    #[test]
    fn test_missing_asset_fails() {
        let mut loader = MemoryAssets::default();
        loader.insert("player", vec![1, 2, 3]);
        let err = Assets::load_all(&mut loader, ["player", "enemy"]).unwrap_err();
        assert!(matches!(err, AssetError::Missing { ref name } if name == "enemy"));
    }

    #[test]
    fn test_dir_loader_reports_path() {
        let mut loader = DirAssets::new("/nonexistent/asset/dir");
        let err = loader.load("player").unwrap_err();
        match err {
            AssetError::Io { name, path, .. } => {
                assert_eq!(name, "player");
                assert!(path.ends_with("player.png"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
