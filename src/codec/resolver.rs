use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use crate::item::IconHandle;

/// Maps an icon name found in CSV to an icon handle
pub trait ResourceResolver {
    /// Returns None when no such icon exists
    fn resolve(&self, name: &str) -> Option<IconHandle>;
}

impl<F> ResourceResolver for F
where
    F: Fn(&str) -> Option<IconHandle>,
{
    fn resolve(&self, name: &str) -> Option<IconHandle> {
        self(name)
    }
}

/// Resolver that knows no icons; every icon field decodes as None
pub struct NoIcons;

impl ResourceResolver for NoIcons {
    fn resolve(&self, _name: &str) -> Option<IconHandle> {
        None
    }
}

/// Resolves icon names against image files in a directory
///
/// A name resolves when a file with that stem exists, whatever its
/// extension (`Ironhelm` matches `Ironhelm.png`).
pub struct IconDirectory {
    directory: PathBuf,
}

impl IconDirectory {
    pub fn new(directory: impl AsRef<Path>) -> Self {
        IconDirectory {
            directory: directory.as_ref().to_path_buf(),
        }
    }
}

impl ResourceResolver for IconDirectory {
    fn resolve(&self, name: &str) -> Option<IconHandle> {
        let entries = match fs::read_dir(&self.directory) {
            Ok(entries) => entries,
            Err(e) => {
                debug!(dir = %self.directory.display(), error = %e, "icon directory unreadable");
                return None;
            }
        };

        let found = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .any(|path| {
                path.is_file() && path.file_stem().and_then(|s| s.to_str()) == Some(name)
            });

        if found {
            Some(IconHandle::new(name))
        } else {
            debug!(icon = name, "icon not found");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_resolver() {
        let resolver = |name: &str| (name == "helm").then(|| IconHandle::new(name));
        assert_eq!(resolver.resolve("helm"), Some(IconHandle::new("helm")));
        assert_eq!(resolver.resolve("boots"), None);
    }

    #[test]
    fn test_icon_directory_matches_file_stem() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Ironhelm.png"), b"png").unwrap();

        let resolver = IconDirectory::new(dir.path());
        assert_eq!(resolver.resolve("Ironhelm"), Some(IconHandle::new("Ironhelm")));
        assert_eq!(resolver.resolve("ironhelm"), None);
        assert_eq!(resolver.resolve("Boots"), None);
    }

    #[test]
    fn test_icon_directory_missing_dir() {
        let resolver = IconDirectory::new("/definitely/not/here");
        assert_eq!(resolver.resolve("Ironhelm"), None);
    }
}
