use std::path::{Component, Path, PathBuf};

use anyhow::{anyhow, Result};
use log::debug;

/// Turns a resource name into a readable file path.
pub trait ResolvePath {
    fn resolve(&self, name: &str) -> Result<PathBuf>;
}

impl<R: ResolvePath + ?Sized> ResolvePath for &R {
    fn resolve(&self, name: &str) -> Result<PathBuf> {
        (**self).resolve(name)
    }
}

/// Resources living under a single search root on the filesystem.
///
/// Nothing is indexed up front, every [`Resources::get_path`] call looks at the
/// filesystem again, so files that show up later can still be found.
#[derive(Clone, Debug)]
pub struct Resources {
    root: PathBuf,
}

impl Resources {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn get_path(&self, name: &str) -> Result<PathBuf> {
        let relative = Path::new(name);
        // only plain names below the root, no `..` or absolute paths
        let plain = !name.is_empty()
            && relative
                .components()
                .all(|component| matches!(component, Component::Normal(_)));
        if !plain {
            return Err(anyhow!("Resource name '{}' is not a relative path.", name));
        }

        let path = self.root.join(relative);
        if !path.is_file() {
            return Err(anyhow!(
                "Resource '{}' doesn't exist under {}.",
                name,
                self.root.display()
            ));
        }
        debug!("resolved resource {} to {}", name, path.display());
        Ok(path)
    }
}

impl ResolvePath for Resources {
    fn resolve(&self, name: &str) -> Result<PathBuf> {
        self.get_path(name)
    }
}
