//! Output vault directory layout.

use std::io;
use std::path::{Component, Path, PathBuf};

use crate::entities::EntityKind;

/// Folder (under the vault root) receiving emblem images.
pub const EMBLEM_FOLDER: &str = "emblems";

/// Sub-folder of a burg's asset directory receiving MFCG exports.
pub const MFCG_FOLDER: &str = "mfcg";

/// The output vault: a root directory plus the fixed folder scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultLayout {
    root: PathBuf,
}

impl VaultLayout {
    /// Creates a layout rooted at `root`. Nothing is created on disk.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The vault root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Names of every folder in the skeleton.
    pub fn folders() -> impl Iterator<Item = &'static str> {
        EntityKind::ALL
            .into_iter()
            .map(EntityKind::folder)
            .chain(std::iter::once(EMBLEM_FOLDER))
    }

    /// Creates the folder skeleton. Existing folders are left alone.
    ///
    /// # Errors
    ///
    /// Returns an error if a folder cannot be created.
    pub fn ensure(&self) -> io::Result<()> {
        for folder in Self::folders() {
            std::fs::create_dir_all(self.root.join(folder))?;
        }
        Ok(())
    }

    /// Folder holding documents of `kind`.
    #[must_use]
    pub fn kind_dir(&self, kind: EntityKind) -> PathBuf {
        self.root.join(kind.folder())
    }

    /// Path of the document with the given stem.
    #[must_use]
    pub fn document_path(&self, kind: EntityKind, stem: &str) -> PathBuf {
        self.kind_dir(kind).join(format!("{stem}.md"))
    }

    /// Folder receiving emblem images.
    #[must_use]
    pub fn emblem_dir(&self) -> PathBuf {
        self.root.join(EMBLEM_FOLDER)
    }

    /// Per-entity folder receiving MFCG assets.
    #[must_use]
    pub fn asset_dir(&self, kind: EntityKind, stem: &str) -> PathBuf {
        self.kind_dir(kind).join(stem).join(MFCG_FOLDER)
    }

    /// Vault-relative form of `path` with `/` separators, or `None` when
    /// `path` lies outside the vault.
    #[must_use]
    pub fn relative(&self, path: &Path) -> Option<String> {
        let rel = path.strip_prefix(&self.root).ok()?;
        let parts: Vec<String> = rel
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join("/"))
        }
    }
}
