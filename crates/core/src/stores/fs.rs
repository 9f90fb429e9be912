use crate::error::StoreError;
use crate::traits::DocumentStore;
use async_trait::async_trait;
use std::io;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

pub const DEFAULT_EXTENSIONS: [&str; 3] = ["md", "txt", "rst"];

/// Text documents under a root directory, identified by their
/// `/`-separated path relative to that root.
#[derive(Debug, Clone)]
pub struct FsDocumentStore {
    root: PathBuf,
    extensions: Vec<String>,
}

impl FsDocumentStore {
    pub fn new(root: impl AsRef<Path>) -> Result<Self, StoreError> {
        let root = root.as_ref();
        let canonical = root.canonicalize().map_err(|source| io_error(root, source))?;
        if !canonical.is_dir() {
            return Err(StoreError::NotFound(root.display().to_string()));
        }

        Ok(Self {
            root: canonical,
            extensions: DEFAULT_EXTENSIONS.iter().map(|ext| ext.to_string()).collect(),
        })
    }

    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Joins `id` onto the root, refusing anything that could leave it.
    fn resolve(&self, id: &str) -> Result<PathBuf, StoreError> {
        let relative = Path::new(id);
        let escapes = relative.is_absolute()
            || relative.components().any(|component| {
                matches!(
                    component,
                    Component::ParentDir | Component::RootDir | Component::Prefix(_)
                )
            });
        if escapes || id.trim().is_empty() {
            return Err(StoreError::AccessDenied(id.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

pub fn discover_documents(root: &Path, extensions: &[String]) -> Vec<String> {
    let mut ids = Vec::new();

    for entry in WalkDir::new(root)
        .into_iter()
        .filter_map(|item| item.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }

        let wanted = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| extensions.iter().any(|known| known.eq_ignore_ascii_case(ext)));
        if !wanted {
            continue;
        }

        if let Ok(relative) = entry.path().strip_prefix(root) {
            let id: Vec<String> = relative
                .components()
                .map(|component| component.as_os_str().to_string_lossy().into_owned())
                .collect();
            ids.push(id.join("/"));
        }
    }

    ids.sort_unstable();
    ids
}

fn io_error(path: &Path, source: io::Error) -> StoreError {
    if source.kind() == io::ErrorKind::NotFound {
        StoreError::NotFound(path.display().to_string())
    } else {
        StoreError::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

#[async_trait]
impl DocumentStore for FsDocumentStore {
    async fn list(&self) -> Result<Vec<String>, StoreError> {
        let root = self.root.clone();
        let extensions = self.extensions.clone();
        tokio::task::spawn_blocking(move || discover_documents(&root, &extensions))
            .await
            .map_err(|error| StoreError::Io {
                path: self.root.display().to_string(),
                source: io::Error::other(error),
            })
    }

    async fn read(&self, id: &str) -> Result<String, StoreError> {
        let joined = self.resolve(id)?;
        let canonical = tokio::fs::canonicalize(&joined).await.map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                StoreError::NotFound(id.to_string())
            } else {
                io_error(&joined, source)
            }
        })?;
        // Symlinks can still point outside the root.
        if !canonical.starts_with(&self.root) {
            return Err(StoreError::AccessDenied(id.to_string()));
        }

        let metadata = tokio::fs::metadata(&canonical)
            .await
            .map_err(|source| io_error(&canonical, source))?;
        if !metadata.is_file() {
            return Err(StoreError::NotFound(id.to_string()));
        }

        let bytes = tokio::fs::read(&canonical)
            .await
            .map_err(|source| io_error(&canonical, source))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;
    use std::fs;

    fn seeded_root() -> Result<tempfile::TempDir, Box<dyn Error>> {
        let dir = tempfile::tempdir()?;
        fs::create_dir_all(dir.path().join("guides/deep"))?;
        fs::write(dir.path().join("readme.md"), "# Readme\nHello.")?;
        fs::write(dir.path().join("guides/setup.TXT"), "Setup notes.")?;
        fs::write(dir.path().join("guides/deep/api.rst"), "API")?;
        fs::write(dir.path().join("guides/logo.png"), [0u8, 1, 2])?;
        Ok(dir)
    }

    #[tokio::test]
    async fn lists_text_documents_with_relative_ids() -> Result<(), Box<dyn Error>> {
        let dir = seeded_root()?;
        let store = FsDocumentStore::new(dir.path())?;
        assert_eq!(
            store.list().await?,
            vec![
                "guides/deep/api.rst".to_string(),
                "guides/setup.TXT".to_string(),
                "readme.md".to_string(),
            ]
        );

        let markdown_only = FsDocumentStore::new(dir.path())?.with_extensions(["md"]);
        assert_eq!(markdown_only.list().await?, vec!["readme.md".to_string()]);
        Ok(())
    }

    #[tokio::test]
    async fn reads_documents_and_reports_missing() -> Result<(), Box<dyn Error>> {
        let dir = seeded_root()?;
        let store = FsDocumentStore::new(dir.path())?;
        assert_eq!(store.read("guides/setup.TXT").await?, "Setup notes.");
        assert!(matches!(store.read("nope.md").await, Err(StoreError::NotFound(_))));
        assert!(matches!(store.read("guides").await, Err(StoreError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn escapes_are_denied() -> Result<(), Box<dyn Error>> {
        let dir = seeded_root()?;
        let store = FsDocumentStore::new(dir.path().join("guides"))?;
        assert!(matches!(store.read("../readme.md").await, Err(StoreError::AccessDenied(_))));
        assert!(matches!(store.read("deep/../../readme.md").await, Err(StoreError::AccessDenied(_))));

        let absolute = dir.path().join("readme.md");
        let absolute = absolute.to_string_lossy();
        assert!(matches!(store.read(&absolute).await, Err(StoreError::AccessDenied(_))));
        Ok(())
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn symlinks_out_of_root_are_denied() -> Result<(), Box<dyn Error>> {
        let dir = seeded_root()?;
        let outside = tempfile::tempdir()?;
        fs::write(outside.path().join("secret.md"), "secret")?;
        std::os::unix::fs::symlink(outside.path().join("secret.md"), dir.path().join("link.md"))?;

        let store = FsDocumentStore::new(dir.path())?;
        assert!(matches!(store.read("link.md").await, Err(StoreError::AccessDenied(_))));
        Ok(())
    }

    #[test]
    fn missing_root_is_not_found() {
        let result = FsDocumentStore::new("/definitely/not/a/docnav/root");
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[test]
    fn invalid_utf8_is_decoded_lossily() -> Result<(), Box<dyn Error>> {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join("bad.md"), [b'o', b'k', 0xff])?;
        let store = FsDocumentStore::new(dir.path())?;
        let runtime = tokio::runtime::Runtime::new()?;
        let text = runtime.block_on(store.read("bad.md"))?;
        assert_eq!(text, "ok\u{fffd}");
        Ok(())
    }
}
