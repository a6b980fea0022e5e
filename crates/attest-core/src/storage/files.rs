use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};

/// Object-storage collaborator. Paths are opaque keys chosen by the intake
/// layer; implementations decide where the bytes actually live.
#[async_trait]
pub trait FileStore: Send + Sync {
    async fn store(&self, path: &str, bytes: &[u8], content_type: &str) -> anyhow::Result<()>;
    async fn fetch(&self, path: &str) -> anyhow::Result<Vec<u8>>;
    async fn remove(&self, path: &str) -> anyhow::Result<()>;
    /// Best-effort download URL; `None` when the backend cannot produce one.
    /// TTL is advisory for the filesystem backend.
    async fn signed_url(&self, path: &str, ttl_secs: u64) -> Option<String>;
}

/// Filesystem-rooted store.
pub struct LocalFileStore {
    root: PathBuf,
}

impl LocalFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    // Keys must stay inside the root.
    fn resolve(&self, key: &str) -> anyhow::Result<PathBuf> {
        let rel = Path::new(key);
        if rel.is_absolute()
            || rel
                .components()
                .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_)))
        {
            anyhow::bail!("invalid object key: {}", key);
        }
        Ok(self.root.join(rel))
    }
}

#[async_trait]
impl FileStore for LocalFileStore {
    async fn store(&self, path: &str, bytes: &[u8], _content_type: &str) -> anyhow::Result<()> {
        let full = self.resolve(path)?;
        if let Some(parent) = full.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&full, bytes).await?;
        Ok(())
    }

    async fn fetch(&self, path: &str) -> anyhow::Result<Vec<u8>> {
        let full = self.resolve(path)?;
        Ok(tokio::fs::read(&full).await?)
    }

    async fn remove(&self, path: &str) -> anyhow::Result<()> {
        let full = self.resolve(path)?;
        tokio::fs::remove_file(&full).await?;
        Ok(())
    }

    async fn signed_url(&self, path: &str, _ttl_secs: u64) -> Option<String> {
        let full = self.resolve(path).ok()?;
        if tokio::fs::try_exists(&full).await.unwrap_or(false) {
            Some(format!("file://{}", full.display()))
        } else {
            None
        }
    }
}
