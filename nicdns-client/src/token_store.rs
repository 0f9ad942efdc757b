//! Token store implementations

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use async_trait::async_trait;

use crate::error::{ClientError, Result};
use crate::traits::TokenStore;
use crate::types::{TokenCacheKey, TokenState};
use crate::utils::json_file::{from_json_bytes, to_indented_json};

/// Stores each token in `~{service}-{zone}.json` under a directory.
///
/// The default directory is the process working directory, so every client
/// started from the same place reuses the same token.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    dir: PathBuf,
}

impl FileTokenStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Full path of the cache file for `key`.
    pub fn path_for(&self, key: &TokenCacheKey) -> PathBuf {
        self.dir.join(key.file_name())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl Default for FileTokenStore {
    fn default() -> Self {
        Self::new(".")
    }
}

fn store_error(path: &Path, detail: impl std::fmt::Display) -> ClientError {
    ClientError::TokenStoreError {
        detail: format!("{}: {detail}", path.display()),
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn load(&self, key: &TokenCacheKey) -> Result<Option<TokenState>> {
        let path = self.path_for(key);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(store_error(&path, e)),
        };
        from_json_bytes(&bytes)
            .map(Some)
            .map_err(|e| store_error(&path, e))
    }

    async fn save(&self, key: &TokenCacheKey, state: &TokenState) -> Result<()> {
        let path = self.path_for(key);
        let bytes = to_indented_json(state).map_err(|e| store_error(&path, e))?;
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| store_error(&path, e))
    }
}

/// Keeps tokens in memory for the lifetime of the store.
///
/// Share one instance (behind an `Arc`) between managers to get the same
/// handoff the file store gives separate processes.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    tokens: RwLock<HashMap<TokenCacheKey, TokenState>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached tokens.
    pub fn len(&self) -> usize {
        self.tokens.read().map_or(0, |tokens| tokens.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn load(&self, key: &TokenCacheKey) -> Result<Option<TokenState>> {
        let tokens = self.tokens.read().map_err(|e| ClientError::TokenStoreError {
            detail: e.to_string(),
        })?;
        Ok(tokens.get(key).cloned())
    }

    async fn save(&self, key: &TokenCacheKey, state: &TokenState) -> Result<()> {
        let mut tokens = self.tokens.write().map_err(|e| ClientError::TokenStoreError {
            detail: e.to_string(),
        })?;
        tokens.insert(key.clone(), state.clone());
        Ok(())
    }
}
