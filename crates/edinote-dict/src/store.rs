//! Dictionary stores: where the two tables' raw JSON comes from.
//!
//! Both tables are always fetched together, once, by the resolver. There is
//! no per-lookup fetching.

use crate::{DictError, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// File name of the structural dictionary inside a dictionary directory.
pub const SEGMENTS_FILE: &str = "x12_segments.json";

/// File name of the code-value dictionary inside a dictionary directory.
pub const CODE_VALUES_FILE: &str = "x12_code_values.json";

/// Source of raw dictionary JSON.
#[async_trait]
pub trait DictionaryStore: Send + Sync {
    async fn fetch_structural(&self) -> Result<Vec<u8>>;

    async fn fetch_code_values(&self) -> Result<Vec<u8>>;

    /// Short description for logs.
    fn describe(&self) -> String;
}

/// Reads `x12_segments.json` and `x12_code_values.json` from a directory.
#[derive(Debug, Clone)]
pub struct FsStore {
    dir: PathBuf,
}

impl FsStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    async fn read(&self, file: &str) -> Result<Vec<u8>> {
        let path = self.dir.join(file);
        tokio::fs::read(&path)
            .await
            .map_err(|source| DictError::Io { path, source })
    }
}

#[async_trait]
impl DictionaryStore for FsStore {
    async fn fetch_structural(&self) -> Result<Vec<u8>> {
        self.read(SEGMENTS_FILE).await
    }

    async fn fetch_code_values(&self) -> Result<Vec<u8>> {
        self.read(CODE_VALUES_FILE).await
    }

    fn describe(&self) -> String {
        format!("directory {}", self.dir.display())
    }
}

/// Starter dictionaries compiled into the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct BundledStore;

impl BundledStore {
    pub const STRUCTURAL: &'static [u8] = include_bytes!("../data/x12_segments.json");
    pub const CODE_VALUES: &'static [u8] = include_bytes!("../data/x12_code_values.json");
}

#[async_trait]
impl DictionaryStore for BundledStore {
    async fn fetch_structural(&self) -> Result<Vec<u8>> {
        Ok(Self::STRUCTURAL.to_vec())
    }

    async fn fetch_code_values(&self) -> Result<Vec<u8>> {
        Ok(Self::CODE_VALUES.to_vec())
    }

    fn describe(&self) -> String {
        "bundled dictionaries".to_string()
    }
}

/// In-memory store; a missing table behaves like an unreachable file.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    structural: Option<Vec<u8>>,
    code_values: Option<Vec<u8>>,
}

impl MemoryStore {
    pub fn new(structural: impl Into<Vec<u8>>, code_values: impl Into<Vec<u8>>) -> Self {
        Self {
            structural: Some(structural.into()),
            code_values: Some(code_values.into()),
        }
    }

    pub fn with_structural(mut self, structural: impl Into<Vec<u8>>) -> Self {
        self.structural = Some(structural.into());
        self
    }

    pub fn with_code_values(mut self, code_values: impl Into<Vec<u8>>) -> Self {
        self.code_values = Some(code_values.into());
        self
    }
}

#[async_trait]
impl DictionaryStore for MemoryStore {
    async fn fetch_structural(&self) -> Result<Vec<u8>> {
        self.structural
            .clone()
            .ok_or(DictError::Missing("structural"))
    }

    async fn fetch_code_values(&self) -> Result<Vec<u8>> {
        self.code_values
            .clone()
            .ok_or(DictError::Missing("code-value"))
    }

    fn describe(&self) -> String {
        "in-memory dictionaries".to_string()
    }
}
