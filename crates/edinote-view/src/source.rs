//! User-selected EDI files.

use crate::{Result, ViewError};
use std::path::Path;

/// Accepted file extensions, compared case-insensitively.
pub const SUPPORTED_EXTENSIONS: &[&str] = &[".edi", ".out", ".int", ".in"];

pub fn is_supported_file(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    SUPPORTED_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub name: String,
    pub content: String,
}

/// Loaded files, in load order, unique by name.
#[derive(Debug, Clone, Default)]
pub struct FileSource {
    files: Vec<SourceFile>,
}

impl FileSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: impl Into<String>, content: impl Into<String>) -> Result<&SourceFile> {
        let name = name.into();
        if !is_supported_file(&name) {
            return Err(ViewError::UnsupportedFileType { name });
        }
        if self.contains(&name) {
            return Err(ViewError::DuplicateFile(name));
        }
        self.files.push(SourceFile {
            name,
            content: content.into(),
        });
        Ok(&self.files[self.files.len() - 1])
    }

    /// Read `path` from disk and add it under its file name.
    pub fn add_path(&mut self, path: &Path) -> Result<&SourceFile> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        if !is_supported_file(&name) {
            return Err(ViewError::UnsupportedFileType { name });
        }
        let content = std::fs::read_to_string(path).map_err(|source| ViewError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.add(name, content)
    }

    /// Add every acceptable file, skipping unsupported and duplicate ones.
    /// Returns the names that were added.
    pub fn add_all<I, N, C>(&mut self, files: I) -> Vec<String>
    where
        I: IntoIterator<Item = (N, C)>,
        N: Into<String>,
        C: Into<String>,
    {
        let mut added = Vec::new();
        for (name, content) in files {
            match self.add(name, content) {
                Ok(file) => added.push(file.name.clone()),
                Err(err) => tracing::debug!(error = %err, "skipping file"),
            }
        }
        added
    }

    pub fn remove(&mut self, name: &str) -> Option<SourceFile> {
        let index = self.files.iter().position(|f| f.name == name)?;
        Some(self.files.remove(index))
    }

    pub fn get(&self, name: &str) -> Option<&SourceFile> {
        self.files.iter().find(|f| f.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SourceFile> {
        self.files.iter()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
