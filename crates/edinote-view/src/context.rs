//! Files selected as assistant context.

use crate::source::FileSource;
use crate::{Result, ViewError};
use edinote_summary::ContextFile;

pub const MAX_CONTEXT_FILES: usize = 5;

/// Ordered set of file names, at most [`MAX_CONTEXT_FILES`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextSelection {
    names: Vec<String>,
}

impl ContextSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a loaded file. Selecting an already selected file is a no-op.
    pub fn select(&mut self, source: &FileSource, name: &str) -> Result<()> {
        if !source.contains(name) {
            return Err(ViewError::UnknownFile(name.to_string()));
        }
        if self.is_selected(name) {
            return Ok(());
        }
        if self.names.len() >= MAX_CONTEXT_FILES {
            return Err(ViewError::ContextLimit {
                max: MAX_CONTEXT_FILES,
            });
        }
        self.names.push(name.to_string());
        Ok(())
    }

    pub fn deselect(&mut self, name: &str) -> bool {
        let before = self.names.len();
        self.names.retain(|n| n != name);
        self.names.len() != before
    }

    pub fn is_selected(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Selected files still present in `source`, in selection order.
    pub fn files(&self, source: &FileSource) -> Vec<ContextFile> {
        self.names
            .iter()
            .filter_map(|name| source.get(name))
            .map(|f| ContextFile::new(f.name.clone(), f.content.clone()))
            .collect()
    }
}
