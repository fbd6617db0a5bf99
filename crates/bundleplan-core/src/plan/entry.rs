//! Entry points and output naming.

use crate::error::PlanError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Placeholder substituted with the entry name in output filenames.
pub const NAME_PLACEHOLDER: &str = "[name]";

/// A named source file that becomes one output bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub name: String,
    /// Source path, relative to the plan context.
    pub source: String,
}

/// Ordered entry table with unique, non-empty names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Entry>", into = "Vec<Entry>")]
pub struct EntryMap {
    entries: Vec<Entry>,
}

impl EntryMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from `(name, source)` pairs, rejecting bad names.
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self, PlanError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut map = Self::new();
        for (name, source) in pairs {
            map.insert(name, source)?;
        }
        Ok(map)
    }

    /// Append an entry.
    ///
    /// Fails on an empty name or a name that is already present; the table
    /// is left unchanged in that case.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        source: impl Into<String>,
    ) -> Result<(), PlanError> {
        let name = name.into();
        let source = source.into();
        if name.trim().is_empty() {
            return Err(PlanError::EmptyEntryName { source_path: source });
        }
        if self.get(&name).is_some() {
            return Err(PlanError::DuplicateEntry { name });
        }
        self.entries.push(Entry { name, source });
        Ok(())
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TryFrom<Vec<Entry>> for EntryMap {
    type Error = PlanError;

    fn try_from(entries: Vec<Entry>) -> Result<Self, Self::Error> {
        let mut map = Self::new();
        for entry in entries {
            map.insert(entry.name, entry.source)?;
        }
        Ok(map)
    }
}

impl From<EntryMap> for Vec<Entry> {
    fn from(map: EntryMap) -> Self {
        map.entries
    }
}

/// Where and how bundles are written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputConfig {
    /// Output directory.
    pub path: PathBuf,
    /// URL prefix under which outputs are served.
    pub public_path: String,
    /// Filename template containing [`NAME_PLACEHOLDER`].
    pub filename: String,
}

impl OutputConfig {
    /// Output filename for the entry called `name`.
    #[must_use]
    pub fn filename_for(&self, name: &str) -> String {
        self.filename.replace(NAME_PLACEHOLDER, name)
    }
}
