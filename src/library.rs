use crate::direction::Direction8;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, Mutex};

pub const LIBRARY_FILE: &str = "gestures.json";
pub const SCHEMA_VERSION: u32 = 1;

/// Opaque action payload attached to a gesture. The core returns it
/// verbatim on a match and never interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionId(pub String);

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ActionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureKind {
    #[default]
    Simple,
    Repeating,
}

/// A gesture pattern as authored: either a list of direction names or a
/// string of arrow symbols. Every comparison goes through the canonical
/// direction sequence, so the two encodings are interchangeable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PatternSpec {
    Sequence(Vec<Direction8>),
    Symbols(String),
}

impl PatternSpec {
    /// The canonical direction sequence this pattern denotes.
    pub fn canonical(&self) -> Vec<Direction8> {
        match self {
            PatternSpec::Sequence(directions) => directions.clone(),
            PatternSpec::Symbols(symbols) => symbols
                .chars()
                .filter_map(Direction8::from_symbol)
                .collect(),
        }
    }

    /// Whether every character of a symbol encoding is a known arrow.
    /// Name-list patterns are validated by deserialization already.
    pub fn is_well_formed(&self) -> bool {
        match self {
            PatternSpec::Sequence(_) => true,
            PatternSpec::Symbols(symbols) => {
                symbols.chars().all(|c| Direction8::from_symbol(c).is_some())
            }
        }
    }
}

impl PartialEq for PatternSpec {
    fn eq(&self, other: &Self) -> bool {
        self.canonical() == other.canonical()
    }
}

impl Eq for PatternSpec {}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GestureEntry {
    pub name: String,
    pub pattern: PatternSpec,
    pub action: ActionId,
    #[serde(default)]
    pub kind: GestureKind,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

/// An immutable point-in-time view of the gesture library. Built once by
/// the external loader and swapped in whole; the core never mutates it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GestureLibrarySnapshot {
    entries: Vec<GestureEntry>,
}

impl GestureLibrarySnapshot {
    pub fn from_entries(entries: Vec<GestureEntry>) -> Self {
        Self { entries }
    }

    /// Entries in their stable (insertion) order.
    pub fn entries(&self) -> &[GestureEntry] {
        &self.entries
    }

    pub fn get(&self, name: &str) -> Option<&GestureEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Handle the service and the parse tasks share: the inner `Arc` is
/// swapped whole under the mutex, so a reader cloning it can never
/// observe a partially updated library.
pub type SharedLibrary = Arc<Mutex<Arc<GestureLibrarySnapshot>>>;

/// On-disk form of the library, schema-gated like the other data files.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct GestureLibraryFile {
    #[serde(default = "default_schema_version")]
    schema_version: u32,
    #[serde(default)]
    gestures: Vec<GestureEntry>,
}

pub fn load_library(path: &str) -> anyhow::Result<GestureLibrarySnapshot> {
    let content = std::fs::read_to_string(path).unwrap_or_default();
    if content.trim().is_empty() {
        return Ok(GestureLibrarySnapshot::default());
    }
    let file: GestureLibraryFile = serde_json::from_str(&content)?;
    if file.schema_version != SCHEMA_VERSION {
        return Err(anyhow::anyhow!(
            "Unsupported gesture library schema version {}",
            file.schema_version
        ));
    }
    for entry in &file.gestures {
        if !entry.pattern.is_well_formed() {
            return Err(anyhow::anyhow!(
                "Gesture '{}' contains an unknown direction symbol",
                entry.name
            ));
        }
    }
    Ok(GestureLibrarySnapshot::from_entries(file.gestures))
}

pub fn save_library(path: &str, snapshot: &GestureLibrarySnapshot) -> anyhow::Result<()> {
    let file = GestureLibraryFile {
        schema_version: SCHEMA_VERSION,
        gestures: snapshot.entries().to_vec(),
    };
    let json = serde_json::to_string_pretty(&file)?;
    std::fs::write(path, json)?;
    Ok(())
}

fn default_enabled() -> bool {
    true
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}
