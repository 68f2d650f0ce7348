use crate::direction::Direction8;
use crate::library::{GestureKind, GestureLibrarySnapshot};
use std::collections::HashMap;

/// Health summary of a library snapshot, for diagnostics surfaces.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LibraryStats {
    pub disabled_entries: usize,
    pub empty_patterns: usize,
    /// Groups of enabled entries sharing the same kind and canonical
    /// pattern; only the first of each group can ever match.
    pub duplicate_patterns: usize,
}

pub fn library_stats(snapshot: &GestureLibrarySnapshot) -> LibraryStats {
    let mut stats = LibraryStats::default();
    let mut seen: HashMap<(GestureKind, Vec<Direction8>), usize> = HashMap::new();

    for entry in snapshot.entries() {
        if !entry.enabled {
            stats.disabled_entries += 1;
            continue;
        }
        let canonical = entry.pattern.canonical();
        if canonical.is_empty() {
            stats.empty_patterns += 1;
        }
        *seen.entry((entry.kind, canonical)).or_insert(0) += 1;
    }
    stats.duplicate_patterns = seen.values().filter(|&&count| count > 1).count();
    stats
}
