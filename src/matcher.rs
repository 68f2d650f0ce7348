use crate::library::{ActionId, GestureKind, GestureLibrarySnapshot};
use crate::optimize::{find_repeating_pattern, OptimizedStroke};

/// Match an optimized stroke against the library.
///
/// Repeating entries are tried first, against the stroke's minimal
/// repeating unit: the one the optimizer detected, or failing that one
/// found fresh in the sequence. Simple entries are then tried against
/// the full sequence by exact same-length equality. Entries are scanned
/// in the snapshot's stable order and the first hit wins. Pure function
/// of its two inputs.
pub fn match_gesture(
    stroke: &OptimizedStroke,
    library: &GestureLibrarySnapshot,
) -> Option<ActionId> {
    if stroke.directions.is_empty() {
        return None;
    }

    let repeat_unit = stroke.repeat_unit.clone().or_else(|| {
        find_repeating_pattern(&stroke.directions)
            .map(|repeat| stroke.directions[..repeat.unit_len].to_vec())
    });

    if let Some(unit) = repeat_unit {
        for entry in library.entries() {
            if !entry.enabled || entry.kind != GestureKind::Repeating {
                continue;
            }
            if entry.pattern.canonical() == unit {
                tracing::debug!(name = %entry.name, "matched repeating gesture");
                return Some(entry.action.clone());
            }
        }
    }

    for entry in library.entries() {
        if !entry.enabled || entry.kind != GestureKind::Simple {
            continue;
        }
        let pattern = entry.pattern.canonical();
        if pattern.len() == stroke.directions.len() && pattern == stroke.directions {
            tracing::debug!(name = %entry.name, "matched simple gesture");
            return Some(entry.action.clone());
        }
    }

    tracing::debug!(directions = ?stroke.directions, "no gesture matched");
    None
}
