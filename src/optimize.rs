use crate::config::ParserConfig;
use crate::direction::{classify_vector, Direction8};
use crate::segment::Segment;

/// A repeating sub-pattern found at the head of a direction sequence:
/// the first `unit_len` directions repeat exactly, covering the first
/// `span_len` elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepeatingPattern {
    pub unit_len: usize,
    pub span_len: usize,
}

/// The optimizer's output: the final direction sequence plus the
/// minimal repeating unit found during repeat collapse, if any. The
/// unit is carried separately because endpoint reinforcement may thin
/// the sequence past the point where the repetition is still visible
/// in it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OptimizedStroke {
    pub directions: Vec<Direction8>,
    pub repeat_unit: Option<Vec<Direction8>>,
}

impl OptimizedStroke {
    /// Wrap a bare sequence with no repeat annotation; the matcher will
    /// run its own repeat detection over it.
    pub fn from_directions(directions: Vec<Direction8>) -> Self {
        Self {
            directions,
            repeat_unit: None,
        }
    }
}

/// Reduce a segment list to the final direction sequence: merge short
/// segments into their successors, identify cyclic repeats, then drop
/// interior directions too close to either endpoint.
pub fn optimize_segments(segments: &[Segment], config: &ParserConfig) -> OptimizedStroke {
    if segments.is_empty() {
        return OptimizedStroke::default();
    }

    let median = length_median(segments);
    tracing::debug!(median, count = segments.len(), "optimizing segments");

    // Pass 1: fold short runs into their successor. The merged direction
    // is re-classified from the length-weighted unit-vector sum, not an
    // angle average, so it stays consistent with stride classification.
    let mut merged: Vec<Segment> = Vec::new();
    let mut running = segments[0];
    for &next in &segments[1..] {
        if running.length < config.merge_threshold
            && running.direction.angular_difference(next.direction) < 90.0
        {
            let (rx, ry) = running.direction.unit_vector();
            let (nx, ny) = next.direction.unit_vector();
            let sum_x = rx * running.length + nx * next.length;
            let sum_y = ry * running.length + ny * next.length;
            tracing::debug!(a = ?running.direction, b = ?next.direction, "merging short segment");
            running = Segment {
                direction: classify_vector(sum_x, sum_y),
                length: running.length + next.length,
            };
        } else {
            merged.push(running);
            running = next;
        }
    }
    merged.push(running);

    // Pass 2: identify minimal repeating units. The spans are kept
    // as-is; the first unit found is recorded for the matcher, which
    // checks repeating gestures before simple ones.
    let directions: Vec<Direction8> = merged.iter().map(|s| s.direction).collect();
    let mut repeat_unit: Option<Vec<Direction8>> = None;
    let mut collapsed = Vec::with_capacity(directions.len());
    let mut i = 0;
    while i < directions.len() {
        if let Some(repeat) = find_repeating_pattern(&directions[i..]) {
            if repeat_unit.is_none() {
                repeat_unit = Some(directions[i..i + repeat.unit_len].to_vec());
            }
            collapsed.extend_from_slice(&directions[i..i + repeat.span_len]);
            i += repeat.span_len;
        } else {
            collapsed.push(directions[i]);
            i += 1;
        }
    }

    // Pass 3: endpoint reinforcement. Interior directions within 45
    // degrees of either endpoint are start/end wobble and carry no
    // information.
    if collapsed.len() > 2 {
        let first = collapsed[0];
        let last = collapsed[collapsed.len() - 1];
        let mut reinforced = Vec::with_capacity(collapsed.len());
        reinforced.push(first);
        reinforced.extend(
            collapsed[1..collapsed.len() - 1]
                .iter()
                .copied()
                .filter(|dir| {
                    dir.angular_difference(first) > 45.0 && dir.angular_difference(last) > 45.0
                }),
        );
        reinforced.push(last);
        collapsed = reinforced;
    }

    tracing::debug!(directions = ?collapsed, repeat = ?repeat_unit, "optimized direction sequence");
    OptimizedStroke {
        directions: collapsed,
        repeat_unit,
    }
}

/// Find the shortest repeating unit at the head of `directions`.
///
/// Units of length `2..min(6, n/2)` are tried in order; a unit is
/// confirmed when its first two copies are identical, then greedily
/// extended over every further exact repetition. Also used by the
/// matcher to decide whether a sequence is a repeating gesture.
pub fn find_repeating_pattern(directions: &[Direction8]) -> Option<RepeatingPattern> {
    if directions.len() < 4 {
        return None;
    }

    for unit_len in 2..(directions.len() / 2).min(6) {
        let unit = &directions[..unit_len];
        if directions[unit_len..2 * unit_len] != *unit {
            continue;
        }
        let mut span_len = 2 * unit_len;
        while span_len + unit_len <= directions.len()
            && directions[span_len..span_len + unit_len] == *unit
        {
            span_len += unit_len;
        }
        return Some(RepeatingPattern { unit_len, span_len });
    }
    None
}

fn length_median(segments: &[Segment]) -> f64 {
    let mut lengths: Vec<f64> = segments.iter().map(|s| s.length).collect();
    lengths.sort_by(|a, b| a.total_cmp(b));
    let mid = lengths.len() / 2;
    if lengths.len() % 2 == 0 {
        (lengths[mid - 1] + lengths[mid]) / 2.0
    } else {
        lengths[mid]
    }
}
