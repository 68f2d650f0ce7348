use crate::config::ParserConfig;
use crate::direction::Direction8;
use crate::library::{ActionId, GestureLibrarySnapshot};
use crate::types::Point;
use crate::{matcher, optimize, segment, simplify};

/// Result of pushing one finished trail through the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedTrail {
    /// The optimized direction sequence, empty when the trail was too
    /// short to parse.
    pub directions: Vec<Direction8>,
    /// The matched action, if any.
    pub action: Option<ActionId>,
}

impl ParsedTrail {
    fn empty() -> Self {
        Self {
            directions: Vec::new(),
            action: None,
        }
    }
}

/// Run the full simplify -> segment -> optimize -> match pipeline over a
/// finished trail. Total: every input yields a result, and "no match" is
/// an ordinary outcome, not an error.
pub fn parse_trail(
    trail: &[Point],
    config: &ParserConfig,
    library: &GestureLibrarySnapshot,
) -> ParsedTrail {
    if trail.len() < config.min_points {
        tracing::debug!(
            points = trail.len(),
            min_points = config.min_points,
            "trail too short, skipping parse"
        );
        return ParsedTrail::empty();
    }

    let reduced = simplify::simplify_trajectory(trail);
    tracing::debug!(raw = trail.len(), reduced = reduced.len(), "simplified trail");
    let segments = segment::segment_directions(&reduced, config);
    let optimized = optimize::optimize_segments(&segments, config);
    let action = matcher::match_gesture(&optimized, library);
    ParsedTrail {
        directions: optimized.directions,
        action,
    }
}
