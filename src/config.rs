use serde::{Deserialize, Serialize};

/// Parameters of the direction parsing pipeline. Immutable for the
/// duration of one parse; the caller supplies a fresh value per stroke.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParserConfig {
    /// Finished strokes with fewer samples than this are not parsed.
    pub min_points: usize,
    /// Lower bound of the sampling stride used by the segmenter.
    pub step_base: usize,
    /// Segments shorter than this merge into their successor.
    pub merge_threshold: f64,
    /// Stride vectors shorter than this count as noise before the first
    /// direction is established.
    pub noise_threshold: f64,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            min_points: 5,
            step_base: 3,
            merge_threshold: 25.0,
            noise_threshold: 15.0,
        }
    }
}

/// Safety limits and record thresholds owned by the capture loop. These
/// are deliberately separate from [`ParserConfig`]: the capture
/// collaborator tunes them independently of the parser.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CaptureConfig {
    /// Displacement from the trigger point at which a pending stroke
    /// becomes active.
    pub min_distance: f64,
    /// A stroke reaching this many points is force-finished.
    pub max_stroke_points: usize,
    /// A stroke lasting longer than this is force-finished.
    pub max_stroke_duration_ms: u64,
    /// Minimum displacement from the last kept sample for a new sample
    /// to be recorded.
    pub min_record_distance: f64,
    /// Stricter record displacement applied when samples arrive faster
    /// than `fast_motion_window_ms`.
    pub fast_record_distance: f64,
    /// Inter-sample gap below which the stricter record distance applies.
    pub fast_motion_window_ms: u64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            min_distance: 20.0,
            max_stroke_points: 200,
            max_stroke_duration_ms: 5_000,
            min_record_distance: 2.0,
            fast_record_distance: 3.0,
            fast_motion_window_ms: 8,
        }
    }
}
