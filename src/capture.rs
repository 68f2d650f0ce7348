use crate::config::CaptureConfig;
use crate::types::{Point, RawSample};
use std::collections::VecDeque;

/// Number of finished-stroke summaries retained for diagnostics.
pub const RECENT_STROKES: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Pending,
    Active,
}

/// How a stroke ended. Force-finished strokes are tagged so the caller
/// can skip the parse attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    Released,
    Forced,
}

/// One finished stroke, handed off by value to the parse pipeline and
/// discarded after a single parse attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    pub id: u64,
    pub started_at_ms: u64,
    pub points: Vec<RawSample>,
    pub termination: Termination,
}

impl Stroke {
    pub fn trail(&self) -> Vec<Point> {
        self.points.iter().map(|sample| sample.position()).collect()
    }

    pub fn duration_ms(&self) -> u64 {
        self.points
            .last()
            .map(|sample| sample.t_ms.saturating_sub(self.started_at_ms))
            .unwrap_or(0)
    }
}

/// Diagnostic summary of a finished stroke, kept in a bounded ring.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeSummary {
    pub id: u64,
    pub points: usize,
    pub duration_ms: u64,
    pub termination: Termination,
    /// Wall-clock time the stroke finished, unix seconds.
    pub finished_at: i64,
}

/// State machine owning the lifecycle of one stroke.
///
/// `Idle -> Pending` on trigger down; `Pending` buffers samples without
/// touching the pipeline until the displacement from the trigger point
/// reaches `min_distance`. While `Active`, samples pass a minimum-record
/// filter and the safety limits; the stroke finishes on trigger up or is
/// force-finished when a limit trips. Finishing always returns the
/// machine to `Idle`.
///
/// The caller drives this from its polling loop; no method blocks.
#[derive(Debug)]
pub struct PointerCapture {
    config: CaptureConfig,
    phase: Phase,
    origin: Point,
    pending: Vec<RawSample>,
    points: Vec<RawSample>,
    stroke_id: u64,
    started_at_ms: u64,
    recent: VecDeque<StrokeSummary>,
}

impl PointerCapture {
    pub fn new(config: CaptureConfig) -> Self {
        Self {
            config,
            phase: Phase::Idle,
            origin: Point::new(0.0, 0.0),
            pending: Vec::new(),
            points: Vec::new(),
            stroke_id: 0,
            started_at_ms: 0,
            recent: VecDeque::with_capacity(RECENT_STROKES),
        }
    }

    pub fn is_active(&self) -> bool {
        self.phase == Phase::Active
    }

    /// Summaries of the most recent finished strokes, oldest first.
    pub fn recent_strokes(&self) -> impl Iterator<Item = &StrokeSummary> {
        self.recent.iter()
    }

    /// Trigger pressed: start buffering from this point.
    pub fn trigger_down(&mut self, x: f64, y: f64, t_ms: u64) {
        self.origin = Point::new(x, y);
        self.pending.clear();
        self.pending.push(RawSample::new(x, y, t_ms));
        self.points.clear();
        self.phase = Phase::Pending;
        tracing::debug!(x, y, "trigger down, buffering");
    }

    /// Feed one pointer sample. Returns a stroke only when a safety
    /// limit force-finished it; the sample that tripped the limit is
    /// dropped.
    pub fn sample(&mut self, x: f64, y: f64, t_ms: u64) -> Option<Stroke> {
        match self.phase {
            Phase::Idle => None,
            Phase::Pending => {
                self.pending.push(RawSample::new(x, y, t_ms));
                let displacement_sq = self.origin.distance_sq(Point::new(x, y));
                if displacement_sq >= self.config.min_distance * self.config.min_distance {
                    self.activate(t_ms);
                }
                None
            }
            Phase::Active => {
                if self.points.len() >= self.config.max_stroke_points
                    || t_ms.saturating_sub(self.started_at_ms) >= self.config.max_stroke_duration_ms
                {
                    tracing::debug!(
                        id = self.stroke_id,
                        points = self.points.len(),
                        "stroke exceeded safety limits, force finishing"
                    );
                    return Some(self.finish(Termination::Forced));
                }

                // Minimum-record rule: drop samples that barely moved,
                // with a stricter floor when samples arrive fast.
                if let Some(last) = self.points.last() {
                    let dist_sq = last.position().distance_sq(Point::new(x, y));
                    let floor = if t_ms.saturating_sub(last.t_ms) < self.config.fast_motion_window_ms
                    {
                        self.config.fast_record_distance
                    } else {
                        self.config.min_record_distance
                    };
                    if dist_sq < floor * floor {
                        return None;
                    }
                }
                self.points.push(RawSample::new(x, y, t_ms));
                None
            }
        }
    }

    /// Trigger released. Returns the finished stroke when one was
    /// active; a pending buffer that never reached the trigger distance
    /// is discarded.
    pub fn trigger_up(&mut self, _t_ms: u64) -> Option<Stroke> {
        match self.phase {
            Phase::Idle => None,
            Phase::Pending => {
                tracing::debug!("released before trigger distance, discarding buffer");
                self.pending.clear();
                self.phase = Phase::Idle;
                None
            }
            Phase::Active => Some(self.finish(Termination::Released)),
        }
    }

    /// Drop any in-flight state and return to `Idle`.
    pub fn reset(&mut self) {
        self.pending.clear();
        self.points.clear();
        self.phase = Phase::Idle;
    }

    fn activate(&mut self, t_ms: u64) {
        self.stroke_id += 1;
        self.started_at_ms = t_ms;
        // The buffered pre-trigger trail seeds the stroke.
        self.points = std::mem::take(&mut self.pending);
        self.phase = Phase::Active;
        tracing::debug!(
            id = self.stroke_id,
            seeded = self.points.len(),
            "stroke activated"
        );
    }

    fn finish(&mut self, termination: Termination) -> Stroke {
        let stroke = Stroke {
            id: self.stroke_id,
            started_at_ms: self.started_at_ms,
            points: std::mem::take(&mut self.points),
            termination,
        };
        self.pending.clear();
        self.phase = Phase::Idle;

        if self.recent.len() == RECENT_STROKES {
            self.recent.pop_front();
        }
        self.recent.push_back(StrokeSummary {
            id: stroke.id,
            points: stroke.points.len(),
            duration_ms: stroke.duration_ms(),
            termination,
            finished_at: chrono::Local::now().timestamp(),
        });

        tracing::debug!(
            id = stroke.id,
            points = stroke.points.len(),
            ?termination,
            "stroke finished"
        );
        stroke
    }
}
