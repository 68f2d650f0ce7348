use crate::config::ParserConfig;
use crate::direction::{classify_vector, Direction8};
use crate::types::Point;

/// A maximal run of the trajectory classified as one direction, with the
/// magnitude of its accumulated vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub direction: Direction8,
    pub length: f64,
}

/// Walk the trail in strides and split it into direction segments.
///
/// The stride adapts to the trail length (`max(step_base, n / 20)`) so
/// long trails are not over-sampled. Consecutive stride vectors within
/// 45 degrees of the running direction accumulate into one segment, and
/// the running direction is re-derived from the accumulated vector so a
/// slow arc tracks its true heading. A change of more than 45 degrees
/// closes the segment.
pub fn segment_directions(trail: &[Point], config: &ParserConfig) -> Vec<Segment> {
    if trail.len() < 2 {
        return Vec::new();
    }

    let step = config.step_base.max(trail.len() / 20).max(1);
    let mut segments = Vec::new();
    let mut current: Option<Direction8> = None;
    let mut accum_x = 0.0;
    let mut accum_y = 0.0;

    // Seed the running direction from the opening stride when it clears
    // the noise floor, so the very start of the stroke is not lost.
    if trail.len() >= step {
        let dx = trail[step - 1].x - trail[0].x;
        let dy = trail[step - 1].y - trail[0].y;
        if (dx * dx + dy * dy).sqrt() >= config.noise_threshold {
            current = Some(classify_vector(dx, dy));
            accum_x = dx;
            accum_y = dy;
        }
    }

    let mut i = step;
    while i < trail.len() {
        let dx = trail[i].x - trail[i - step].x;
        let dy = trail[i].y - trail[i - step].y;

        // Sub-noise strides are dropped only while no direction exists
        // yet; once a stroke is under way every stride contributes.
        if (dx * dx + dy * dy).sqrt() < config.noise_threshold && current.is_none() {
            tracing::trace!(dx, dy, "filtered micro-move");
            i += step;
            continue;
        }

        let new_dir = classify_vector(dx, dy);
        match current {
            Some(dir) => {
                if dir.angular_difference(new_dir) > 45.0 {
                    tracing::debug!(from = ?dir, to = ?new_dir, "direction change");
                    segments.push(Segment {
                        direction: dir,
                        length: (accum_x * accum_x + accum_y * accum_y).sqrt(),
                    });
                    accum_x = dx;
                    accum_y = dy;
                    current = Some(new_dir);
                } else {
                    accum_x += dx;
                    accum_y += dy;
                    current = Some(classify_vector(accum_x, accum_y));
                }
            }
            None => {
                accum_x = dx;
                accum_y = dy;
                current = Some(new_dir);
            }
        }
        i += step;
    }

    if let Some(dir) = current {
        segments.push(Segment {
            direction: dir,
            length: (accum_x * accum_x + accum_y * accum_y).sqrt(),
        });
    }

    tracing::debug!(count = segments.len(), "segmented trail");
    segments
}
