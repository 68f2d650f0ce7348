use serde::{Deserialize, Serialize};

/// A position in display space. `y` grows downward, matching the screen
/// coordinate frame the samples arrive in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_sq(self, other: Point) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx * dx + dy * dy
    }
}

impl From<(f64, f64)> for Point {
    fn from(value: (f64, f64)) -> Self {
        Self {
            x: value.0,
            y: value.1,
        }
    }
}

/// One pointer observation. Owned by the capture buffer until the stroke
/// is finished and handed off.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawSample {
    pub x: f64,
    pub y: f64,
    pub t_ms: u64,
}

impl RawSample {
    pub fn new(x: f64, y: f64, t_ms: u64) -> Self {
        Self { x, y, t_ms }
    }

    pub fn position(self) -> Point {
        Point::new(self.x, self.y)
    }
}
