use serde::{Deserialize, Serialize};

/// The eight compass directions, ordered counter-clockwise from East so
/// that `index() * 45` is the center angle of each direction in degrees.
/// Angles are measured in a y-up frame even though samples arrive y-down;
/// the classifier flips the axis once, on entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction8 {
    East,
    NorthEast,
    North,
    NorthWest,
    West,
    SouthWest,
    South,
    SouthEast,
}

/// Vectors shorter than this have no usable angle and classify as the
/// fixed fallback direction instead.
const DEGENERATE_MAGNITUDE: f64 = 1e-6;

impl Direction8 {
    pub const ALL: [Direction8; 8] = [
        Direction8::East,
        Direction8::NorthEast,
        Direction8::North,
        Direction8::NorthWest,
        Direction8::West,
        Direction8::SouthWest,
        Direction8::South,
        Direction8::SouthEast,
    ];

    pub fn index(self) -> usize {
        match self {
            Direction8::East => 0,
            Direction8::NorthEast => 1,
            Direction8::North => 2,
            Direction8::NorthWest => 3,
            Direction8::West => 4,
            Direction8::SouthWest => 5,
            Direction8::South => 6,
            Direction8::SouthEast => 7,
        }
    }

    pub fn from_index(index: usize) -> Direction8 {
        Self::ALL[index % 8]
    }

    /// The one-character arrow used by the symbol encoding of patterns.
    pub fn symbol(self) -> char {
        match self {
            Direction8::East => '→',
            Direction8::NorthEast => '↗',
            Direction8::North => '↑',
            Direction8::NorthWest => '↖',
            Direction8::West => '←',
            Direction8::SouthWest => '↙',
            Direction8::South => '↓',
            Direction8::SouthEast => '↘',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Direction8> {
        Self::ALL.into_iter().find(|dir| dir.symbol() == symbol)
    }

    pub fn center_angle(self) -> f64 {
        self.index() as f64 * 45.0
    }

    fn is_diagonal(self) -> bool {
        self.index() % 2 == 1
    }

    /// Unit vector in display space (`y` grows downward).
    pub fn unit_vector(self) -> (f64, f64) {
        let radians = self.center_angle().to_radians();
        (radians.cos(), -radians.sin())
    }

    /// Minimal angular difference between two compass directions, in
    /// degrees (a multiple of 45).
    pub fn angular_difference(self, other: Direction8) -> f64 {
        let delta = self.index().abs_diff(other.index());
        delta.min(8 - delta) as f64 * 45.0
    }
}

/// Classify a display-space delta vector (`dy` grows downward) into one
/// of the eight compass directions.
///
/// The decision is a weighted nearest-center search over the eight
/// 45-degree centers: longer vectors trust the raw angle more, and
/// vectors already near a diagonal center get an extra bias toward the
/// diagonal candidates. Near-zero vectors have no usable angle and
/// always classify as East.
pub fn classify_vector(dx: f64, dy: f64) -> Direction8 {
    let magnitude = (dx * dx + dy * dy).sqrt();
    if magnitude < DEGENERATE_MAGNITUDE {
        tracing::trace!(dx, dy, "degenerate vector, using fallback direction");
        return Direction8::East;
    }

    let angle = (-dy).atan2(dx).to_degrees().rem_euclid(360.0);

    // Adaptive fuzziness window: tighter for longer vectors, widened for
    // near-diagonal angles. Surfaced in the trace log; the decision
    // below is purely nearest-center.
    let mut fuzziness = 20.0 * (1.0 + 1.0 / (1.0 + magnitude / 50.0));
    let is_diagonal = [45.0, 135.0, 225.0, 315.0]
        .into_iter()
        .any(|center| (angle - center).abs() < 15.0);
    if is_diagonal {
        fuzziness *= 1.2;
    }

    let length_weight = 1.0 - (1.0 + magnitude).ln() / 10.0;
    let mut best = Direction8::East;
    let mut best_diff = 360.0;
    for candidate in Direction8::ALL {
        let raw = (angle - candidate.center_angle()).abs();
        let circular = raw.min(360.0 - raw);
        let bias = if is_diagonal && candidate.is_diagonal() {
            0.8
        } else {
            1.0
        };
        let weighted = circular * length_weight * bias;
        if weighted < best_diff {
            best_diff = weighted;
            best = candidate;
        }
    }

    tracing::trace!(
        angle,
        magnitude,
        fuzziness,
        diagonal = is_diagonal,
        direction = ?best,
        "classified vector"
    );
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cardinal_vectors_classify_to_their_axis() {
        assert_eq!(classify_vector(10.0, 0.0), Direction8::East);
        assert_eq!(classify_vector(0.0, -10.0), Direction8::North);
        assert_eq!(classify_vector(-10.0, 0.0), Direction8::West);
        assert_eq!(classify_vector(0.0, 10.0), Direction8::South);
    }

    #[test]
    fn diagonal_vectors_classify_to_diagonals() {
        assert_eq!(classify_vector(10.0, -10.0), Direction8::NorthEast);
        assert_eq!(classify_vector(-10.0, -10.0), Direction8::NorthWest);
        assert_eq!(classify_vector(-10.0, 10.0), Direction8::SouthWest);
        assert_eq!(classify_vector(10.0, 10.0), Direction8::SouthEast);
    }

    #[test]
    fn zero_vector_falls_back_to_east() {
        assert_eq!(classify_vector(0.0, 0.0), Direction8::East);
        assert_eq!(classify_vector(1e-9, -1e-9), Direction8::East);
    }

    #[test]
    fn angular_difference_wraps() {
        assert_eq!(
            Direction8::East.angular_difference(Direction8::SouthEast),
            45.0
        );
        assert_eq!(Direction8::North.angular_difference(Direction8::South), 180.0);
        assert_eq!(Direction8::East.angular_difference(Direction8::East), 0.0);
    }

    #[test]
    fn symbols_round_trip() {
        for dir in Direction8::ALL {
            assert_eq!(Direction8::from_symbol(dir.symbol()), Some(dir));
        }
        assert_eq!(Direction8::from_symbol('x'), None);
    }
}
