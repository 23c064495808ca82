use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Eight-point compass orientation a panel can face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Direction::North => "North",
            Direction::NorthEast => "North-East",
            Direction::East => "East",
            Direction::SouthEast => "South-East",
            Direction::South => "South",
            Direction::SouthWest => "South-West",
            Direction::West => "West",
            Direction::NorthWest => "North-West",
        }
    }
}

// ─── REST API response types ──────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DirectionEntry {
    pub direction: Direction,
    pub label: String,
    /// Panel azimuth, 0 = South, increasing westward (deg)
    pub azimuth_deg: f64,
    /// Same angle in the provider's signed form, East = -90, West = 90 (deg)
    pub provider_aspect_deg: f64,
    /// Map bearing, North = 0, clockwise (deg)
    pub compass_bearing_deg: f64,
}

/// Everything a map layer needs to draw the site marker and the facing arrow.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OrientationResponse {
    pub plant_id: String,
    #[serde(flatten)]
    pub direction: DirectionEntry,
    pub tilt_deg: f64,
    /// Marker position `[lat, lon]`
    #[schema(value_type = Vec<f64>)]
    pub marker: [f64; 2],
    /// Arrow tip `[lat, lon]`, roughly 100 m from the marker
    #[schema(value_type = Vec<f64>)]
    pub arrow_tip: [f64; 2],
}
