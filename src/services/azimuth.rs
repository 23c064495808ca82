//! Panel azimuth conventions.
//!
//! The engine works with one convention only: 0° = South, increasing
//! westward, normalized into [0, 360). West is 90°, North 180°, East 270°.
//! The direction table, the provider aspect and the map bearing below are
//! all derived from that single angle.

use crate::models::orientation::{Direction, DirectionEntry};

/// Arrow length in degrees of latitude/longitude (~100 m).
const ARROW_LENGTH_DEG: f64 = 0.001;

/// Panel azimuth of a compass direction.
pub fn azimuth_of(direction: Direction) -> f64 {
    match direction {
        Direction::South => 0.0,
        Direction::SouthWest => 45.0,
        Direction::West => 90.0,
        Direction::NorthWest => 135.0,
        Direction::North => 180.0,
        Direction::NorthEast => 225.0,
        Direction::East => 270.0,
        Direction::SouthEast => 315.0,
    }
}

/// Reverse of [`azimuth_of`]. Only exact table angles map back to a label.
pub fn direction_of(azimuth_deg: f64) -> Option<Direction> {
    let a = normalize_azimuth(azimuth_deg);
    Direction::ALL.into_iter().find(|d| azimuth_of(*d) == a)
}

/// Wraps any angle into [0, 360).
pub fn normalize_azimuth(deg: f64) -> f64 {
    let a = deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if a >= 360.0 { 0.0 } else { a }
}

/// Signed form used by the irradiance provider's `aspect` parameter, in (-180, 180].
pub fn provider_aspect(azimuth_deg: f64) -> f64 {
    let a = normalize_azimuth(azimuth_deg);
    if a > 180.0 { a - 360.0 } else { a }
}

/// Compass bearing of the facing direction (North = 0, clockwise).
pub fn compass_bearing(azimuth_deg: f64) -> f64 {
    normalize_azimuth(azimuth_deg + 180.0)
}

/// Tip of the map arrow drawn from `(lat, lon)` along the panel's facing
/// direction. Offsets are rounded to 6 decimals.
pub fn arrow_tip(lat: f64, lon: f64, azimuth_deg: f64) -> [f64; 2] {
    let bearing = compass_bearing(azimuth_deg).to_radians();
    let lat_offset = round6(ARROW_LENGTH_DEG * bearing.cos());
    let lon_offset = round6(ARROW_LENGTH_DEG * bearing.sin());
    [lat + lat_offset, lon + lon_offset]
}

fn round6(v: f64) -> f64 {
    (v * 1e6).round() / 1e6
}

pub fn direction_entry(direction: Direction) -> DirectionEntry {
    let azimuth_deg = azimuth_of(direction);
    DirectionEntry {
        direction,
        label: direction.label().to_string(),
        azimuth_deg,
        provider_aspect_deg: provider_aspect(azimuth_deg),
        compass_bearing_deg: compass_bearing(azimuth_deg),
    }
}

/// Full label ↔ angle table, in compass order starting from North.
pub fn direction_table() -> Vec<DirectionEntry> {
    Direction::ALL.into_iter().map(direction_entry).collect()
}
