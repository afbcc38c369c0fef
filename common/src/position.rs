use serde::{Deserialize, Serialize};

/// Represents a geographical coordinate with latitude and longitude.
///
/// The `Position` struct stores a point on Earth in decimal degrees.
/// It is the value handed to the injection core by the collaborators
/// that resolve a coordinate, e.g. the geotag extractor.
///
/// Values are passed through as they were parsed. Out-of-range
/// coordinates are not corrected or rejected here; the upstream
/// metadata parser is the only validation a `Position` ever sees.
///
/// # Fields
///
/// - `latitude` – The latitude in decimal degrees (positive for north, negative for south).
/// - `longitude` – The longitude in decimal degrees (positive for east, negative for west).
///
/// # Example
///
/// ```rust
/// use common::position::Position;
///
/// let pos = Position {
///     latitude: 47.2692,
///     longitude: 11.4041,
/// };
///
/// println!("{:?}", pos);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

impl Position {
    /// Creates a new [`Position`] with the given latitude and longitude.
    ///
    /// # Arguments
    ///
    /// * `latitude` - A reference to a floating-point number representing the latitude in decimal degrees.
    /// * `longitude` - A reference to a floating-point number representing the longitude in decimal degrees.
    ///
    /// # Returns
    ///
    /// A new `Position` instance with the specified coordinates.
    pub fn new(latitude: &f64, longitude: &f64) -> Self {
        Position {
            latitude: *latitude,
            longitude: *longitude,
        }
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
