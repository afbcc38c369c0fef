use crate::position::Position;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The provider category a fix claims to originate from.
///
/// Consumers of the location subsystem treat [`FixClass::Gps`] fixes as
/// precise hardware fixes, so injected fixes are tagged with it to
/// override any real GPS reading instead of being ranked below it as a
/// coarse network fix would be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FixClass {
    /// Precise, GPS-class fix.
    Gps,
    /// Coarse, network-derived fix.
    Network,
}

/// One reported position sample.
///
/// A `MockFix` carries the coordinate, the claimed accuracy in meters,
/// the wall-clock time of the report and the provider class. The
/// altitude, speed and bearing fields are optional; subsystems that
/// only accept complete fixes get them zero-filled via
/// [`MockFix::make_complete`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MockFix {
    class: FixClass,
    position: Position,
    accuracy: f64,
    time: DateTime<Utc>,
    altitude: Option<f64>,
    speed: Option<f64>,
    bearing: Option<f64>,
}

impl MockFix {
    /// Creates a GPS-class fix for the given coordinate.
    ///
    /// # Arguments
    ///
    /// * `position` – The coordinate the fix reports.
    /// * `accuracy` – The claimed accuracy in meters.
    /// * `time` – The wall-clock UTC time of the report.
    pub fn gps(position: Position, accuracy: f64, time: DateTime<Utc>) -> Self {
        MockFix {
            class: FixClass::Gps,
            position,
            accuracy,
            time,
            altitude: None,
            speed: None,
            bearing: None,
        }
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Fills the optional fields with neutral values.
    ///
    /// Some location subsystems refuse fixes that lack altitude, speed
    /// or bearing. Already present values are kept.
    pub fn make_complete(&mut self) {
        self.altitude.get_or_insert(0.0);
        self.speed.get_or_insert(0.0);
        self.bearing.get_or_insert(0.0);
    }

    /// Returns `true` if altitude, speed and bearing are all present.
    pub fn is_complete(&self) -> bool {
        self.altitude.is_some() && self.speed.is_some() && self.bearing.is_some()
    }

    pub fn class(&self) -> FixClass {
        self.class
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Returns the claimed accuracy in meters.
    pub fn accuracy(&self) -> f64 {
        self.accuracy
    }

    /// Returns the wall-clock time the fix was reported at.
    pub fn time(&self) -> DateTime<Utc> {
        self.time
    }

    pub fn altitude(&self) -> Option<f64> {
        self.altitude
    }

    pub fn speed(&self) -> Option<f64> {
        self.speed
    }

    pub fn bearing(&self) -> Option<f64> {
        self.bearing
    }
}
