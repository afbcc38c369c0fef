// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

//! Location service seam for the mock location injector
//!
//! Provides the [`LocationService`] trait the injection core talks to and
//! the in-process [`SystemLocationService`](system::SystemLocationService)
//! implementation of it.

use chrono::{DateTime, Utc};
use common::fix::MockFix;
use thiserror::Error;

pub mod system;

/// Errors reported by a [`LocationService`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LocationServiceError {
    /// The host does not permit mock location sources.
    ///
    /// This is the error every mutating call returns while the
    /// mock-location feature toggle is off. Callers are expected to
    /// degrade, not to crash.
    #[error("mock location sources are not permitted by the host")]
    PermissionDenied,

    /// No source with the given name is registered.
    #[error("no location source named `{0}` is registered")]
    UnknownSource(String),

    /// A source with the given name is already registered.
    #[error("a location source named `{0}` is already registered")]
    DuplicateSource(String),

    /// The source exists but is not enabled, so it cannot report fixes.
    #[error("the location source `{0}` is disabled")]
    SourceDisabled(String),
}

/// The power requirement a source declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerClass {
    Low,
    High,
}

/// The accuracy class a source declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccuracyClass {
    Fine,
    Coarse,
}

/// The availability status of a registered source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceStatus {
    Available,
    TemporarilyUnavailable,
    OutOfService,
}

/// Describes a synthetic location source to the location subsystem.
///
/// The profile mirrors what real providers declare about themselves, so
/// consumers cannot distinguish a synthetic source from a hardware one
/// by its capabilities alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceProfile {
    pub name: String,
    pub requires_network: bool,
    pub cost_free: bool,
    pub monitors_power: bool,
    pub supports_altitude: bool,
    pub supports_speed: bool,
    pub supports_bearing: bool,
    pub power: PowerClass,
    pub accuracy: AccuracyClass,
}

impl SourceProfile {
    /// Creates the profile of a GPS-grade mock source.
    ///
    /// Network independent, cost free, power aware, reporting altitude,
    /// speed and bearing with a low power requirement and fine accuracy.
    pub fn mock_gps(name: &str) -> Self {
        SourceProfile {
            name: name.to_owned(),
            requires_network: false,
            cost_free: true,
            monitors_power: true,
            supports_altitude: true,
            supports_speed: true,
            supports_bearing: true,
            power: PowerClass::Low,
            accuracy: AccuracyClass::Fine,
        }
    }
}

/// Optional capabilities of a [`LocationService`].
///
/// Resolved once at startup instead of being probed per iteration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServiceCapabilities {
    /// The subsystem only accepts fixes whose altitude, speed and
    /// bearing fields are filled in.
    pub requires_complete_fixes: bool,
}

/// The interface of the host's location subsystem, as far as mock
/// location injection is concerned.
///
/// All registration state lives behind this trait, never in its callers.
/// Implementations are not expected to serialize concurrent
/// register/unregister calls; the caller owns that discipline.
pub trait LocationService: Send + Sync {
    /// Registers a new location source described by `profile`.
    ///
    /// Fails with [`LocationServiceError::DuplicateSource`] when a source
    /// with the same name already exists.
    fn add_source(&self, profile: &SourceProfile) -> Result<(), LocationServiceError>;

    /// Removes the source with the given name.
    fn remove_source(&self, name: &str) -> Result<(), LocationServiceError>;

    /// Returns `true` when a source with the given name is registered.
    fn has_source(&self, name: &str) -> bool;

    /// Enables or disables the source with the given name.
    ///
    /// Only enabled sources may report fixes.
    fn set_source_enabled(&self, name: &str, enabled: bool) -> Result<(), LocationServiceError>;

    /// Updates the availability status of the source with the given name.
    fn set_source_status(
        &self,
        name: &str,
        status: SourceStatus,
        at: DateTime<Utc>,
    ) -> Result<(), LocationServiceError>;

    /// Reports a fix through the source with the given name.
    fn report_fix(&self, name: &str, fix: &MockFix) -> Result<(), LocationServiceError>;

    /// Returns `true` while the host permits mock location sources.
    ///
    /// The permission can be revoked at any time; a `true` result is
    /// only a snapshot.
    fn mock_sources_permitted(&self) -> bool;

    /// Returns the optional capabilities of this subsystem.
    fn capabilities(&self) -> ServiceCapabilities;
}
