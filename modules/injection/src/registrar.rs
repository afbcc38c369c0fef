use crate::MOCK_SOURCE_NAME;
use chrono::Utc;
use location_service::{LocationService, LocationServiceError, SourceProfile, SourceStatus};
use std::sync::Arc;
use tracing::{debug, error, info};

/// Registers and unregisters the mock location source with the
/// location subsystem.
///
/// The registrar holds no state of its own; everything lives in the
/// subsystem behind [`LocationService`]. Both operations are idempotent
/// and swallow a revoked mock-location permission, because the host
/// detects and surfaces that condition separately. Callers must
/// serialize register/unregister calls; the subsystem does not.
pub struct SourceRegistrar {
    service: Arc<dyn LocationService>,
}

impl SourceRegistrar {
    pub fn new(service: Arc<dyn LocationService>) -> Self {
        SourceRegistrar { service }
    }

    /// Makes the mock source visible, enabled and available.
    ///
    /// Any stale source left behind by a prior unclean exit is removed
    /// first, so at most one source with the fixed name ever exists.
    pub fn register(&self) {
        self.unregister();
        if let Err(e) = self.try_register() {
            match e {
                LocationServiceError::PermissionDenied => {
                    info!("Mock locations are disabled, skipping source registration");
                }
                _ => error!("Failed to register mock location source. Error: {}", e),
            }
        }
    }

    fn try_register(&self) -> Result<(), LocationServiceError> {
        let profile = SourceProfile::mock_gps(MOCK_SOURCE_NAME);
        self.service.add_source(&profile)?;
        self.service.set_source_enabled(MOCK_SOURCE_NAME, true)?;
        self.service
            .set_source_status(MOCK_SOURCE_NAME, SourceStatus::Available, Utc::now())?;
        debug!("Mock location source {} registered", MOCK_SOURCE_NAME);
        Ok(())
    }

    /// Removes the mock source if it exists, a no-op otherwise.
    pub fn unregister(&self) {
        if !self.service.has_source(MOCK_SOURCE_NAME) {
            return;
        }
        if let Err(e) = self.service.remove_source(MOCK_SOURCE_NAME) {
            match e {
                LocationServiceError::PermissionDenied => {
                    debug!("Mock locations are disabled, leaving source removal to the host");
                }
                _ => error!("Failed to remove mock location source. Error: {}", e),
            }
        }
    }
}
