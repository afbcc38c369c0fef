use crate::{
    LocationService, LocationServiceError, ServiceCapabilities, SourceProfile, SourceStatus,
};
use chrono::{DateTime, Utc};
use common::fix::MockFix;
use std::{
    collections::HashMap,
    sync::{
        RwLock,
        atomic::{AtomicBool, Ordering},
    },
};
use tracing::debug;

/// One registered source and its mutable subsystem-side state.
#[derive(Debug, Clone)]
struct SourceRecord {
    profile: SourceProfile,
    enabled: bool,
    status: SourceStatus,
    status_changed: DateTime<Utc>,
    last_fix: Option<MockFix>,
}

/// The in-process location subsystem.
///
/// Keeps the registered sources in a map guarded by a [`RwLock`] and
/// fans accepted fixes out to subscribers over a tokio broadcast
/// channel, the way the host's location listeners would observe them.
///
/// The mock-location permission is a runtime toggle. While it is off,
/// every mutating call fails with
/// [`LocationServiceError::PermissionDenied`]; lookups keep working.
///
/// Registration state does not survive the process. A crashed run can
/// therefore never leave a source behind in this implementation, but
/// callers still have to reconcile on startup because other
/// implementations of [`LocationService`] can.
pub struct SystemLocationService {
    sources: RwLock<HashMap<String, SourceRecord>>,
    mock_allowed: AtomicBool,
    capabilities: ServiceCapabilities,
    fix_sender: tokio::sync::broadcast::Sender<MockFix>,
}

impl SystemLocationService {
    /// Creates a service that permits mock sources and requires
    /// complete fixes.
    pub fn new() -> Self {
        SystemLocationService::with_capabilities(ServiceCapabilities {
            requires_complete_fixes: true,
        })
    }

    /// Creates a service with the given capability set.
    pub fn with_capabilities(capabilities: ServiceCapabilities) -> Self {
        let (fix_sender, _) = tokio::sync::broadcast::channel(100);
        SystemLocationService {
            sources: RwLock::new(HashMap::new()),
            mock_allowed: AtomicBool::new(true),
            capabilities,
            fix_sender,
        }
    }

    /// Toggles the mock-location permission at runtime.
    pub fn set_mock_allowed(&self, allowed: bool) {
        self.mock_allowed.store(allowed, Ordering::SeqCst);
    }

    /// Subscribes to every fix accepted by any source of this service.
    pub fn subscribe_fixes(&self) -> tokio::sync::broadcast::Receiver<MockFix> {
        self.fix_sender.subscribe()
    }

    /// Returns the most recent fix the named source reported.
    pub fn last_fix(&self, name: &str) -> Option<MockFix> {
        let sources = self
            .sources
            .read()
            .unwrap_or_else(|sources| sources.into_inner());
        sources.get(name).and_then(|record| record.last_fix)
    }

    /// Returns the declared profile of the named source.
    pub fn source_profile(&self, name: &str) -> Option<SourceProfile> {
        let sources = self
            .sources
            .read()
            .unwrap_or_else(|sources| sources.into_inner());
        sources.get(name).map(|record| record.profile.clone())
    }

    /// Returns the time the named source's status last changed.
    pub fn status_changed(&self, name: &str) -> Option<DateTime<Utc>> {
        let sources = self
            .sources
            .read()
            .unwrap_or_else(|sources| sources.into_inner());
        sources.get(name).map(|record| record.status_changed)
    }

    /// Returns the enabled flag and status of the named source.
    pub fn source_state(&self, name: &str) -> Option<(bool, SourceStatus)> {
        let sources = self
            .sources
            .read()
            .unwrap_or_else(|sources| sources.into_inner());
        sources
            .get(name)
            .map(|record| (record.enabled, record.status))
    }

    /// Returns the number of registered sources.
    pub fn source_count(&self) -> usize {
        let sources = self
            .sources
            .read()
            .unwrap_or_else(|sources| sources.into_inner());
        sources.len()
    }

    fn check_permission(&self) -> Result<(), LocationServiceError> {
        if self.mock_allowed.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(LocationServiceError::PermissionDenied)
        }
    }
}

impl Default for SystemLocationService {
    fn default() -> Self {
        Self::new()
    }
}

impl LocationService for SystemLocationService {
    fn add_source(&self, profile: &SourceProfile) -> Result<(), LocationServiceError> {
        self.check_permission()?;
        let mut sources = self
            .sources
            .write()
            .unwrap_or_else(|sources| sources.into_inner());
        if sources.contains_key(&profile.name) {
            return Err(LocationServiceError::DuplicateSource(profile.name.clone()));
        }
        debug!("Location source {} registered", profile.name);
        sources.insert(
            profile.name.clone(),
            SourceRecord {
                profile: profile.clone(),
                enabled: false,
                status: SourceStatus::OutOfService,
                status_changed: Utc::now(),
                last_fix: None,
            },
        );
        Ok(())
    }

    fn remove_source(&self, name: &str) -> Result<(), LocationServiceError> {
        self.check_permission()?;
        let mut sources = self
            .sources
            .write()
            .unwrap_or_else(|sources| sources.into_inner());
        if sources.remove(name).is_none() {
            return Err(LocationServiceError::UnknownSource(name.to_owned()));
        }
        debug!("Location source {} removed", name);
        Ok(())
    }

    fn has_source(&self, name: &str) -> bool {
        let sources = self
            .sources
            .read()
            .unwrap_or_else(|sources| sources.into_inner());
        sources.contains_key(name)
    }

    fn set_source_enabled(&self, name: &str, enabled: bool) -> Result<(), LocationServiceError> {
        self.check_permission()?;
        let mut sources = self
            .sources
            .write()
            .unwrap_or_else(|sources| sources.into_inner());
        let record = sources
            .get_mut(name)
            .ok_or_else(|| LocationServiceError::UnknownSource(name.to_owned()))?;
        record.enabled = enabled;
        Ok(())
    }

    fn set_source_status(
        &self,
        name: &str,
        status: SourceStatus,
        at: DateTime<Utc>,
    ) -> Result<(), LocationServiceError> {
        self.check_permission()?;
        let mut sources = self
            .sources
            .write()
            .unwrap_or_else(|sources| sources.into_inner());
        let record = sources
            .get_mut(name)
            .ok_or_else(|| LocationServiceError::UnknownSource(name.to_owned()))?;
        record.status = status;
        record.status_changed = at;
        Ok(())
    }

    fn report_fix(&self, name: &str, fix: &MockFix) -> Result<(), LocationServiceError> {
        self.check_permission()?;
        let mut sources = self
            .sources
            .write()
            .unwrap_or_else(|sources| sources.into_inner());
        let record = sources
            .get_mut(name)
            .ok_or_else(|| LocationServiceError::UnknownSource(name.to_owned()))?;
        if !record.enabled {
            return Err(LocationServiceError::SourceDisabled(name.to_owned()));
        }
        record.last_fix = Some(*fix);
        drop(sources);
        let _ = self.fix_sender.send(*fix);
        Ok(())
    }

    fn mock_sources_permitted(&self) -> bool {
        self.mock_allowed.load(Ordering::SeqCst)
    }

    fn capabilities(&self) -> ServiceCapabilities {
        self.capabilities
    }
}
