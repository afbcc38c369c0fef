use chrono::{DateTime, Utc};
use common::fix::MockFix;
use location_service::{
    LocationService, LocationServiceError, ServiceCapabilities, SourceProfile, SourceStatus,
};
use std::{sync::Mutex, time::Instant};

/// One observed push attempt, successful or not.
#[derive(Debug, Clone, Copy)]
pub struct PushRecord {
    pub fix: MockFix,
    pub at: Instant,
}

/// A scripted [`LocationService`] recording every push attempt.
///
/// Registration calls are accepted and forgotten; the fake only cares
/// about `report_fix`. Failures are injected per attempt number
/// (1-based) so tests can script the exact iteration a push fails on.
pub struct FakeLocationService {
    pushes: Mutex<Vec<PushRecord>>,
    deny_from_attempt: Mutex<Option<u32>>,
    transient_failure_on_attempt: Mutex<Option<u32>>,
    capabilities: ServiceCapabilities,
}

impl FakeLocationService {
    pub fn new() -> Self {
        FakeLocationService {
            pushes: Mutex::new(Vec::new()),
            deny_from_attempt: Mutex::new(None),
            transient_failure_on_attempt: Mutex::new(None),
            capabilities: ServiceCapabilities::default(),
        }
    }

    /// Every push attempt starting with `attempt` fails with
    /// [`LocationServiceError::PermissionDenied`].
    pub fn deny_mock_from_attempt(&self, attempt: u32) {
        *self.deny_from_attempt.lock().unwrap() = Some(attempt);
    }

    /// Exactly the given push attempt fails with a transient error.
    pub fn fail_attempt_transiently(&self, attempt: u32) {
        *self.transient_failure_on_attempt.lock().unwrap() = Some(attempt);
    }

    /// Returns every recorded push attempt, including failed ones.
    pub fn pushes(&self) -> Vec<PushRecord> {
        self.pushes.lock().unwrap().clone()
    }

    /// Returns the number of push attempts, including failed ones.
    pub fn push_count(&self) -> usize {
        self.pushes.lock().unwrap().len()
    }
}

impl LocationService for FakeLocationService {
    fn add_source(&self, _profile: &SourceProfile) -> Result<(), LocationServiceError> {
        Ok(())
    }

    fn remove_source(&self, _name: &str) -> Result<(), LocationServiceError> {
        Ok(())
    }

    fn has_source(&self, _name: &str) -> bool {
        false
    }

    fn set_source_enabled(&self, _name: &str, _enabled: bool) -> Result<(), LocationServiceError> {
        Ok(())
    }

    fn set_source_status(
        &self,
        _name: &str,
        _status: SourceStatus,
        _at: DateTime<Utc>,
    ) -> Result<(), LocationServiceError> {
        Ok(())
    }

    fn report_fix(&self, name: &str, fix: &MockFix) -> Result<(), LocationServiceError> {
        let mut pushes = self.pushes.lock().unwrap();
        pushes.push(PushRecord {
            fix: *fix,
            at: Instant::now(),
        });
        let attempt = pushes.len() as u32;
        if let Some(denied_from) = *self.deny_from_attempt.lock().unwrap()
            && attempt >= denied_from
        {
            return Err(LocationServiceError::PermissionDenied);
        }
        if let Some(failing) = *self.transient_failure_on_attempt.lock().unwrap()
            && attempt == failing
        {
            return Err(LocationServiceError::UnknownSource(name.to_owned()));
        }
        Ok(())
    }

    fn mock_sources_permitted(&self) -> bool {
        true
    }

    fn capabilities(&self) -> ServiceCapabilities {
        self.capabilities
    }
}
