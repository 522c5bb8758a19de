use crate::domain::events::DiscoveryHandle;
use crate::domain::model::{AuthorizationStatus, Coordinate};
use crate::domain::ports::GeolocationWatcher;
use std::sync::Mutex;

/// 固定位置的定位來源，給 CLI 與整合測試使用。
///
/// `grant_on_request` 決定使用者在授權提示中是否同意。
pub struct FixedLocationWatcher {
    status: Mutex<AuthorizationStatus>,
    grant_on_request: bool,
    fix: Option<Coordinate>,
    subscriber: Mutex<Option<DiscoveryHandle>>,
}

impl FixedLocationWatcher {
    pub fn new(status: AuthorizationStatus, grant_on_request: bool, fix: Option<Coordinate>) -> Self {
        Self {
            status: Mutex::new(status),
            grant_on_request,
            fix,
            subscriber: Mutex::new(None),
        }
    }

    fn notify(&self, notify: impl FnOnce(&DiscoveryHandle)) {
        match self.subscriber.lock() {
            Ok(guard) => match guard.as_ref() {
                Some(handle) => notify(handle),
                None => tracing::debug!("No geolocation subscriber yet"),
            },
            Err(_) => tracing::error!("Geolocation subscriber lock poisoned"),
        }
    }
}

impl GeolocationWatcher for FixedLocationWatcher {
    fn authorization_status(&self) -> AuthorizationStatus {
        self.status
            .lock()
            .map(|s| *s)
            .unwrap_or(AuthorizationStatus::NotDetermined)
    }

    fn request_authorization(&self) {
        let status = if self.grant_on_request {
            AuthorizationStatus::Authorized
        } else {
            AuthorizationStatus::Denied
        };
        if let Ok(mut current) = self.status.lock() {
            *current = status;
        }
        self.notify(|handle| {
            handle.authorization_changed(status);
        });
    }

    fn request_location(&self) {
        if !self.authorization_status().is_granted() {
            self.notify(|handle| {
                handle.location_failed("location requested without authorization");
            });
            return;
        }

        let fix = self.fix;
        self.notify(|handle| match fix {
            Some(coordinate) => {
                handle.location_updated(Some(coordinate));
            }
            None => {
                handle.location_failed("no location fix available");
            }
        });
    }

    fn subscribe(&self, handle: DiscoveryHandle) {
        if let Ok(mut subscriber) = self.subscriber.lock() {
            *subscriber = Some(handle);
        }
    }
}
