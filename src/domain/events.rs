use crate::domain::model::{AddressLines, AuthorizationStatus, CategorySet, Coordinate, Place};
use crate::utils::error::Result;
use chrono::{DateTime, Utc};
use tokio::sync::mpsc;

/// 協調器唯一的輸入。外部事件來源與非同步呼叫的完成通知都走同一個佇列，
/// 由 `DiscoveryCoordinator::run` 依序處理。
#[derive(Debug)]
pub enum DiscoveryEvent {
    AuthorizationChanged(AuthorizationStatus),
    LocationUpdated {
        coordinate: Option<Coordinate>,
        timestamp: DateTime<Utc>,
    },
    LocationFailed(String),
    ViewportSettled(Coordinate),
    ManualRefresh,
    OpenFilterSelection,
    FilterCommitted(CategorySet),
    PlacesLoaded {
        generation: u64,
        result: Result<Vec<Place>>,
    },
    AddressResolved {
        coordinate: Coordinate,
        result: Result<AddressLines>,
    },
    Shutdown,
}

impl DiscoveryEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AuthorizationChanged(_) => "authorization_changed",
            Self::LocationUpdated { .. } => "location_updated",
            Self::LocationFailed(_) => "location_failed",
            Self::ViewportSettled(_) => "viewport_settled",
            Self::ManualRefresh => "manual_refresh",
            Self::OpenFilterSelection => "open_filter_selection",
            Self::FilterCommitted(_) => "filter_committed",
            Self::PlacesLoaded { .. } => "places_loaded",
            Self::AddressResolved { .. } => "address_resolved",
            Self::Shutdown => "shutdown",
        }
    }
}

/// 投遞事件到協調器佇列的句柄。協調器結束後投遞會被靜默丟棄。
#[derive(Debug, Clone)]
pub struct DiscoveryHandle {
    sender: mpsc::UnboundedSender<DiscoveryEvent>,
}

pub type DiscoveryInbox = mpsc::UnboundedReceiver<DiscoveryEvent>;

impl DiscoveryHandle {
    pub fn channel() -> (Self, DiscoveryInbox) {
        let (sender, inbox) = mpsc::unbounded_channel();
        (Self { sender }, inbox)
    }

    pub fn send(&self, event: DiscoveryEvent) -> bool {
        let kind = event.kind();
        match self.sender.send(event) {
            Ok(()) => true,
            Err(_) => {
                tracing::debug!("Coordinator has stopped, dropping {} event", kind);
                false
            }
        }
    }

    pub fn authorization_changed(&self, status: AuthorizationStatus) -> bool {
        self.send(DiscoveryEvent::AuthorizationChanged(status))
    }

    pub fn location_updated(&self, coordinate: Option<Coordinate>) -> bool {
        self.send(DiscoveryEvent::LocationUpdated {
            coordinate,
            timestamp: Utc::now(),
        })
    }

    pub fn location_failed(&self, description: impl Into<String>) -> bool {
        self.send(DiscoveryEvent::LocationFailed(description.into()))
    }

    pub fn viewport_settled(&self, coordinate: Coordinate) -> bool {
        self.send(DiscoveryEvent::ViewportSettled(coordinate))
    }

    pub fn manual_refresh(&self) -> bool {
        self.send(DiscoveryEvent::ManualRefresh)
    }

    pub fn open_filter_selection(&self) -> bool {
        self.send(DiscoveryEvent::OpenFilterSelection)
    }

    pub fn filter_committed(&self, categories: CategorySet) -> bool {
        self.send(DiscoveryEvent::FilterCommitted(categories))
    }

    pub fn shutdown(&self) -> bool {
        self.send(DiscoveryEvent::Shutdown)
    }
}
