use crate::domain::events::DiscoveryHandle;
use crate::domain::model::{AddressLines, AuthorizationStatus, CategorySet, Coordinate, Marker, Place};
use crate::utils::error::{DiscoveryError, Result};
use async_trait::async_trait;

/// 裝置定位來源。結果一律以事件形式送回訂閱者，協調器不會輪詢。
pub trait GeolocationWatcher: Send + Sync {
    fn authorization_status(&self) -> AuthorizationStatus;
    fn request_authorization(&self);
    /// 要求一次定位，結果以 `LocationUpdated` 或 `LocationFailed` 送達
    fn request_location(&self);
    fn subscribe(&self, handle: DiscoveryHandle);
}

#[async_trait]
pub trait PlacesDataProvider: Send + Sync {
    async fn search(
        &self,
        near: Coordinate,
        radius_meters: f64,
        categories: &CategorySet,
    ) -> Result<Vec<Place>>;
}

#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    async fn resolve(&self, coordinate: Coordinate) -> Result<AddressLines>;
}

/// 地圖繪製目標。由協調器獨占持有，只在事件迴圈內被修改。
pub trait MapSurface: Send {
    fn clear_markers(&mut self);
    fn add_marker(&mut self, marker: Marker);
    fn set_camera(&mut self, target: Coordinate, zoom: f32);
    fn enable_live_location_indicator(&mut self, enabled: bool);
    fn current_viewport_center(&self) -> Coordinate;
}

pub trait AddressDisplay: Send {
    fn show_address(&mut self, text: &str);
}

pub trait FilterSelectionUi: Send {
    fn present(&mut self, preselected: &CategorySet);
    fn dismiss(&mut self);
}

/// 接收協調器回報的錯誤（日誌、遙測）
pub trait DiscoveryObserver: Send + Sync {
    fn report(&self, error: &DiscoveryError);
}
