use crate::domain::model::{CategorySet, Marker, MarkerStyle, Place, DEFAULT_CATEGORIES};
use std::collections::BTreeSet;

pub const DEFAULT_FALLBACK_ICON: &str = "default_pin";
const ICON_SUFFIX: &str = "_pin";
const PIN_ANCHOR: (f32, f32) = (0.5, 1.0);

/// 由地點與當下啟用的類別建立地圖標記。沒有副作用，同樣的輸入一定得到同樣的標記。
#[derive(Debug, Clone)]
pub struct MarkerFactory {
    known_icons: BTreeSet<String>,
    fallback_icon: String,
}

impl MarkerFactory {
    pub fn new<I, S>(known_icons: I, fallback_icon: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            known_icons: known_icons.into_iter().map(Into::into).collect(),
            fallback_icon: fallback_icon.into(),
        }
    }

    pub fn build(&self, place: &Place, active: &CategorySet) -> Marker {
        // 依地點本身的類別順序，取第一個目前有啟用的類別
        let category = place
            .categories
            .iter()
            .find(|c| active.contains(c))
            .cloned();

        let icon = match &category {
            Some(c) if self.known_icons.contains(c) => format!("{}{}", c, ICON_SUFFIX),
            _ => self.fallback_icon.clone(),
        };

        Marker {
            place_id: place.id.clone(),
            position: place.coordinate,
            title: place.name.clone(),
            snippet: place.address.clone().unwrap_or_default(),
            style: MarkerStyle { category, icon },
            anchor: PIN_ANCHOR,
        }
    }
}

impl Default for MarkerFactory {
    fn default() -> Self {
        Self::new(DEFAULT_CATEGORIES, DEFAULT_FALLBACK_ICON)
    }
}
