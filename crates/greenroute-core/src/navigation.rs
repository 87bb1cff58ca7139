//! Turn-by-turn hand-off for the stop the driver is on.

use serde::{Deserialize, Serialize};

use crate::stop::StopView;

const DIRECTIONS_URL: &str = "https://www.google.com/maps/dir/?api=1";

/// Where to drive next, with a directions link for a maps app.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Navigation {
    pub latitude: f64,
    pub longitude: f64,
    pub address: String,
    pub customer_name: String,
    /// 1-based position within the route.
    pub position: u32,
    pub is_last: bool,
    pub url: String,
}

impl Navigation {
    /// `None` when the stop has no coordinates.
    pub fn for_stop(view: &StopView) -> Option<Self> {
        let (latitude, longitude) = (view.latitude?, view.longitude?);
        Some(Self {
            latitude,
            longitude,
            address: view.address.clone(),
            customer_name: view.customer_name.clone(),
            position: view.position,
            is_last: view.is_last,
            url: directions_url(latitude, longitude, &view.address),
        })
    }
}

pub fn directions_url(latitude: f64, longitude: f64, address: &str) -> String {
    format!(
        "{DIRECTIONS_URL}&destination={latitude},{longitude}&destination_place_id={}",
        urlencoding::encode(address)
    )
}
