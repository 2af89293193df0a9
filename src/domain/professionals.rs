use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::directory::Coordinates;

/// A published service provider listing.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Professional {
    pub id: Uuid,
    pub name: String,
    /// Service catalog id (e.g. "plumbing")
    pub service_id: String,
    /// Cities this provider serves
    pub service_cities: Vec<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub rating: f64,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl Professional {
    pub fn coordinates(&self) -> Option<Coordinates> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Some(Coordinates { lat, lng }),
            _ => None,
        }
    }
}

/// Directory entry enriched with the distance from a caller-supplied origin.
#[derive(Debug, Clone, Serialize)]
pub struct NearbyProfessional {
    #[serde(flatten)]
    pub professional: Professional,
    /// Great-circle distance from the requested origin, in kilometers
    pub distance_km: f64,
}
