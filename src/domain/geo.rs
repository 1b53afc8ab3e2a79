//! Geographic coordinates shared by customers, deliveries, and couriers.

use serde::{Deserialize, Serialize};

/// A latitude/longitude pair, serialized with the field names the dashboard
/// clients expect.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}
