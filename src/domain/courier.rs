//! Courier ("entregador") record.

use serde::{Deserialize, Serialize};

use super::Coordinates;

/// Courier availability states, serialized with the accented values the
/// dashboard and the store use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CourierStatus {
    #[serde(rename = "disponível")]
    Available,
    #[serde(rename = "indisponível")]
    Unavailable,
    #[serde(rename = "ocupado")]
    Busy,
    #[serde(rename = "offline")]
    Offline,
}

/// A courier carrying deliveries, tracked by live location.
///
/// `username` is the natural key used for lookup, location updates, and
/// identification. The stored secret is compared in plaintext for behavior
/// parity with the deployed system; the comparison itself is isolated behind
/// the `CredentialVerifier` port so it can be replaced without touching
/// dispatch logic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Courier {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(rename = "nome", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<CourierStatus>,

    #[serde(rename = "userName")]
    pub username: String,

    #[serde(rename = "senha", default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    #[serde(
        rename = "localizacao",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub location: Option<Coordinates>,
}

impl Courier {
    /// A courier with only the natural key set; used as a payload seed.
    pub fn with_username(username: impl Into<String>) -> Self {
        Self {
            id: None,
            name: None,
            status: None,
            username: username.into(),
            password: None,
            location: None,
        }
    }
}
