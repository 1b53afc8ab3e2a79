//! Delivery record and its date/time markers.

use chrono::{Datelike, Local};
use serde::{Deserialize, Serialize};

use super::{Coordinates, StoreError};

/// A delivery scheduled or performed on a given day.
///
/// The day marker is a 3-element `[day, month, year]` array matched
/// component-wise when querying "today's deliveries". The optional time
/// marker `[hour, minute]` must have exactly two elements; the record store
/// rejects any other length.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Delivery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(rename = "dia", default, skip_serializing_if = "Option::is_none")]
    pub day: Option<Vec<i32>>,

    #[serde(rename = "nome", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(rename = "telefone", default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(rename = "cidade", default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    #[serde(rename = "bairro", default, skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,

    #[serde(rename = "rua", default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,

    #[serde(rename = "numero", default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,

    #[serde(
        rename = "coordenadas",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub coordinates: Option<Coordinates>,

    #[serde(rename = "valor", default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    #[serde(rename = "pagamento", default, skip_serializing_if = "Option::is_none")]
    pub payment: Option<String>,

    #[serde(
        rename = "statusPagamento",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub payment_status: Option<String>,

    #[serde(rename = "entregador", default, skip_serializing_if = "Option::is_none")]
    pub courier: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<String>,

    #[serde(
        rename = "observacoes",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub notes: Option<String>,

    #[serde(rename = "horario", default, skip_serializing_if = "Option::is_none")]
    pub time_of_day: Option<Vec<i32>>,

    #[serde(
        rename = "statusMensagem",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub message_status: Option<String>,
}

/// Today's `[day, month, year]` marker in local time.
pub fn today_marker() -> Vec<i32> {
    let now = Local::now();
    vec![now.day() as i32, now.month() as i32, now.year()]
}

impl Delivery {
    /// Whether the day marker is present and well-formed (exactly 3 elements).
    pub fn has_valid_day_marker(&self) -> bool {
        matches!(&self.day, Some(marker) if marker.len() == 3)
    }

    /// Replaces an absent or malformed day marker with today's date.
    pub fn normalize_day_marker(&mut self) {
        if !self.has_valid_day_marker() {
            self.day = Some(today_marker());
        }
    }

    /// Store-layer structural check: the time marker, when present, must have
    /// exactly two elements `[hour, minute]`.
    pub fn validate_for_store(&self) -> Result<(), StoreError> {
        if let Some(time) = &self.time_of_day {
            if time.len() != 2 {
                return Err(StoreError::InvalidRecord(format!(
                    "horario must be a 2-element [hour, minute] array, got {} elements",
                    time.len()
                )));
            }
        }
        Ok(())
    }
}
