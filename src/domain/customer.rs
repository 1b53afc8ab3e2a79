//! Customer record.

use serde::{Deserialize, Serialize};

use super::Coordinates;

/// A customer of the delivery operation.
///
/// `name` is the natural key: the dashboard creates and updates customers by
/// name, never by store identifier. `id` is assigned only by the record store
/// and is absent on inbound payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(rename = "nome")]
    pub name: String,

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
}

impl Customer {
    /// A customer with only the natural key set; used as a payload seed.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            phone: None,
            city: None,
            district: None,
            street: None,
            number: None,
            coordinates: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_wire_field_names() {
        let json = r#"{
            "nome": "Ana",
            "telefone": "11999990000",
            "cidade": "São Paulo",
            "bairro": "Centro",
            "rua": "Rua A",
            "numero": "10"
        }"#;
        let customer: Customer = serde_json::from_str(json).unwrap();
        assert_eq!(customer.name, "Ana");
        assert_eq!(customer.phone.as_deref(), Some("11999990000"));
        assert!(customer.id.is_none());
    }

    #[test]
    fn missing_name_is_rejected() {
        let json = r#"{"telefone": "11999990000"}"#;
        assert!(serde_json::from_str::<Customer>(json).is_err());
    }

    #[test]
    fn absent_optionals_are_omitted_from_output() {
        let customer = Customer::named("Bruno");
        let json = serde_json::to_string(&customer).unwrap();
        assert!(!json.contains("telefone"));
        assert!(!json.contains("id"));
        assert!(json.contains(r#""nome":"Bruno""#));
    }
}
