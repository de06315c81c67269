//! Customer record types.
//!
//! Field names follow the remote service's JSON contract (`nome`, `sobreNome`,
//! `endereco`, `telefones`, ...) through explicit serde renames, while the Rust
//! side uses descriptive English names.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use super::id::CustomerId;

// =============================================================================
// Customer
// =============================================================================

/// A customer record.
///
/// `id` is `None` for records that have not been persisted yet and is assigned
/// by the server on creation. The client never reassigns it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Server-assigned identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<CustomerId>,
    /// First name.
    #[serde(rename = "nome", default, deserialize_with = "null_as_default")]
    pub first_name: String,
    /// Last name.
    #[serde(rename = "sobreNome", default, deserialize_with = "null_as_default")]
    pub last_name: String,
    /// Email address. `None` is sent as JSON `null`, never as an empty string.
    #[serde(default)]
    pub email: Option<String>,
    /// Postal address.
    #[serde(rename = "endereco", default, deserialize_with = "null_as_default")]
    pub address: Address,
    /// Phone numbers, in the order they were entered.
    #[serde(rename = "telefones", default, deserialize_with = "null_as_default")]
    pub phones: Vec<Phone>,
}

impl Customer {
    /// Returns a copy of this record without its identifier.
    ///
    /// Used as the payload for creation, where the server assigns the id.
    #[must_use]
    pub fn without_id(&self) -> Self {
        Self {
            id: None,
            ..self.clone()
        }
    }

    /// Full name as shown in listings.
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Phones formatted as `(area) number`, joined with `", "`.
    #[must_use]
    pub fn phone_summary(&self) -> String {
        self.phones
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

// =============================================================================
// Address
// =============================================================================

/// Postal address of a customer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// State.
    #[serde(rename = "estado", default, deserialize_with = "null_as_default")]
    pub state: String,
    /// City.
    #[serde(rename = "cidade", default, deserialize_with = "null_as_default")]
    pub city: String,
    /// Neighborhood.
    #[serde(rename = "bairro", default, deserialize_with = "null_as_default")]
    pub neighborhood: String,
    /// Street.
    #[serde(rename = "rua", default, deserialize_with = "null_as_default")]
    pub street: String,
    /// Street number (free text, e.g. "12B").
    #[serde(rename = "numero", default, deserialize_with = "null_as_default")]
    pub number: String,
    /// Postal code.
    #[serde(
        rename = "codigoPostal",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub postal_code: Option<String>,
    /// Free-text additional information.
    #[serde(
        rename = "informacoesAdicionais",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub additional_info: Option<String>,
}

// =============================================================================
// Phone
// =============================================================================

/// A phone number with its area code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phone {
    /// Area code (DDD).
    #[serde(rename = "ddd", default, deserialize_with = "null_as_default")]
    pub area_code: String,
    /// Subscriber number.
    #[serde(rename = "numero", default, deserialize_with = "null_as_default")]
    pub number: String,
}

impl Phone {
    /// Create a phone from its parts.
    #[must_use]
    pub fn new(area_code: impl Into<String>, number: impl Into<String>) -> Self {
        Self {
            area_code: area_code.into(),
            number: number.into(),
        }
    }

    /// Whether both the area code and the number are filled in.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.area_code.is_empty() && !self.number.is_empty()
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}) {}", self.area_code, self.number)
    }
}

/// Errors that can occur when parsing a [`Phone`] from `AREA:NUMBER`.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneParseError {
    /// The input has no `:` separator.
    #[error("phone must be written as AREA:NUMBER")]
    MissingSeparator,
    /// The area code part is empty.
    #[error("phone area code cannot be empty")]
    EmptyAreaCode,
    /// The number part is empty.
    #[error("phone number cannot be empty")]
    EmptyNumber,
}

impl FromStr for Phone {
    type Err = PhoneParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (area_code, number) = s
            .split_once(':')
            .ok_or(PhoneParseError::MissingSeparator)?;
        let (area_code, number) = (area_code.trim(), number.trim());

        if area_code.is_empty() {
            return Err(PhoneParseError::EmptyAreaCode);
        }
        if number.is_empty() {
            return Err(PhoneParseError::EmptyNumber);
        }

        Ok(Self::new(area_code, number))
    }
}

// =============================================================================
// Serde helpers
// =============================================================================

/// Decode a nullable field, mapping `null` to the type's default value.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn sample() -> Customer {
        Customer {
            id: Some(CustomerId::new(3)),
            first_name: "Ana".to_string(),
            last_name: "Souza".to_string(),
            email: None,
            address: Address {
                state: "SP".to_string(),
                city: "Campinas".to_string(),
                neighborhood: "Centro".to_string(),
                street: "Rua A".to_string(),
                number: "10".to_string(),
                postal_code: Some("13000-000".to_string()),
                additional_info: None,
            },
            phones: vec![Phone::new("19", "99999-0000")],
        }
    }

    #[test]
    fn test_serializes_wire_field_names() {
        let value = serde_json::to_value(sample()).unwrap();

        assert_eq!(value["id"], json!(3));
        assert_eq!(value["nome"], json!("Ana"));
        assert_eq!(value["sobreNome"], json!("Souza"));
        assert_eq!(value["endereco"]["codigoPostal"], json!("13000-000"));
        assert_eq!(value["telefones"][0]["ddd"], json!("19"));
        assert!(value["endereco"].get("informacoesAdicionais").is_none());
    }

    #[test]
    fn test_absent_email_is_null_not_empty() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["email"], serde_json::Value::Null);
    }

    #[test]
    fn test_without_id_omits_id_field() {
        let value = serde_json::to_value(sample().without_id()).unwrap();
        assert!(value.get("id").is_none());
    }

    #[test]
    fn test_decodes_nulls_and_ignores_unknown_fields() {
        let customer: Customer = serde_json::from_value(json!({
            "id": 9,
            "nome": null,
            "sobreNome": "Lima",
            "email": "lima@example.com",
            "endereco": { "id": 4, "estado": "RJ", "cidade": null },
            "telefones": null,
            "dataCadastro": "2024-01-01"
        }))
        .unwrap();

        assert_eq!(customer.id, Some(CustomerId::new(9)));
        assert_eq!(customer.first_name, "");
        assert_eq!(customer.address.state, "RJ");
        assert_eq!(customer.address.city, "");
        assert!(customer.phones.is_empty());
    }

    #[test]
    fn test_phone_summary() {
        let mut customer = sample();
        customer.phones.push(Phone::new("11", "3333-4444"));
        assert_eq!(customer.phone_summary(), "(19) 99999-0000, (11) 3333-4444");
    }

    #[test]
    fn test_display_name_trims_missing_parts() {
        let mut customer = sample();
        customer.last_name = String::new();
        assert_eq!(customer.display_name(), "Ana");
    }

    #[test]
    fn test_phone_from_str() {
        assert_eq!(
            "11:98765-4321".parse::<Phone>().unwrap(),
            Phone::new("11", "98765-4321")
        );
        assert_eq!(
            "1198765".parse::<Phone>(),
            Err(PhoneParseError::MissingSeparator)
        );
        assert_eq!(":123".parse::<Phone>(), Err(PhoneParseError::EmptyAreaCode));
        assert_eq!("11: ".parse::<Phone>(), Err(PhoneParseError::EmptyNumber));
    }

    #[test]
    fn test_phone_is_complete() {
        assert!(Phone::new("11", "1234").is_complete());
        assert!(!Phone::new("11", "").is_complete());
        assert!(!Phone::default().is_complete());
        assert!(Phone::new(" ", " ").is_complete());
    }
}
