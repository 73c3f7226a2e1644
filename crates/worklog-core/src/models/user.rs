//! User domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered user. Created once through onboarding and never
/// modified afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub surname: String,
    pub name: String,
    pub patronymic: String,
    pub address: String,
    /// Four-digit passport serie (0..=9999).
    pub passport_serie: u16,
    /// Six-digit passport number (0..=999999).
    pub passport_number: u32,
    pub created_at: DateTime<Utc>,
}

/// Validated onboarding request: the passport pair to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddUser {
    pub passport_serie: u16,
    pub passport_number: u32,
}

/// Biographical fields returned by the identity lookup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IdentityInfo {
    pub name: String,
    pub surname: String,
    pub patronymic: String,
    pub address: String,
}

#[derive(Debug, Clone)]
pub struct CreateUser {
    pub surname: String,
    pub name: String,
    pub patronymic: String,
    pub address: String,
    pub passport_serie: u16,
    pub passport_number: u32,
}

impl CreateUser {
    pub fn from_identity(passport: AddUser, info: IdentityInfo) -> Self {
        Self {
            surname: info.surname,
            name: info.name,
            patronymic: info.patronymic,
            address: info.address,
            passport_serie: passport.passport_serie,
            passport_number: passport.passport_number,
        }
    }
}

/// Case-insensitive prefix filters for user listing. Unset fields
/// do not constrain the result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    pub surname: Option<String>,
    pub name: Option<String>,
    pub patronymic: Option<String>,
    pub address: Option<String>,
}

impl UserFilter {
    /// Returns `(column, lowercase prefix)` pairs for every set,
    /// non-empty filter.
    pub fn prefixes(&self) -> Vec<(&'static str, String)> {
        [
            ("surname", &self.surname),
            ("name", &self.name),
            ("patronymic", &self.patronymic),
            ("address", &self.address),
        ]
        .into_iter()
        .filter_map(|(column, value)| {
            value
                .as_deref()
                .filter(|v| !v.is_empty())
                .map(|v| (column, v.to_lowercase()))
        })
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_prefixes_do_not_constrain() {
        let filter = UserFilter {
            surname: Some(String::new()),
            name: Some("Ann".into()),
            ..Default::default()
        };
        assert_eq!(filter.prefixes(), vec![("name", "ann".to_string())]);
    }

    #[test]
    fn prefixes_skip_unset_fields_and_lowercase() {
        let filter = UserFilter {
            surname: Some("SMITH".into()),
            address: Some("Main St".into()),
            ..Default::default()
        };
        assert_eq!(
            filter.prefixes(),
            vec![("surname", "smith".to_string()), ("address", "main st".to_string())]
        );
        assert!(UserFilter::default().prefixes().is_empty());
    }

    #[test]
    fn user_serializes_camel_case() {
        let user = User {
            id: Uuid::nil(),
            surname: "Smith".into(),
            name: "John".into(),
            patronymic: "J".into(),
            address: "1 Main St".into(),
            passport_serie: 1234,
            passport_number: 567890,
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["passportSerie"], 1234);
        assert_eq!(json["passportNumber"], 567890);
        assert!(json.get("createdAt").is_some());
    }
}
