//! Customer record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A customer, either a standalone record in the customers collection or
/// embedded in an order.
///
/// Clients historically sent the order customer as either a bare display
/// string or a full object; both shapes deserialize into this one type
/// (a string becomes a name-only customer), so the loose form never
/// persists.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Customer {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            email: None,
            phone: None,
            address: None,
            created_at: None,
        }
    }
}

impl<'de> Deserialize<'de> for Customer {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Fields {
            id: Option<String>,
            name: String,
            email: Option<String>,
            phone: Option<String>,
            address: Option<String>,
            created_at: Option<DateTime<Utc>>,
        }

        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Name(String),
            Full(Fields),
        }

        Ok(match Repr::deserialize(deserializer)? {
            Repr::Name(name) => Customer::named(name),
            Repr::Full(f) => Customer {
                id: f.id,
                name: f.name,
                email: f.email,
                phone: f.phone,
                address: f.address,
                created_at: f.created_at,
            },
        })
    }
}
