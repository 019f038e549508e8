//! Token relation records and their strict decoding.
//!
//! The token table stores every user/device pairing twice, once keyed by user
//! and once keyed by device token. Keys are composite strings of the form
//! `<kind>#<value>`.

use crate::domain::push::Platform;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

pub const USER_KEY_KIND: &str = "user";
pub const DEVICE_TOKEN_KEY_KIND: &str = "deviceToken";

const KEY_DELIMITER: char = '#';

/// A store item reduced to its string-typed attributes.
pub type StoreRecord = HashMap<String, String>;

/// Result of a key query against the token store.
///
/// `items` is `None` when the store omitted the item collection entirely,
/// which is distinct from a query that matched nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryPage {
    pub items: Option<Vec<StoreRecord>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordRejection {
    #[error("missing string attribute `{0}`")]
    MissingField(&'static str),
    #[error("attribute `{field}` is not a composite key: {value:?}")]
    MalformedKey { field: &'static str, value: String },
}

/// Which side of the relation a decoded view was looked up by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TokenEntity {
    User,
    DeviceToken,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserToken {
    pub entity: TokenEntity,
    pub user_id: String,
    pub device_token: String,
    pub platform: Platform,
    pub endpoint_arn: String,
    pub created_at: String,
    pub subscription_arn: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceToken {
    pub entity: TokenEntity,
    pub device_token: String,
    pub user_id: String,
    pub platform: Platform,
    pub endpoint_arn: String,
    pub created_at: String,
    pub subscription_arn: String,
}

/// Builds the composite key `<kind>#<value>`.
#[must_use]
pub fn composite_key(kind: &str, value: &str) -> String {
    format!("{kind}{KEY_DELIMITER}{value}")
}

/// Returns the value part of a composite key, or `None` unless the key has
/// exactly one delimiter.
#[must_use]
pub fn decode_composite_key(key: &str) -> Option<&str> {
    let mut parts = key.split(KEY_DELIMITER);
    let (_kind, value) = (parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }
    Some(value)
}

/// A record whose shape has been validated; keys are already decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRecord {
    pub partition_value: String,
    pub sort_value: String,
    pub platform: Platform,
    pub endpoint_arn: String,
    pub created_at: String,
    pub subscription_arn: String,
}

impl TokenRecord {
    /// Validates a raw store record.
    ///
    /// # Errors
    /// Returns `RecordRejection` if a required attribute is missing or either key is malformed.
    pub fn decode(record: &StoreRecord) -> Result<Self, RecordRejection> {
        let pk = required(record, "pk")?;
        let sk = required(record, "sk")?;
        let platform = required(record, "platform")?;
        let endpoint_arn = required(record, "endpointArn")?;
        let created_at = required(record, "createdAt")?;
        let subscription_arn = required(record, "subscriptionArn")?;

        Ok(Self {
            partition_value: key_value("pk", pk)?.to_string(),
            sort_value: key_value("sk", sk)?.to_string(),
            platform: Platform::from(platform),
            endpoint_arn: endpoint_arn.to_string(),
            created_at: created_at.to_string(),
            subscription_arn: subscription_arn.to_string(),
        })
    }

    /// Interprets the record as stored under `user#<id>`.
    #[must_use]
    pub fn into_user_token(self) -> UserToken {
        UserToken {
            entity: TokenEntity::User,
            user_id: self.partition_value,
            device_token: self.sort_value,
            platform: self.platform,
            endpoint_arn: self.endpoint_arn,
            created_at: self.created_at,
            subscription_arn: self.subscription_arn,
        }
    }

    /// Interprets the record as stored under `deviceToken#<token>`.
    #[must_use]
    pub fn into_device_token(self) -> DeviceToken {
        DeviceToken {
            entity: TokenEntity::DeviceToken,
            device_token: self.partition_value,
            user_id: self.sort_value,
            platform: self.platform,
            endpoint_arn: self.endpoint_arn,
            created_at: self.created_at,
            subscription_arn: self.subscription_arn,
        }
    }
}

fn required<'a>(record: &'a StoreRecord, field: &'static str) -> Result<&'a str, RecordRejection> {
    record.get(field).map(String::as_str).ok_or(RecordRejection::MissingField(field))
}

fn key_value<'a>(field: &'static str, key: &'a str) -> Result<&'a str, RecordRejection> {
    decode_composite_key(key).ok_or_else(|| RecordRejection::MalformedKey { field, value: key.to_string() })
}
