use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Platform-agnostic notification content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushMessage {
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deep_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_link: Option<String>,
}

/// A single device's delivery address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushTarget {
    pub endpoint_arn: String,
    pub platform: Platform,
}

/// Device platform as stored by the registration process.
///
/// Values other than `"iOS"` and `"Android"` are kept verbatim in
/// [`Platform::Unrecognized`] instead of failing deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Platform {
    Ios,
    Android,
    Unrecognized(String),
}

impl Platform {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Ios => "iOS",
            Self::Android => "Android",
            Self::Unrecognized(raw) => raw,
        }
    }
}

impl From<String> for Platform {
    fn from(value: String) -> Self {
        match value.as_str() {
            "iOS" => Self::Ios,
            "Android" => Self::Android,
            _ => Self::Unrecognized(value),
        }
    }
}

impl From<&str> for Platform {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<Platform> for String {
    fn from(value: Platform) -> Self {
        match value {
            Platform::Unrecognized(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tag handed to the message builder; selects which platform payloads are emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TopicKind {
    Apns,
    Fcm,
    All,
}

/// Input to message construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageSpec<'a> {
    pub topic: TopicKind,
    pub title: &'a str,
    pub content: &'a str,
    pub deep_link: Option<&'a str>,
    pub web_link: Option<&'a str>,
}

impl<'a> MessageSpec<'a> {
    #[must_use]
    pub fn new(topic: TopicKind, message: &'a PushMessage) -> Self {
        Self {
            topic,
            title: &message.title,
            content: &message.content,
            deep_link: message.deep_link.as_deref(),
            web_link: message.web_link.as_deref(),
        }
    }
}

/// Provider-issued identifier of an accepted publish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushResult {
    pub message_id: String,
}

/// Raw outcome of a publish call as reported by the provider.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishReceipt {
    pub message_id: Option<String>,
}
