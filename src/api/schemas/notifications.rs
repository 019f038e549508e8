use crate::domain::push::{PushMessage, PushTarget};
use serde::Deserialize;

const MAX_TITLE_LEN: usize = 256;
const MAX_CONTENT_LEN: usize = 4096;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformPushRequest {
    pub message_payload: PushMessage,
    pub endpoint_payload: PushTarget,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllTopicPushRequest {
    pub message_payload: PushMessage,
}

fn validate_message(message: &PushMessage) -> Result<(), String> {
    if message.title.chars().count() > MAX_TITLE_LEN {
        return Err(format!("Title is too long (max {MAX_TITLE_LEN} characters)"));
    }
    if message.content.chars().count() > MAX_CONTENT_LEN {
        return Err(format!("Content is too long (max {MAX_CONTENT_LEN} characters)"));
    }
    Ok(())
}

impl PlatformPushRequest {
    /// Validates the direct push payload.
    ///
    /// # Errors
    /// Returns an error if the endpoint ARN is empty or the message is oversized.
    pub fn validate(&self) -> Result<(), String> {
        if self.endpoint_payload.endpoint_arn.trim().is_empty() {
            return Err("Endpoint ARN cannot be empty".into());
        }
        validate_message(&self.message_payload)
    }
}

impl AllTopicPushRequest {
    /// Validates the broadcast payload.
    ///
    /// # Errors
    /// Returns an error if the message is oversized.
    pub fn validate(&self) -> Result<(), String> {
        validate_message(&self.message_payload)
    }
}
