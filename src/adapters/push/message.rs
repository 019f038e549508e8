//! SNS message construction.
//!
//! Publishes use `MessageStructure=json`: the message is a JSON object whose
//! keys are delivery protocols and whose values are the per-protocol payloads,
//! themselves encoded as JSON strings.

use crate::adapters::push::MessageFactory;
use crate::domain::push::{MessageSpec, TopicKind};
use crate::error::{AppError, Result};
use serde_json::{Map, Value, json};

#[derive(Clone, Copy, Debug, Default)]
pub struct SnsMessageFactory;

impl SnsMessageFactory {
    fn link_data(spec: &MessageSpec<'_>) -> Map<String, Value> {
        let mut data = Map::new();
        if let Some(deep_link) = spec.deep_link {
            data.insert("deepLink".into(), Value::from(deep_link));
        }
        if let Some(web_link) = spec.web_link {
            data.insert("webLink".into(), Value::from(web_link));
        }
        data
    }

    fn apns_payload(spec: &MessageSpec<'_>) -> Value {
        let mut payload = json!({
            "aps": {
                "alert": {
                    "title": spec.title,
                    "body": spec.content,
                },
                "sound": "default",
            }
        });
        let data = Self::link_data(spec);
        if !data.is_empty() {
            payload["data"] = Value::Object(data);
        }
        payload
    }

    fn gcm_payload(spec: &MessageSpec<'_>) -> Value {
        let mut payload = json!({
            "notification": {
                "title": spec.title,
                "body": spec.content,
            }
        });
        let data = Self::link_data(spec);
        if !data.is_empty() {
            payload["data"] = Value::Object(data);
        }
        payload
    }
}

impl MessageFactory for SnsMessageFactory {
    fn build_message(&self, spec: &MessageSpec<'_>) -> Result<String> {
        let encode = |payload: &Value| serde_json::to_string(payload).map_err(|e| AppError::Message(e.to_string()));

        let mut message = Map::new();
        message.insert("default".into(), Value::from(spec.content));

        if matches!(spec.topic, TopicKind::Apns | TopicKind::All) {
            let apns = encode(&Self::apns_payload(spec))?;
            message.insert("APNS".into(), Value::from(apns.clone()));
            message.insert("APNS_SANDBOX".into(), Value::from(apns));
        }
        if matches!(spec.topic, TopicKind::Fcm | TopicKind::All) {
            message.insert("GCM".into(), Value::from(encode(&Self::gcm_payload(spec))?));
        }

        encode(&Value::Object(message))
    }
}
