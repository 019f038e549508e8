use crate::domain::push::{MessageSpec, PublishReceipt};
use crate::error::Result;
use async_trait::async_trait;

pub mod message;
pub mod sns;

pub use message::SnsMessageFactory;
pub use sns::SnsPublisher;

/// Managed pub/sub broker that delivers the serialized message.
///
/// A returned `None` means the broker accepted the call but reported nothing back.
#[async_trait]
pub trait PushPublisher: Send + Sync + std::fmt::Debug {
    /// Publishes directly to a single registered device endpoint.
    ///
    /// # Errors
    /// Returns `AppError::Provider` if the broker call fails.
    async fn publish_to_endpoint(&self, endpoint_arn: &str, message: &str) -> Result<Option<PublishReceipt>>;

    /// Publishes once to a topic, fanning out to every subscribed endpoint.
    ///
    /// # Errors
    /// Returns `AppError::Provider` if the broker call fails.
    async fn publish_to_topic(&self, topic_arn: &str, message: &str) -> Result<Option<PublishReceipt>>;

    /// Verifies the given topic is reachable.
    async fn ping(&self, topic_arn: &str) -> Result<()>;
}

/// Serializes notification content into the broker's wire format.
pub trait MessageFactory: Send + Sync + std::fmt::Debug {
    /// # Errors
    /// Returns `AppError::Message` if the payload cannot be serialized.
    fn build_message(&self, spec: &MessageSpec<'_>) -> Result<String>;
}
