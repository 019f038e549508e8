use crate::adapters::push::PushPublisher;
use crate::domain::push::PublishReceipt;
use crate::error::{AppError, Result};
use async_trait::async_trait;
use aws_sdk_sns::Client;

/// Messages are built as per-platform JSON documents.
const MESSAGE_STRUCTURE: &str = "json";

#[derive(Clone, Debug)]
pub struct SnsPublisher {
    client: Client,
}

impl SnsPublisher {
    #[must_use]
    pub const fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PushPublisher for SnsPublisher {
    async fn publish_to_endpoint(&self, endpoint_arn: &str, message: &str) -> Result<Option<PublishReceipt>> {
        let output = self
            .client
            .publish()
            .target_arn(endpoint_arn)
            .message(message)
            .message_structure(MESSAGE_STRUCTURE)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = ?e, endpoint_arn = %endpoint_arn, "SNS endpoint publish failed");
                AppError::provider(e)
            })?;

        Ok(Some(PublishReceipt { message_id: output.message_id }))
    }

    async fn publish_to_topic(&self, topic_arn: &str, message: &str) -> Result<Option<PublishReceipt>> {
        let output = self
            .client
            .publish()
            .topic_arn(topic_arn)
            .message(message)
            .message_structure(MESSAGE_STRUCTURE)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = ?e, topic_arn = %topic_arn, "SNS topic publish failed");
                AppError::provider(e)
            })?;

        Ok(Some(PublishReceipt { message_id: output.message_id }))
    }

    async fn ping(&self, topic_arn: &str) -> Result<()> {
        self.client.get_topic_attributes().topic_arn(topic_arn).send().await.map_err(AppError::provider)?;
        Ok(())
    }
}
