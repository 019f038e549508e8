use crate::adapters::push::{MessageFactory, PushPublisher};
use crate::config::NotificationConfig;
use crate::domain::push::{MessageSpec, Platform, PushMessage, PushResult, PushTarget, TopicKind};
use crate::error::{AppError, Result};
use opentelemetry::{KeyValue, global, metrics::Counter};
use std::sync::Arc;

#[derive(Clone, Debug)]
struct Metrics {
    sent: Counter<u64>,
    unconfirmed: Counter<u64>,
    unrecognized_platform: Counter<u64>,
}

impl Metrics {
    fn new() -> Self {
        let meter = global::meter("push-relay");
        Self {
            sent: meter
                .u64_counter("push_sent_total")
                .with_description("Total number of pushes accepted by the broker with a message id")
                .build(),
            unconfirmed: meter
                .u64_counter("push_unconfirmed_total")
                .with_description("Total number of publishes that returned no message id")
                .build(),
            unrecognized_platform: meter
                .u64_counter("push_unrecognized_platform_total")
                .with_description("Total number of direct pushes skipped because of an unknown platform")
                .build(),
        }
    }
}

/// Dispatcher settings, validated once at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DispatchConfig {
    all_topic_arn: String,
    ios_topic_kind: TopicKind,
    android_topic_kind: TopicKind,
}

impl DispatchConfig {
    /// # Errors
    /// Returns `AppError::Config` if the broadcast topic ARN is missing or blank.
    pub fn new(all_topic_arn: Option<String>, ios_topic_kind: TopicKind, android_topic_kind: TopicKind) -> Result<Self> {
        let all_topic_arn = all_topic_arn
            .filter(|arn| !arn.trim().is_empty())
            .ok_or_else(|| AppError::Config("ALL_TOPIC_ARN is not defined".into()))?;

        Ok(Self { all_topic_arn, ios_topic_kind, android_topic_kind })
    }

    /// # Errors
    /// Returns `AppError::Config` if the broadcast topic ARN is missing or blank.
    pub fn from_config(config: &NotificationConfig) -> Result<Self> {
        Self::new(config.all_topic_arn.clone(), config.ios_topic_kind, config.android_topic_kind)
    }

    #[must_use]
    pub fn all_topic_arn(&self) -> &str {
        &self.all_topic_arn
    }

    /// Topic kind used for direct pushes; `None` for platforms that cannot be served.
    #[must_use]
    pub fn topic_kind_for(&self, platform: &Platform) -> Option<TopicKind> {
        match platform {
            Platform::Ios => Some(self.ios_topic_kind),
            Platform::Android => Some(self.android_topic_kind),
            Platform::Unrecognized(_) => None,
        }
    }
}

/// Builds provider messages and publishes them to a device endpoint or the broadcast topic.
#[derive(Clone, Debug)]
pub struct NotificationService {
    publisher: Arc<dyn PushPublisher>,
    messages: Arc<dyn MessageFactory>,
    config: DispatchConfig,
    metrics: Metrics,
}

impl NotificationService {
    #[must_use]
    pub fn new(publisher: Arc<dyn PushPublisher>, messages: Arc<dyn MessageFactory>, config: DispatchConfig) -> Self {
        Self { publisher, messages, config, metrics: Metrics::new() }
    }

    /// Pushes a message to a single device.
    ///
    /// Returns `Ok(None)` without publishing if the platform is unrecognized,
    /// or if the broker reported no message id.
    ///
    /// # Errors
    /// Returns an error if message construction or the publish call fails.
    #[tracing::instrument(
        level = "debug",
        skip(self, message, target),
        fields(platform = %target.platform, endpoint_arn = %target.endpoint_arn)
    )]
    pub async fn push_to_platform(&self, message: &PushMessage, target: &PushTarget) -> Result<Option<PushResult>> {
        let Some(topic) = self.config.topic_kind_for(&target.platform) else {
            tracing::error!(
                platform = %target.platform,
                endpoint_arn = %target.endpoint_arn,
                title = %message.title,
                "Platform is not supported, skipping push"
            );
            self.metrics.unrecognized_platform.add(1, &[]);
            return Ok(None);
        };

        let payload = self.messages.build_message(&MessageSpec::new(topic, message))?;
        self.publish(&target.endpoint_arn, &payload, false).await
    }

    /// Pushes a message to every device subscribed to the broadcast topic.
    ///
    /// # Errors
    /// Returns an error if message construction or the publish call fails.
    #[tracing::instrument(level = "debug", skip(self, message))]
    pub async fn push_to_all_topic(&self, message: &PushMessage) -> Result<Option<PushResult>> {
        let payload = self.messages.build_message(&MessageSpec::new(TopicKind::All, message))?;
        self.publish(self.config.all_topic_arn(), &payload, true).await
    }

    async fn publish(&self, target_arn: &str, message: &str, broadcast: bool) -> Result<Option<PushResult>> {
        let receipt = if broadcast {
            self.publisher.publish_to_topic(target_arn, message).await?
        } else {
            self.publisher.publish_to_endpoint(target_arn, message).await?
        };

        let path = if broadcast { "topic" } else { "endpoint" };
        match receipt.and_then(|r| r.message_id) {
            Some(message_id) => {
                tracing::debug!(message_id = %message_id, path, "Push accepted by broker");
                self.metrics.sent.add(1, &[KeyValue::new("path", path)]);
                Ok(Some(PushResult { message_id }))
            }
            None => {
                tracing::warn!(target_arn = %target_arn, path, "Broker returned no message id");
                self.metrics.unconfirmed.add(1, &[KeyValue::new("path", path)]);
                Ok(None)
            }
        }
    }
}
