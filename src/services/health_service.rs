use crate::adapters::database::TokenStore;
use crate::adapters::push::PushPublisher;
use opentelemetry::{KeyValue, global, metrics::Gauge};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

#[derive(Clone, Debug)]
pub struct Metrics {
    pub status: Gauge<i64>,
}

impl Metrics {
    #[must_use]
    pub(crate) fn new() -> Self {
        let meter = global::meter("push-relay");
        Self {
            status: meter
                .i64_gauge("push_relay_health_status")
                .with_description("Status of health checks (1 for ok, 0 for error)")
                .build(),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug)]
pub struct HealthService {
    store: Arc<dyn TokenStore>,
    publisher: Arc<dyn PushPublisher>,
    all_topic_arn: String,
    check_timeout: Duration,
    metrics: Metrics,
}

impl HealthService {
    #[must_use]
    pub fn new(
        store: Arc<dyn TokenStore>,
        publisher: Arc<dyn PushPublisher>,
        all_topic_arn: String,
        check_timeout: Duration,
    ) -> Self {
        Self { store, publisher, all_topic_arn, check_timeout, metrics: Metrics::new() }
    }

    /// Checks that the token table is reachable.
    ///
    /// # Errors
    /// Returns a string describing the failure if the table is unreachable.
    pub async fn check_store(&self) -> Result<(), String> {
        let result = match timeout(self.check_timeout, self.store.ping()).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(format!("Token table check failed: {e}")),
            Err(_) => Err("Token table check timed out".to_string()),
        };
        self.record("token_store", result.is_ok());
        result
    }

    /// Checks that the broadcast topic is reachable.
    ///
    /// # Errors
    /// Returns a string describing the failure if the topic is unreachable.
    pub async fn check_broker(&self) -> Result<(), String> {
        let result = match timeout(self.check_timeout, self.publisher.ping(&self.all_topic_arn)).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(format!("Broadcast topic check failed: {e}")),
            Err(_) => Err("Broadcast topic check timed out".to_string()),
        };
        self.record("broker", result.is_ok());
        result
    }

    fn record(&self, component: &'static str, ok: bool) {
        self.metrics.status.record(i64::from(ok), &[KeyValue::new("component", component)]);
    }
}
