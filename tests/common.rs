#![allow(dead_code)]

use async_trait::async_trait;
use push_relay::adapters::database::TokenStore;
use push_relay::adapters::push::PushPublisher;
use push_relay::config::{
    AwsConfig, Config, LogFormat, NotificationConfig, ServerConfig, TableConfig, TelemetryConfig,
};
use push_relay::domain::push::{PublishReceipt, TopicKind};
use push_relay::domain::token::{QueryPage, StoreRecord};
use push_relay::error::{AppError, Result};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, Once};
use std::time::Duration;

pub const ALL_TOPIC_ARN: &str = "arn:aws:sns:us-east-1:123456789012:all-users";

static INIT: Once = Once::new();

pub fn setup_tracing() {
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "warn".into())
            .add_directive("push_relay=debug".parse().unwrap());

        tracing_subscriber::fmt().with_env_filter(filter).with_test_writer().init();
    });
}

pub fn get_test_config() -> Config {
    Config {
        server: ServerConfig { host: "127.0.0.1".into(), port: 0, mgmt_port: 0, shutdown_timeout_secs: 1 },
        aws: AwsConfig { region: "us-east-1".into(), endpoint: None, operation_timeout_ms: 1000 },
        table: TableConfig { name: "push-tokens-test".into() },
        notifications: NotificationConfig {
            all_topic_arn: Some(ALL_TOPIC_ARN.into()),
            ios_topic_kind: TopicKind::Apns,
            android_topic_kind: TopicKind::Apns,
            batch_concurrency: 4,
        },
        telemetry: TelemetryConfig { otlp_endpoint: None, log_format: LogFormat::Text },
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishPath {
    Endpoint,
    Topic,
}

#[derive(Debug, Clone)]
pub struct PublishCall {
    pub path: PublishPath,
    pub target_arn: String,
    pub message: String,
}

#[derive(Debug, Clone)]
pub enum PublishBehavior {
    MessageId(String),
    NoMessageId,
    NoReceipt,
    Fail,
}

#[derive(Debug)]
pub struct RecordingPublisher {
    behavior: PublishBehavior,
    calls: Mutex<Vec<PublishCall>>,
}

impl RecordingPublisher {
    pub fn new(behavior: PublishBehavior) -> Self {
        Self { behavior, calls: Mutex::new(Vec::new()) }
    }

    pub fn returning(message_id: &str) -> Self {
        Self::new(PublishBehavior::MessageId(message_id.to_string()))
    }

    pub fn calls(&self) -> Vec<PublishCall> {
        self.calls.lock().unwrap().clone()
    }

    fn respond(&self, path: PublishPath, target_arn: &str, message: &str) -> Result<Option<PublishReceipt>> {
        self.calls.lock().unwrap().push(PublishCall {
            path,
            target_arn: target_arn.to_string(),
            message: message.to_string(),
        });
        match &self.behavior {
            PublishBehavior::MessageId(id) => Ok(Some(PublishReceipt { message_id: Some(id.clone()) })),
            PublishBehavior::NoMessageId => Ok(Some(PublishReceipt { message_id: None })),
            PublishBehavior::NoReceipt => Ok(None),
            PublishBehavior::Fail => Err(AppError::Provider(anyhow::anyhow!("broker unavailable"))),
        }
    }
}

#[async_trait]
impl PushPublisher for RecordingPublisher {
    async fn publish_to_endpoint(&self, endpoint_arn: &str, message: &str) -> Result<Option<PublishReceipt>> {
        self.respond(PublishPath::Endpoint, endpoint_arn, message)
    }

    async fn publish_to_topic(&self, topic_arn: &str, message: &str) -> Result<Option<PublishReceipt>> {
        self.respond(PublishPath::Topic, topic_arn, message)
    }

    async fn ping(&self, _topic_arn: &str) -> Result<()> {
        match self.behavior {
            PublishBehavior::Fail => Err(AppError::Provider(anyhow::anyhow!("broker unavailable"))),
            _ => Ok(()),
        }
    }
}

pub fn token_record(pk: &str, sk: &str, platform: &str) -> StoreRecord {
    StoreRecord::from([
        ("pk".to_string(), pk.to_string()),
        ("sk".to_string(), sk.to_string()),
        ("platform".to_string(), platform.to_string()),
        ("endpointArn".to_string(), format!("arn:aws:sns:endpoint/{pk}")),
        ("createdAt".to_string(), "2024-05-01T12:00:00.000Z".to_string()),
        ("subscriptionArn".to_string(), format!("arn:aws:sns:subscription/{pk}")),
    ])
}

/// In-memory token table keyed by the raw lookup value.
#[derive(Debug, Default)]
pub struct InMemoryTokenStore {
    by_user: Mutex<HashMap<String, QueryPage>>,
    by_device: Mutex<HashMap<String, QueryPage>>,
    failing: Mutex<Vec<String>>,
    deletes: Mutex<Vec<(String, String)>>,
    query_delay: Option<Duration>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    reachable: bool,
}

impl InMemoryTokenStore {
    pub fn new() -> Self {
        Self { reachable: true, ..Self::default() }
    }

    pub fn with_query_delay(delay: Duration) -> Self {
        Self { query_delay: Some(delay), ..Self::new() }
    }

    pub fn unreachable() -> Self {
        Self { reachable: false, ..Self::default() }
    }

    /// Registers a valid relation in both orientations.
    pub fn register(&self, user_id: &str, device_token: &str, platform: &str) {
        let user_key = format!("user#{user_id}");
        let device_key = format!("deviceToken#{device_token}");
        self.set_user_page(user_id, QueryPage { items: Some(vec![token_record(&user_key, &device_key, platform)]) });
        self.set_device_page(
            device_token,
            QueryPage { items: Some(vec![token_record(&device_key, &user_key, platform)]) },
        );
    }

    pub fn set_user_page(&self, user_id: &str, page: QueryPage) {
        self.by_user.lock().unwrap().insert(user_id.to_string(), page);
    }

    pub fn set_device_page(&self, device_token: &str, page: QueryPage) {
        self.by_device.lock().unwrap().insert(device_token.to_string(), page);
    }

    pub fn fail_on(&self, key: &str) {
        self.failing.lock().unwrap().push(key.to_string());
    }

    pub fn deletes(&self) -> Vec<(String, String)> {
        self.deletes.lock().unwrap().clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    async fn lookup(&self, table: &Mutex<HashMap<String, QueryPage>>, key: &str) -> Result<QueryPage> {
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);
        if let Some(delay) = self.query_delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.failing.lock().unwrap().iter().any(|k| k == key) {
            return Err(AppError::Provider(anyhow::anyhow!("throttled on {key}")));
        }
        Ok(table.lock().unwrap().get(key).cloned().unwrap_or(QueryPage { items: Some(Vec::new()) }))
    }
}

#[async_trait]
impl TokenStore for InMemoryTokenStore {
    async fn query_by_user_id(&self, user_id: &str) -> Result<QueryPage> {
        self.lookup(&self.by_user, user_id).await
    }

    async fn query_by_device_token(&self, device_token: &str) -> Result<QueryPage> {
        self.lookup(&self.by_device, device_token).await
    }

    async fn delete_token(&self, device_token: &str, user_id: &str) -> Result<()> {
        self.deletes.lock().unwrap().push((device_token.to_string(), user_id.to_string()));
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        if self.reachable { Ok(()) } else { Err(AppError::Provider(anyhow::anyhow!("table not found"))) }
    }
}
