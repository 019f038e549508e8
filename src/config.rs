use crate::domain::push::TopicKind;
use clap::{Args, Parser, ValueEnum};

#[derive(Clone, Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Config {
    #[command(flatten)]
    pub server: ServerConfig,

    #[command(flatten)]
    pub aws: AwsConfig,

    #[command(flatten)]
    pub table: TableConfig,

    #[command(flatten)]
    pub notifications: NotificationConfig,

    #[command(flatten)]
    pub telemetry: TelemetryConfig,
}

#[derive(Clone, Debug, Args)]
pub struct ServerConfig {
    /// Host to listen on
    #[arg(long, env = "PUSH_RELAY_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "PUSH_RELAY_PORT", default_value_t = 3000)]
    pub port: u16,

    /// Port for the management server (health probes)
    #[arg(long, env = "PUSH_RELAY_MGMT_PORT", default_value_t = 9090)]
    pub mgmt_port: u16,

    /// How long to wait for in-flight requests during shutdown
    #[arg(long, env = "PUSH_RELAY_SHUTDOWN_TIMEOUT_SECS", default_value_t = 10)]
    pub shutdown_timeout_secs: u64,
}

#[derive(Clone, Debug, Args)]
pub struct AwsConfig {
    /// AWS region used by the SNS and DynamoDB clients
    #[arg(long = "aws-region", env = "PUSH_RELAY_AWS_REGION", default_value = "us-east-1")]
    pub region: String,

    /// Custom endpoint override (useful for LocalStack)
    #[arg(long = "aws-endpoint", env = "PUSH_RELAY_AWS_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Timeout applied to every SDK operation
    #[arg(long, env = "PUSH_RELAY_AWS_OPERATION_TIMEOUT_MS", default_value_t = 5000)]
    pub operation_timeout_ms: u64,
}

#[derive(Clone, Debug, Args)]
pub struct TableConfig {
    /// DynamoDB table holding the user/device token relation
    #[arg(long = "token-table", env = "PUSH_RELAY_TOKEN_TABLE", default_value = "push-tokens")]
    pub name: String,
}

#[derive(Clone, Debug, Args)]
pub struct NotificationConfig {
    /// SNS topic that every registered endpoint is subscribed to
    #[arg(long, env = "ALL_TOPIC_ARN")]
    pub all_topic_arn: Option<String>,

    /// Topic kind used when building messages for iOS endpoints
    #[arg(long, env = "PUSH_RELAY_IOS_TOPIC_KIND", value_enum, default_value_t = TopicKind::Apns)]
    pub ios_topic_kind: TopicKind,

    /// Topic kind used when building messages for Android endpoints
    #[arg(long, env = "PUSH_RELAY_ANDROID_TOPIC_KIND", value_enum, default_value_t = TopicKind::Apns)]
    pub android_topic_kind: TopicKind,

    /// Maximum number of concurrent lookups issued by a batch token query
    #[arg(long, env = "PUSH_RELAY_BATCH_CONCURRENCY", default_value_t = 16)]
    pub batch_concurrency: usize,
}

#[derive(Clone, Debug, Args)]
pub struct TelemetryConfig {
    /// OTLP HTTP endpoint for traces and metrics; export is disabled when unset
    #[arg(long, env = "PUSH_RELAY_OTLP_ENDPOINT")]
    pub otlp_endpoint: Option<String>,

    /// Log output format
    #[arg(long, env = "PUSH_RELAY_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl Config {
    #[must_use]
    pub fn load() -> Self {
        Self::parse()
    }
}
