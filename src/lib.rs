#![forbid(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::todo)]
#![warn(clippy::panic)]
#![warn(clippy::dbg_macro)]
#![warn(clippy::print_stdout)]
#![warn(clippy::print_stderr)]
#![warn(clippy::clone_on_ref_ptr)]
#![warn(unreachable_pub)]
#![warn(missing_debug_implementations)]
#![warn(unused_qualifications)]
#![deny(unused_must_use)]

pub mod adapters;
pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod services;
pub mod telemetry;

use crate::adapters::database::{DynamoTokenStore, TokenStore};
use crate::adapters::push::{MessageFactory, PushPublisher, SnsMessageFactory, SnsPublisher};
use crate::api::{AppState, MgmtState};
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::services::health_service::HealthService;
use crate::services::notification_service::{DispatchConfig, NotificationService};
use crate::services::token_service::TokenService;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(2);

/// Fully wired application state for both routers.
#[derive(Debug)]
pub struct App {
    pub state: AppState,
    pub mgmt: MgmtState,
}

/// Wires collaborators into services.
#[derive(Debug)]
pub struct AppBuilder {
    config: Config,
    publisher: Option<Arc<dyn PushPublisher>>,
    token_store: Option<Arc<dyn TokenStore>>,
    message_factory: Arc<dyn MessageFactory>,
}

impl AppBuilder {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config, publisher: None, token_store: None, message_factory: Arc::new(SnsMessageFactory) }
    }

    /// Uses the SNS and DynamoDB clients built from a loaded SDK configuration.
    #[must_use]
    pub fn with_aws(self, sdk_config: &aws_config::SdkConfig) -> Self {
        let publisher = Arc::new(SnsPublisher::new(aws_sdk_sns::Client::new(sdk_config)));
        let store = Arc::new(DynamoTokenStore::new(
            aws_sdk_dynamodb::Client::new(sdk_config),
            self.config.table.name.clone(),
        ));
        self.with_publisher(publisher).with_token_store(store)
    }

    #[must_use]
    pub fn with_publisher(mut self, publisher: Arc<dyn PushPublisher>) -> Self {
        self.publisher = Some(publisher);
        self
    }

    #[must_use]
    pub fn with_token_store(mut self, store: Arc<dyn TokenStore>) -> Self {
        self.token_store = Some(store);
        self
    }

    #[must_use]
    pub fn with_message_factory(mut self, factory: Arc<dyn MessageFactory>) -> Self {
        self.message_factory = factory;
        self
    }

    /// Validates configuration and builds the services.
    ///
    /// # Errors
    /// Returns `AppError::Config` if the broadcast topic is not configured or a collaborator is missing.
    pub fn build(self) -> Result<App> {
        let dispatch = DispatchConfig::from_config(&self.config.notifications)?;
        let publisher = self.publisher.ok_or_else(|| AppError::Config("push publisher is not configured".into()))?;
        let store = self.token_store.ok_or_else(|| AppError::Config("token store is not configured".into()))?;

        let health_service = HealthService::new(
            Arc::clone(&store),
            Arc::clone(&publisher),
            dispatch.all_topic_arn().to_string(),
            HEALTH_CHECK_TIMEOUT,
        );
        let notification_service = NotificationService::new(publisher, self.message_factory, dispatch);
        let token_service = TokenService::new(store, self.config.notifications.batch_concurrency);

        Ok(App { state: AppState { notification_service, token_service }, mgmt: MgmtState { health_service } })
    }
}

/// Routes panics through tracing so they reach structured logs.
pub fn setup_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let location = info.location().map(ToString::to_string).unwrap_or_default();
        let payload = info
            .payload()
            .downcast_ref::<&str>()
            .map(ToString::to_string)
            .or_else(|| info.payload().downcast_ref::<String>().cloned())
            .unwrap_or_default();
        tracing::error!(location = %location, payload = %payload, "panic");
    }));
}

/// Flips the shutdown channel on SIGINT or SIGTERM.
pub fn spawn_signal_handler(shutdown_tx: watch::Sender<bool>) {
    tokio::spawn(async move {
        let ctrl_c = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(mut signal) => {
                    signal.recv().await;
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to install SIGTERM handler");
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            () = ctrl_c => tracing::info!("Received ctrl-c, shutting down"),
            () = terminate => tracing::info!("Received SIGTERM, shutting down"),
        }
        let _ = shutdown_tx.send(true);
    });
}
