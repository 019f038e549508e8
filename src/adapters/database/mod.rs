use crate::domain::token::QueryPage;
use crate::error::Result;
use async_trait::async_trait;

pub mod push_token_repo;

pub use push_token_repo::DynamoTokenStore;

/// Key-value store holding the user/device token relation.
#[async_trait]
pub trait TokenStore: Send + Sync + std::fmt::Debug {
    /// Queries the items partitioned under `user#<user_id>`.
    async fn query_by_user_id(&self, user_id: &str) -> Result<QueryPage>;

    /// Queries the items partitioned under `deviceToken#<device_token>`.
    async fn query_by_device_token(&self, device_token: &str) -> Result<QueryPage>;

    /// Removes the relation between `device_token` and `user_id`, whether or not it exists.
    async fn delete_token(&self, device_token: &str, user_id: &str) -> Result<()>;

    /// Verifies the backing table is reachable.
    async fn ping(&self) -> Result<()>;
}
