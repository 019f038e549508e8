use crate::adapters::database::TokenStore;
use crate::domain::token::{DeviceToken, QueryPage, TokenRecord, UserToken};
use crate::error::{AppError, Result};
use futures::{StreamExt, TryStreamExt, stream};
use std::sync::Arc;

/// Resolves users to device tokens and back.
#[derive(Clone, Debug)]
pub struct TokenService {
    store: Arc<dyn TokenStore>,
    batch_concurrency: usize,
}

impl TokenService {
    #[must_use]
    pub fn new(store: Arc<dyn TokenStore>, batch_concurrency: usize) -> Self {
        Self { store, batch_concurrency: batch_concurrency.max(1) }
    }

    /// Looks up the token registered for a user.
    ///
    /// # Errors
    /// Returns `AppError::MalformedQuery` if the store omitted the item collection,
    /// `AppError::InvalidRecord` if the first match fails validation, or a provider error.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn get_token_by_user(&self, user_id: &str) -> Result<Option<UserToken>> {
        let page = self.store.query_by_user_id(user_id).await?;
        Ok(first_record(page)?.map(TokenRecord::into_user_token))
    }

    /// Looks up the user owning a device token.
    ///
    /// # Errors
    /// Same conditions as [`TokenService::get_token_by_user`].
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn get_user_by_token(&self, device_token: &str) -> Result<Option<DeviceToken>> {
        let page = self.store.query_by_device_token(device_token).await?;
        Ok(first_record(page)?.map(TokenRecord::into_device_token))
    }

    /// Looks up tokens for many users, keeping input order and dropping users without one.
    ///
    /// # Errors
    /// Fails with the first error raised by any individual lookup.
    #[tracing::instrument(level = "debug", skip(self, user_ids), fields(count = user_ids.len()))]
    pub async fn find_tokens_by_users(&self, user_ids: &[String]) -> Result<Vec<UserToken>> {
        let found: Vec<Option<UserToken>> = stream::iter(user_ids.iter().cloned())
            .map(|user_id| async move { self.get_token_by_user(&user_id).await })
            .buffered(self.batch_concurrency)
            .try_collect()
            .await?;
        Ok(found.into_iter().flatten().collect())
    }

    /// Looks up owners for many device tokens, keeping input order and dropping unknown tokens.
    ///
    /// # Errors
    /// Fails with the first error raised by any individual lookup.
    #[tracing::instrument(level = "debug", skip(self, device_tokens), fields(count = device_tokens.len()))]
    pub async fn find_users_by_tokens(&self, device_tokens: &[String]) -> Result<Vec<DeviceToken>> {
        let found: Vec<Option<DeviceToken>> = stream::iter(device_tokens.iter().cloned())
            .map(|device_token| async move { self.get_user_by_token(&device_token).await })
            .buffered(self.batch_concurrency)
            .try_collect()
            .await?;
        Ok(found.into_iter().flatten().collect())
    }

    /// Deletes the token relation between a device and a user.
    ///
    /// # Errors
    /// Returns a provider error if the store delete fails.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn delete_user(&self, device_token: &str, user_id: &str) -> Result<()> {
        self.store.delete_token(device_token, user_id).await?;
        tracing::info!(device_token = %device_token, user_id = %user_id, "Token relation deleted");
        Ok(())
    }
}

fn first_record(page: QueryPage) -> Result<Option<TokenRecord>> {
    let items = page.items.ok_or(AppError::MalformedQuery("query result has no item collection"))?;
    let Some(first) = items.first() else {
        return Ok(None);
    };
    Ok(Some(TokenRecord::decode(first)?))
}
