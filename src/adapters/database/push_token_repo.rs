use crate::adapters::database::TokenStore;
use crate::domain::token::{DEVICE_TOKEN_KEY_KIND, QueryPage, StoreRecord, USER_KEY_KIND, composite_key};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::types::{AttributeValue, Delete, TransactWriteItem};
use std::collections::HashMap;

const KEY_CONDITION: &str = "pk = :pk AND begins_with(sk, :sk_prefix)";

#[derive(Clone, Debug)]
pub struct DynamoTokenStore {
    client: Client,
    table: String,
}

impl DynamoTokenStore {
    #[must_use]
    pub const fn new(client: Client, table: String) -> Self {
        Self { client, table }
    }

    async fn query_partition(&self, partition_kind: &str, value: &str, sort_kind: &str) -> Result<QueryPage> {
        let output = self
            .client
            .query()
            .table_name(&self.table)
            .key_condition_expression(KEY_CONDITION)
            .expression_attribute_values(":pk", AttributeValue::S(composite_key(partition_kind, value)))
            .expression_attribute_values(":sk_prefix", AttributeValue::S(composite_key(sort_kind, "")))
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = ?e, table = %self.table, kind = %partition_kind, "DynamoDB query failed");
                AppError::provider(e)
            })?;

        Ok(QueryPage { items: output.items.map(|items| items.into_iter().map(flatten_record).collect()) })
    }

    fn delete_item(&self, pk: String, sk: String) -> Result<TransactWriteItem> {
        let delete = Delete::builder()
            .table_name(&self.table)
            .key("pk", AttributeValue::S(pk))
            .key("sk", AttributeValue::S(sk))
            .build()
            .map_err(AppError::provider)?;
        Ok(TransactWriteItem::builder().delete(delete).build())
    }
}

/// Keeps only string attributes; anything else is treated as absent by the record decoder.
fn flatten_record(item: HashMap<String, AttributeValue>) -> StoreRecord {
    item.into_iter()
        .filter_map(|(name, value)| match value {
            AttributeValue::S(s) => Some((name, s)),
            _ => None,
        })
        .collect()
}

#[async_trait]
impl TokenStore for DynamoTokenStore {
    async fn query_by_user_id(&self, user_id: &str) -> Result<QueryPage> {
        self.query_partition(USER_KEY_KIND, user_id, DEVICE_TOKEN_KEY_KIND).await
    }

    async fn query_by_device_token(&self, device_token: &str) -> Result<QueryPage> {
        self.query_partition(DEVICE_TOKEN_KEY_KIND, device_token, USER_KEY_KIND).await
    }

    async fn delete_token(&self, device_token: &str, user_id: &str) -> Result<()> {
        let user_key = composite_key(USER_KEY_KIND, user_id);
        let device_key = composite_key(DEVICE_TOKEN_KEY_KIND, device_token);

        // Both orientations of the relation go together.
        let by_user = self.delete_item(user_key.clone(), device_key.clone())?;
        let by_device = self.delete_item(device_key, user_key)?;

        self.client.transact_write_items().transact_items(by_user).transact_items(by_device).send().await.map_err(
            |e| {
                tracing::error!(error = ?e, table = %self.table, "DynamoDB token delete failed");
                AppError::provider(e)
            },
        )?;

        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        self.client.describe_table().table_name(&self.table).send().await.map_err(AppError::provider)?;
        Ok(())
    }
}
