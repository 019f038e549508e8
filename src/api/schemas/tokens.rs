use serde::Deserialize;

pub const MAX_BATCH_SIZE: usize = 1000;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserBatchRequest {
    pub user_ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenBatchRequest {
    pub device_tokens: Vec<String>,
}

fn validate_batch(len: usize) -> Result<(), String> {
    if len > MAX_BATCH_SIZE {
        return Err(format!("Batch is too large (max {MAX_BATCH_SIZE} entries)"));
    }
    Ok(())
}

impl UserBatchRequest {
    /// Validates the user id batch.
    ///
    /// # Errors
    /// Returns an error if the batch exceeds `MAX_BATCH_SIZE`.
    pub fn validate(&self) -> Result<(), String> {
        validate_batch(self.user_ids.len())
    }
}

impl TokenBatchRequest {
    /// Validates the device token batch.
    ///
    /// # Errors
    /// Returns an error if the batch exceeds `MAX_BATCH_SIZE`.
    pub fn validate(&self) -> Result<(), String> {
        validate_batch(self.device_tokens.len())
    }
}
