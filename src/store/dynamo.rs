//! DynamoDB-backed user table
//!
//! Items are flat string maps keyed by `userId`. Each trait call is exactly one
//! SDK request; `scan` reads a single page.

use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use std::collections::HashMap;

use super::{StoreError, UserRecord, UserStore};

const USER_ID: &str = "userId";
const EMAIL: &str = "email";
const NAME: &str = "name";
const CREATED_AT: &str = "createdAt";

type Item = HashMap<String, AttributeValue>;

pub struct DynamoStore {
    client: Client,
    table: String,
}

impl DynamoStore {
    pub fn new(client: Client, table: &str) -> Self {
        Self {
            client,
            table: table.to_string(),
        }
    }

    /// Client from the ambient AWS configuration (env, profile, instance role)
    pub async fn from_env(table: &str) -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self::new(Client::new(&config), table)
    }

    pub fn table(&self) -> &str {
        &self.table
    }
}

fn sdk_error(err: impl Into<aws_sdk_dynamodb::Error>) -> StoreError {
    StoreError::Dynamo(Box::new(err.into()))
}

fn record_to_item(record: UserRecord) -> Item {
    HashMap::from([
        (USER_ID.to_string(), AttributeValue::S(record.user_id)),
        (EMAIL.to_string(), AttributeValue::S(record.email)),
        (NAME.to_string(), AttributeValue::S(record.name)),
        (CREATED_AT.to_string(), AttributeValue::S(record.created_at)),
    ])
}

/// String attributes only; a missing or non-string `userId` is an invalid item
fn item_to_record(item: &Item) -> Result<UserRecord, StoreError> {
    let text = |key: &str| {
        item.get(key)
            .and_then(|value| value.as_s().ok())
            .cloned()
    };

    let user_id = text(USER_ID)
        .ok_or_else(|| StoreError::InvalidItem(format!("{USER_ID} is missing or not a string")))?;

    Ok(UserRecord {
        user_id,
        email: text(EMAIL).unwrap_or_default(),
        name: text(NAME).unwrap_or_default(),
        created_at: text(CREATED_AT).unwrap_or_default(),
    })
}

#[async_trait]
impl UserStore for DynamoStore {
    async fn get(&self, user_id: &str) -> Result<Option<UserRecord>, StoreError> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table)
            .key(USER_ID, AttributeValue::S(user_id.to_string()))
            .send()
            .await
            .map_err(sdk_error)?;

        output.item().map(item_to_record).transpose()
    }

    async fn scan(&self) -> Result<Vec<UserRecord>, StoreError> {
        let output = self
            .client
            .scan()
            .table_name(&self.table)
            .send()
            .await
            .map_err(sdk_error)?;

        if output.last_evaluated_key().is_some() {
            tracing::debug!(table = %self.table, "scan returned a partial page");
        }

        output.items().iter().map(item_to_record).collect()
    }

    async fn put(&self, record: UserRecord) -> Result<(), StoreError> {
        self.client
            .put_item()
            .table_name(&self.table)
            .set_item(Some(record_to_item(record)))
            .send()
            .await
            .map_err(sdk_error)?;
        Ok(())
    }
}
