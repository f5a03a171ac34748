use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::price::{PriceField, PricePair, PriceTable};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("server responded with {status}: {body}")]
    Status { status: u16, body: String },
    #[error("unexpected response: {0}")]
    Decode(String),
    #[error("storage error: {0}")]
    Storage(String),
}

/// One field of one region, as written by a batch save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldWrite {
    pub region: String,
    pub field: PriceField,
    pub value: u64,
}

/// Persistent store holding the committed price table.
///
/// `atomic_multi_write` must apply every write or none of them; callers rely
/// on that instead of rolling back on their side.
#[async_trait]
pub trait PriceGateway: Send + Sync {
    async fn get_all(&self) -> Result<PriceTable, GatewayError>;

    async fn set_region(&self, name: &str, prices: PricePair) -> Result<(), GatewayError>;

    async fn delete_region(&self, name: &str) -> Result<(), GatewayError>;

    async fn bulk_set(&self, table: &PriceTable) -> Result<(), GatewayError>;

    async fn atomic_multi_write(&self, writes: &[FieldWrite]) -> Result<(), GatewayError>;
}
