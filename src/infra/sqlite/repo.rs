use std::path::PathBuf;

use async_trait::async_trait;

use crate::domain::entities::price::{PricePair, PriceTable};
use crate::infra::sqlite::queries::{
    apply_field_writes, delete_region, load_prices, replace_all, upsert_region,
};
use crate::infra::sqlite::schema::init_db;
use crate::usecase::ports::gateway::{FieldWrite, GatewayError, PriceGateway};

fn storage_error(err: anyhow::Error) -> GatewayError {
    GatewayError::Storage(format!("{err:#}"))
}

/// Local price store for running the panel without a remote database.
pub struct SqliteGateway {
    pub db_path: PathBuf,
}

impl SqliteGateway {
    pub fn open(db_path: PathBuf) -> Result<Self, GatewayError> {
        init_db(&db_path).map_err(storage_error)?;
        Ok(Self { db_path })
    }
}

#[async_trait]
impl PriceGateway for SqliteGateway {
    async fn get_all(&self) -> Result<PriceTable, GatewayError> {
        load_prices(&self.db_path).map_err(storage_error)
    }

    async fn set_region(&self, name: &str, prices: PricePair) -> Result<(), GatewayError> {
        upsert_region(&self.db_path, name, prices).map_err(storage_error)
    }

    async fn delete_region(&self, name: &str) -> Result<(), GatewayError> {
        delete_region(&self.db_path, name).map_err(storage_error)
    }

    async fn bulk_set(&self, table: &PriceTable) -> Result<(), GatewayError> {
        replace_all(&self.db_path, table).map_err(storage_error)
    }

    async fn atomic_multi_write(&self, writes: &[FieldWrite]) -> Result<(), GatewayError> {
        apply_field_writes(&self.db_path, writes).map_err(storage_error)
    }
}
