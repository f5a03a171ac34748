use std::sync::Arc;

use crate::config::Backend;
use crate::infra::firebase::gateway::FirebaseGateway;
use crate::infra::sqlite::repo::SqliteGateway;
use crate::usecase::ports::gateway::{GatewayError, PriceGateway};

pub mod document;
pub mod firebase;
pub mod sqlite;

pub fn open_gateway(backend: &Backend) -> Result<Arc<dyn PriceGateway>, GatewayError> {
    match backend {
        Backend::Firebase(config) => Ok(Arc::new(FirebaseGateway::new(config)?)),
        Backend::Sqlite { path } => Ok(Arc::new(SqliteGateway::open(path.clone())?)),
    }
}
