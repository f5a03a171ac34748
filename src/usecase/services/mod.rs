pub mod price_service;
pub mod transfer_service;
