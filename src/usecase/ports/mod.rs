pub mod confirm;
pub mod gateway;
