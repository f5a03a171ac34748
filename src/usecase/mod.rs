pub mod error;
pub mod notice;
pub mod ports;
pub mod services;
