pub mod desktop;
pub mod logging;
