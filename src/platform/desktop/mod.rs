pub mod dialogs;
pub mod paths;
