pub mod defaults;
pub mod document;
pub mod edit;
pub mod price;
pub mod view;
