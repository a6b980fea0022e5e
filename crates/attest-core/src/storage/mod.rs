pub mod files;
pub mod schema;
pub mod store;
