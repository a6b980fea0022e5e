pub mod config;
pub mod engine;
pub mod errors;
pub mod model;
pub mod normalize;
pub mod providers;
pub mod storage;
