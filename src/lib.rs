pub mod about;
pub mod app;
pub mod config;
pub mod error;
pub mod format;
pub mod model;
pub mod modules;
pub mod normalize;
pub mod persistence;
pub mod prompt;
pub mod storage;
pub mod store;
pub mod views;
