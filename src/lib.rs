pub mod api;
pub mod config;
pub mod dataset;
pub mod monitoring;
pub mod proxy;
pub mod search;
