pub mod browse;
pub mod config;
pub mod errors;
pub mod export;
pub mod storage;
