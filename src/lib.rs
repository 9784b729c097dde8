pub mod api;
pub mod board;
pub mod config;
pub mod logging;
pub mod storage;
pub mod time_format;
pub mod types;
pub mod validation;

pub use board::{BoardState, MessageBoard};
pub use config::BoardConfig;
