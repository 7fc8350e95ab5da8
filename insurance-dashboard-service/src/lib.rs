pub mod config;
pub mod service;

pub use config::{LogFormat, ServiceConfig, StrategyKind};
pub use service::{AppState, build_router, create_app, create_app_state};
