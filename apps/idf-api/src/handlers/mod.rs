//! Handlers 模块

pub mod auth;
pub mod contact;
pub mod metrics;

pub use auth::*;
pub use contact::*;
pub use metrics::*;
