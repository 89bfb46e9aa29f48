//! 核心模块 - 服务配置、状态和 HTTP 服务器
//!
//! - [`Config`] - 服务配置
//! - [`ServerState`] - 共享状态
//! - [`Server`] - HTTP 服务器

pub mod config;
pub mod server;
pub mod state;

pub use config::Config;
pub use server::Server;
pub use state::ServerState;
