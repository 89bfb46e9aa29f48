//! Review Service - 评价服务
//!
//! # 架构概述
//!
//! - **数据库** (`db`): SQLite 存储，评价 / 回复 / 申诉三张表
//! - **服务层** (`services`): 写入与审核网关、按商家查询的缓存查询引擎
//! - **缓存** (`cache`): moka TTL 缓存与请求合并
//! - **HTTP API** (`api`): axum 路由
//!
//! # 模块结构
//!
//! ```text
//! review-service/src/
//! ├── core/          # 配置、状态、服务器
//! ├── api/           # HTTP 路由和处理器
//! ├── services/      # 业务逻辑
//! ├── cache/         # 缓存与请求合并
//! ├── db/            # 数据库层
//! └── utils/         # 日志
//! ```

pub mod api;
pub mod cache;
pub mod core;
pub mod db;
pub mod error;
pub mod services;
pub mod utils;

pub use core::{Config, Server, ServerState};
pub use error::{ServiceError, ServiceResult};
pub use services::{ReviewQueryEngine, ReviewService};
pub use utils::logger::{init_logger, init_logger_with_file};
