//! 配置管理
//!
//! 静态配置从 `config.toml`、环境特定配置文件和环境变量分层加载。

mod r#impl;
mod structs;

pub use structs::*;
