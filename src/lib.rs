//! Klas - 学校签到与课表服务后端
//!
//! 基于 Actix Web 构建：学生每日签到与请假，教师查看班级签到并补记缺勤，
//! 管理员对固定白名单内的数据表做通用增删改查。
//!
//! # 架构
//! - `cache`: 缓存层（Moka/Redis），保存验证码与令牌查询结果
//! - `config`: 配置管理
//! - `entity`: SeaORM 数据库实体
//! - `errors`: 统一错误处理
//! - `middlewares`: 认证、教师身份与限流中间件
//! - `models`: 请求与响应模型
//! - `object_store`: 头像与请假证明的文件存储及签名 URL
//! - `routes`: API 路由层
//! - `runtime`: 运行时生命周期管理
//! - `services`: 业务逻辑层
//! - `storage`: 数据存储层（SeaORM）
//! - `utils`: 工具函数

pub mod cache;
pub mod config;
pub mod entity;
pub mod errors;
pub mod middlewares;
pub mod models;
pub mod object_store;
pub mod routes;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod utils;
