//! # Orchard Gateway
//!
//! 仲裁器的传输层与运行时外壳：
//!
//! - `gateway`: 严格一问一答的机器人轮询网关（每次轮询一条短连接）
//! - `monitor`: 后台时钟监视线程
//! - `config`: TOML 配置文件的加载与默认值
//!
//! ## 时序约束
//!
//! 网关是单线程的：一次只处理一个机器人轮询，采摘机器人的视觉
//! 评估在关键路径上内联执行，因此视觉延迟直接决定轮询吞吐。
//! 时钟监视与轮询处理都经由 [`orchard_match::SharedMatch`] 的
//! 互斥锁访问比赛状态，互不交错。

pub mod config;
mod error;
pub mod gateway;
pub mod monitor;

pub use config::{ArbiterConfig, MatchConfig, ServerConfig};
pub use error::GatewayError;
pub use gateway::Gateway;
pub use monitor::ClockMonitor;
