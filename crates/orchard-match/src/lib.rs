//! # Orchard Match
//!
//! 比赛状态与决策引擎：仲裁器的全部"裁判逻辑"都在这里。
//!
//! ## 模块
//!
//! - `state`: 比赛状态（时钟、计数、交接旗标）与会话控制
//! - `engine`: 逐机器人有限状态决策引擎
//!
//! ## 并发模型
//!
//! 全部可变状态收敛在一个 [`MatchState`] 里，由 [`SharedMatch`]
//! 的单把互斥锁串行化。决策引擎、会话控制和时钟刷新三条路径
//! 都只能经由这把锁触碰状态，不存在环境全局变量。

pub mod engine;
pub mod state;

pub use engine::{DecisionConfig, decide};
pub use state::{CountMap, MatchSnapshot, MatchState, SharedMatch};
