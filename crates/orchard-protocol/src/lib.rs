//! # Orchard Protocol
//!
//! 仲裁器与机器人之间的线级协议定义（无 IO 依赖）
//!
//! ## 模块
//!
//! - `action`: 动作码（单字母 + 可选数值参数）
//! - `frame`: BGR 像素帧（相机数据的线级形式）
//! - `message`: 请求/响应消息及 JSON 编解码
//!
//! ## 线级格式
//!
//! 报文为单行 JSON。机器人每个轮询周期发送一个 `request`，
//! 仲裁器回复一个 `response`，严格一问一答：
//!
//! ```json
//! {"type":"request","robot":"picker","last_action":"F5000","frame":[[[0,0,0]]]}
//! {"type":"response","action":"L37"}
//! ```

pub mod action;
pub mod frame;
pub mod message;

pub use action::{Action, ActionKind};
pub use frame::Frame;
pub use message::{ActionRequest, ActionResponse, RobotId};

use thiserror::Error;

/// 协议解析错误类型
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// 未知的机器人标识（只接受 "picker" / "delivery"）
    #[error("Unrecognized robot identifier: {name:?}")]
    UnrecognizedRobot { name: String },

    /// 未知的动作码字母
    #[error("Unknown action code: {code:?}")]
    UnknownAction { code: char },

    /// 空动作字符串
    #[error("Empty action string")]
    EmptyAction,

    /// 动作码数值参数解析失败
    #[error("Invalid action magnitude: {text:?}")]
    InvalidMagnitude { text: String },

    /// 帧行长度不一致
    #[error("Ragged frame: row {row} has {len} pixels, expected {expected}")]
    RaggedFrame {
        row: usize,
        len: usize,
        expected: usize,
    },

    /// JSON 编解码错误
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
