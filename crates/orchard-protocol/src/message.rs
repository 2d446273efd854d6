//! 请求/响应消息
//!
//! 机器人每个轮询周期发送一个 `ActionRequest`，仲裁器回复一个
//! `ActionResponse`。编解码是显式函数而非裸 serde derive：
//! 机器人标识在这里做严格校验，未知标识返回
//! [`ProtocolError::UnrecognizedRobot`] 而不是笼统的 JSON 错误。

use crate::{Action, Frame, ProtocolError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 机器人身份
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RobotId {
    /// 采摘机器人（轮询时附带相机帧）
    Picker,
    /// 运送机器人
    Delivery,
}

impl RobotId {
    /// 线级名称
    pub fn as_str(self) -> &'static str {
        match self {
            RobotId::Picker => "picker",
            RobotId::Delivery => "delivery",
        }
    }
}

impl fmt::Display for RobotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RobotId {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "picker" => Ok(RobotId::Picker),
            "delivery" => Ok(RobotId::Delivery),
            other => Err(ProtocolError::UnrecognizedRobot {
                name: other.to_string(),
            }),
        }
    }
}

/// 机器人轮询请求（每个周期构造一次，不可变）
#[derive(Debug, Clone, PartialEq)]
pub struct ActionRequest {
    pub robot: RobotId,
    pub last_action: Action,
    /// 相机帧；只有采摘机器人携带，运送机器人省略
    pub frame: Option<Frame>,
}

/// 仲裁器响应：机器人下一步要执行的动作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionResponse {
    pub action: Action,
}

// 线级中间形式（"type" 字段保留以兼容旧机器人固件，解析时不强制）
#[derive(Serialize)]
struct WireRequest {
    #[serde(rename = "type")]
    kind: &'static str,
    robot: String,
    last_action: Action,
    #[serde(skip_serializing_if = "Option::is_none")]
    frame: Option<Frame>,
}

#[derive(Deserialize)]
struct WireRequestIn {
    robot: String,
    last_action: Action,
    #[serde(default)]
    frame: Option<Frame>,
}

#[derive(Serialize, Deserialize)]
struct WireResponse {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    action: Action,
}

impl ActionRequest {
    /// 编码为单行 JSON
    pub fn encode(&self) -> Result<String, ProtocolError> {
        let wire = WireRequest {
            kind: "request",
            robot: self.robot.as_str().to_string(),
            last_action: self.last_action,
            frame: self.frame.clone(),
        };
        Ok(serde_json::to_string(&wire)?)
    }

    /// 从单行 JSON 解码
    pub fn decode(text: &str) -> Result<Self, ProtocolError> {
        let wire: WireRequestIn = serde_json::from_str(text)?;
        let robot = wire.robot.parse::<RobotId>()?;
        Ok(Self {
            robot,
            last_action: wire.last_action,
            frame: wire.frame,
        })
    }
}

impl ActionResponse {
    pub fn new(action: Action) -> Self {
        Self { action }
    }

    /// 编码为单行 JSON
    pub fn encode(&self) -> Result<String, ProtocolError> {
        let wire = WireResponse {
            kind: Some("response".to_string()),
            action: self.action,
        };
        Ok(serde_json::to_string(&wire)?)
    }

    /// 从单行 JSON 解码
    pub fn decode(text: &str) -> Result<Self, ProtocolError> {
        let wire: WireResponse = serde_json::from_str(text)?;
        Ok(Self {
            action: wire.action,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ActionKind;

    #[test]
    fn test_request_roundtrip_without_frame() {
        let request = ActionRequest {
            robot: RobotId::Delivery,
            last_action: Action::bare(ActionKind::Wait),
            frame: None,
        };
        let json = request.encode().unwrap();
        let back = ActionRequest::decode(&json).unwrap();
        assert_eq!(back, request);
    }

    #[test]
    fn test_request_roundtrip_with_frame() {
        let mut frame = Frame::new(3, 2);
        frame.set_pixel(1, 0, [9, 8, 7]);
        let request = ActionRequest {
            robot: RobotId::Picker,
            last_action: Action::with_magnitude(ActionKind::Forward, 5000),
            frame: Some(frame),
        };
        let json = request.encode().unwrap();
        let back = ActionRequest::decode(&json).unwrap();
        assert_eq!(back, request);
    }

    #[test]
    fn test_request_decode_tolerates_missing_type() {
        let json = r#"{"robot":"picker","last_action":"Z"}"#;
        let request = ActionRequest::decode(json).unwrap();
        assert_eq!(request.robot, RobotId::Picker);
        assert_eq!(request.last_action.kind, ActionKind::Zero);
        assert!(request.frame.is_none());
    }

    #[test]
    fn test_request_rejects_unknown_robot() {
        let json = r#"{"robot":"scout","last_action":"Z"}"#;
        assert!(matches!(
            ActionRequest::decode(json),
            Err(ProtocolError::UnrecognizedRobot { name }) if name == "scout"
        ));
    }

    #[test]
    fn test_response_roundtrip() {
        let response = ActionResponse::new(Action::with_magnitude(ActionKind::TurnLeft, 37));
        let json = response.encode().unwrap();
        assert!(json.contains("\"L37\""));
        let back = ActionResponse::decode(&json).unwrap();
        assert_eq!(back, response);
    }

    #[test]
    fn test_malformed_payload_is_json_error() {
        assert!(matches!(
            ActionRequest::decode("not json"),
            Err(ProtocolError::Json(_))
        ));
    }
}
