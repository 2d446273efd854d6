//! 动作码定义与编解码
//!
//! 动作码是仲裁器下发给机器人的唯一指令形式：一个大写字母，
//! 后面可选地跟一个整数参数（如转角或行驶距离）。
//!
//! 线级形式示例：`"Z"`、`"F5000"`、`"L37"`。
//!
//! 与历史实现不同，这里不做原始字符串拼接：动作在代码中始终是
//! `{kind, magnitude}` 的标签化形式，只在进出线路时转换为字符串。

use crate::ProtocolError;
use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// 动作种类（与线级单字母码一一对应）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ActionKind {
    /// `Z` - 回零/归位
    Zero,
    /// `F` - 前进（参数：毫米）
    Forward,
    /// `L` - 左转（参数：航向偏差幅值）
    TurnLeft,
    /// `R` - 右转（参数：航向偏差幅值）
    TurnRight,
    /// `B` - 倒退（参数：毫米）
    Reverse,
    /// `C` - 继续前往下一棵树
    Continue,
    /// `E` - 行尾转弯
    EndRow,
    /// `G` - 绿色通道：采摘侧为抓取绿球，运送侧为卸载绿球（参数：数量）
    Green,
    /// `O` - 橙色通道：采摘侧为抓取橙球，运送侧为卸载橙球（参数：数量）
    Orange,
    /// `S` - 收集完成，前往交接区
    Seek,
    /// `A` - 交接对位
    Align,
    /// `J` - 微调
    Jog,
    /// `T` - 执行交接
    Transfer,
    /// `W` - 等待
    Wait,
    /// `D` - 倾倒/卸货完成
    Dump,
    /// `?` - 未知/未定义状态
    Unknown,
}

impl ActionKind {
    /// 线级单字母码
    pub fn code(self) -> char {
        match self {
            ActionKind::Zero => 'Z',
            ActionKind::Forward => 'F',
            ActionKind::TurnLeft => 'L',
            ActionKind::TurnRight => 'R',
            ActionKind::Reverse => 'B',
            ActionKind::Continue => 'C',
            ActionKind::EndRow => 'E',
            ActionKind::Green => 'G',
            ActionKind::Orange => 'O',
            ActionKind::Seek => 'S',
            ActionKind::Align => 'A',
            ActionKind::Jog => 'J',
            ActionKind::Transfer => 'T',
            ActionKind::Wait => 'W',
            ActionKind::Dump => 'D',
            ActionKind::Unknown => '?',
        }
    }

    /// 从线级字母解析
    pub fn from_code(code: char) -> Result<Self, ProtocolError> {
        match code {
            'Z' => Ok(ActionKind::Zero),
            'F' => Ok(ActionKind::Forward),
            'L' => Ok(ActionKind::TurnLeft),
            'R' => Ok(ActionKind::TurnRight),
            'B' => Ok(ActionKind::Reverse),
            'C' => Ok(ActionKind::Continue),
            'E' => Ok(ActionKind::EndRow),
            'G' => Ok(ActionKind::Green),
            'O' => Ok(ActionKind::Orange),
            'S' => Ok(ActionKind::Seek),
            'A' => Ok(ActionKind::Align),
            'J' => Ok(ActionKind::Jog),
            'T' => Ok(ActionKind::Transfer),
            'W' => Ok(ActionKind::Wait),
            'D' => Ok(ActionKind::Dump),
            '?' => Ok(ActionKind::Unknown),
            _ => Err(ProtocolError::UnknownAction { code }),
        }
    }
}

/// 动作码（标签化形式）
///
/// `magnitude` 仅对部分动作有意义（如 `F5000` 的行驶距离），
/// 无参数动作编码为裸字母。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Action {
    pub kind: ActionKind,
    pub magnitude: Option<i32>,
}

impl Action {
    /// 无参数动作
    pub fn bare(kind: ActionKind) -> Self {
        Self {
            kind,
            magnitude: None,
        }
    }

    /// 带参数动作
    pub fn with_magnitude(kind: ActionKind, magnitude: i32) -> Self {
        Self {
            kind,
            magnitude: Some(magnitude),
        }
    }

    /// 编码为线级字符串（`"F5000"` / `"W"`）
    pub fn encode(&self) -> String {
        match self.magnitude {
            Some(m) => format!("{}{}", self.kind.code(), m),
            None => self.kind.code().to_string(),
        }
    }
}

impl From<ActionKind> for Action {
    fn from(kind: ActionKind) -> Self {
        Action::bare(kind)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for Action {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let head = chars.next().ok_or(ProtocolError::EmptyAction)?;
        let kind = ActionKind::from_code(head)?;
        let rest = chars.as_str();
        let magnitude = if rest.is_empty() {
            None
        } else {
            Some(
                rest.parse::<i32>()
                    .map_err(|_| ProtocolError::InvalidMagnitude {
                        text: rest.to_string(),
                    })?,
            )
        };
        Ok(Action { kind, magnitude })
    }
}

// 线上以字符串出现（"last_action": "F5000"），serde 经由编解码函数走
impl Serialize for Action {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.encode())
    }
}

impl<'de> Deserialize<'de> for Action {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_encode_bare() {
        assert_eq!(Action::bare(ActionKind::Wait).encode(), "W");
        assert_eq!(Action::bare(ActionKind::Unknown).encode(), "?");
    }

    #[test]
    fn test_encode_with_magnitude() {
        assert_eq!(Action::with_magnitude(ActionKind::Forward, 5000).encode(), "F5000");
        assert_eq!(Action::with_magnitude(ActionKind::TurnLeft, 37).encode(), "L37");
        assert_eq!(Action::with_magnitude(ActionKind::Green, 0).encode(), "G0");
    }

    #[test]
    fn test_decode() {
        let action: Action = "F5000".parse().unwrap();
        assert_eq!(action.kind, ActionKind::Forward);
        assert_eq!(action.magnitude, Some(5000));

        let action: Action = "Z".parse().unwrap();
        assert_eq!(action.kind, ActionKind::Zero);
        assert_eq!(action.magnitude, None);
    }

    #[test]
    fn test_decode_rejects_unknown_code() {
        assert!(matches!(
            "X12".parse::<Action>(),
            Err(ProtocolError::UnknownAction { code: 'X' })
        ));
    }

    #[test]
    fn test_decode_rejects_empty() {
        assert!(matches!("".parse::<Action>(), Err(ProtocolError::EmptyAction)));
    }

    #[test]
    fn test_decode_rejects_bad_magnitude() {
        assert!(matches!(
            "F50x0".parse::<Action>(),
            Err(ProtocolError::InvalidMagnitude { .. })
        ));
    }

    #[test]
    fn test_serde_as_string() {
        let action = Action::with_magnitude(ActionKind::TurnRight, 42);
        let json = serde_json::to_string(&action).unwrap();
        assert_eq!(json, "\"R42\"");
        let back: Action = serde_json::from_str(&json).unwrap();
        assert_eq!(back, action);
    }

    fn arb_kind() -> impl Strategy<Value = ActionKind> {
        prop_oneof![
            Just(ActionKind::Zero),
            Just(ActionKind::Forward),
            Just(ActionKind::TurnLeft),
            Just(ActionKind::TurnRight),
            Just(ActionKind::Reverse),
            Just(ActionKind::Continue),
            Just(ActionKind::EndRow),
            Just(ActionKind::Green),
            Just(ActionKind::Orange),
            Just(ActionKind::Seek),
            Just(ActionKind::Align),
            Just(ActionKind::Jog),
            Just(ActionKind::Transfer),
            Just(ActionKind::Wait),
            Just(ActionKind::Dump),
            Just(ActionKind::Unknown),
        ]
    }

    proptest! {
        /// 任意合法动作的编解码往返相等
        #[test]
        fn prop_roundtrip(kind in arb_kind(), magnitude in proptest::option::of(any::<i32>())) {
            let action = Action { kind, magnitude };
            let decoded: Action = action.encode().parse().unwrap();
            prop_assert_eq!(decoded, action);
        }
    }
}
