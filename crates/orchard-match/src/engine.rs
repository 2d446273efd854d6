//! 决策引擎
//!
//! `decide` 是比赛编排的唯一出口：给定（机器人身份、上一动作、
//! 比赛状态、视觉结果）返回下一动作。对同样的输入输出是确定的，
//! 生产路径上没有任何随机性——历史实现中"视觉丢失就随机猜颜色"
//! 的回退被视为缺陷，已由显式的"未检测到"分支取代。
//!
//! 全局优先级（按序判定）：
//!
//! 1. 比赛未运行 → `Z`（回零），与机器人和上一动作无关
//! 2. 时钟到时 → `W`（等待）
//! 3. 按机器人身份分派到对应的状态机
//!
//! 状态副作用（计数递增、交接旗标置位）是决策的最后一步，排在
//! 所有可能失败的计算之后，不会留下半更新的状态。

use crate::state::MatchState;
use orchard_protocol::{Action, ActionKind, RobotId};
use orchard_vision::{ColorLabel, VisionResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// 决策引擎标定参数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionConfig {
    /// 抓取判据：视觉距离不大于该值即下发抓取
    pub target_distance: i32,
    /// 对准容差：航向幅值在容差内视为已对准
    pub alignment_tolerance: i32,
    /// 盲抓上限：视觉丢失时信任航位推算的记忆幅值上限
    pub dead_reckon_max: i32,
    /// 回零后的初始推进距离（毫米）
    pub approach_mm: i32,
    /// 视觉丢失时的后退距离（毫米）
    pub retreat_mm: i32,
    /// 一场比赛的采集目标（满额后转入交接）
    pub harvest_goal: u32,
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self {
            target_distance: 20,
            alignment_tolerance: 100,
            dead_reckon_max: 2000,
            approach_mm: 5000,
            retreat_mm: 500,
            harvest_goal: 8,
        }
    }
}

/// 按颜色的抓取动作
fn grab_action(color: ColorLabel) -> Action {
    match color {
        ColorLabel::Green => Action::bare(ActionKind::Green),
        ColorLabel::Orange => Action::bare(ActionKind::Orange),
    }
}

/// 决定某机器人的下一动作
///
/// 状态变更只发生在抓取计数与交接旗标两处，且都由本函数执行；
/// 调用方必须已持有 [`MatchState`] 的锁。
pub fn decide(
    robot: RobotId,
    last: &Action,
    state: &mut MatchState,
    vision: Option<&VisionResult>,
    config: &DecisionConfig,
) -> Action {
    debug!(robot = %robot, last = %last, "deciding next action");

    // 1. 比赛未运行：无条件回零
    if !state.running() {
        return Action::bare(ActionKind::Zero);
    }
    // 2. 到时：无条件等待
    if state.expired() {
        return Action::bare(ActionKind::Wait);
    }
    // 3. 按机器人分派
    let action = match robot {
        RobotId::Picker => decide_picker(last, state, vision, config),
        RobotId::Delivery => decide_delivery(last, state),
    };
    debug!(robot = %robot, action = %action, "decision");
    action
}

/// 采摘机器人状态机
///
/// 状态即上一动作码。采集阶段由视觉驱动；满额后进入固定的
/// 交接序列 `S→A→J→T→W`，在 `T→W` 一步置位交接旗标。
fn decide_picker(
    last: &Action,
    state: &mut MatchState,
    vision: Option<&VisionResult>,
    config: &DecisionConfig,
) -> Action {
    use ActionKind::*;

    match last.kind {
        // 交接序列
        Seek => Action::bare(Align),
        Align => Action::bare(Jog),
        Jog => Action::bare(Transfer),
        Transfer => {
            // 旗标置位是本决策唯一的副作用，放在最后一步
            state.transfer_complete = true;
            Action::bare(Wait)
        }
        // 交接完成后保持等待，直到会话操作或时钟接管
        Wait => Action::bare(Wait),

        // 采集满额：任何采集动作之后都转入交接
        _ if state.counts.total() >= config.harvest_goal => Action::bare(Seek),

        // 回零完成：初始推进
        Zero => Action::with_magnitude(Forward, config.approach_mm),

        // 采集阶段：由视觉驱动的运动动作
        Forward | TurnLeft | TurnRight | Continue | EndRow | Reverse => match vision {
            Some(v) => {
                if v.distance <= config.target_distance {
                    // 够近即抓取；计数与颜色记忆在最后更新
                    let action = grab_action(v.color);
                    state.counts.increment(v.color);
                    state.last_color = Some(v.color);
                    action
                } else if v.heading < -config.alignment_tolerance {
                    Action::with_magnitude(TurnLeft, v.heading.abs())
                } else if v.heading > config.alignment_tolerance {
                    state.last_heading_mag = v.heading.abs();
                    Action::with_magnitude(TurnRight, v.heading.abs())
                } else {
                    state.last_heading_mag = v.heading.abs();
                    Action::with_magnitude(Forward, v.distance.abs())
                }
            }
            None => {
                let remembered = state.last_heading_mag;
                if last.kind == Forward
                    && remembered > 0
                    && remembered <= config.dead_reckon_max
                    && state.last_color.is_some()
                {
                    // 刚刚在近距离上推进，盲抓：信任航位推算
                    let color = state.last_color.unwrap_or(ColorLabel::Green);
                    let action = grab_action(color);
                    state.counts.increment(color);
                    action
                } else {
                    // 后退重新搜索
                    state.last_heading_mag = config.retreat_mm;
                    Action::with_magnitude(Reverse, config.retreat_mm)
                }
            }
        },

        // 抓取完成：行首/行尾（第 1、7 个球）转弯，否则继续本行
        Green | Orange => {
            let total = state.counts.total();
            if total == 1 || total == 7 {
                Action::bare(EndRow)
            } else {
                Action::bare(Continue)
            }
        }

        // 未定义状态：记录并原样返回未知码（不做臆测恢复）
        Unknown | Dump => {
            warn!(last = %last, "picker reported unhandled state");
            Action::bare(Unknown)
        }
    }
}

/// 运送机器人状态机
///
/// 固定序列 `Z→J→A→F→T→W`；在 `W` 上忙等交接旗标——这是两台
/// 机器人之间唯一的协调通道，完全经由共享比赛状态，不存在
/// 机器人之间的直接消息。旗标置位后按计数卸载两种颜色。
fn decide_delivery(last: &Action, state: &mut MatchState) -> Action {
    use ActionKind::*;

    match last.kind {
        Zero => Action::bare(Jog),
        Jog => Action::bare(Align),
        Align => Action::bare(Forward),
        Forward => Action::bare(Transfer),
        Transfer => Action::bare(Wait),
        Wait => {
            if state.transfer_complete {
                Action::bare(TurnRight)
            } else {
                Action::bare(Wait)
            }
        }
        TurnRight => {
            Action::with_magnitude(Green, state.counts.get(ColorLabel::Green) as i32)
        }
        Green => {
            Action::with_magnitude(Orange, state.counts.get(ColorLabel::Orange) as i32)
        }
        Orange => Action::bare(Dump),
        // `D` 之后的行为在赛项规则层面未定义；显式报未知而不是静默循环
        _ => {
            warn!(last = %last, "delivery reported unhandled state");
            Action::bare(Unknown)
        }
    }
}
