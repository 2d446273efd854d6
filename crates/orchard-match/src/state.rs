//! 比赛状态与会话控制
//!
//! 状态机只有两个存储状态：**Paused**（初始）和 **Running**。
//! "Expired" 是派生判断（运行中且剩余时钟归零），每次求值时
//! 现算，不单独存储。
//!
//! 时钟语义沿用赛场惯例：`stop()` 冻结剩余时间，`run()` 从冻结处
//! 继续；只有 `reset()` 把时钟、计数和交接旗标全部重置。

use orchard_vision::ColorLabel;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

/// 按颜色统计的采集计数
///
/// 不变量：只增不减，唯一的清零途径是 `reset`。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CountMap {
    green: u32,
    orange: u32,
}

impl CountMap {
    pub fn get(&self, color: ColorLabel) -> u32 {
        match color {
            ColorLabel::Green => self.green,
            ColorLabel::Orange => self.orange,
        }
    }

    /// 成功抓取后由决策引擎调用
    pub fn increment(&mut self, color: ColorLabel) {
        match color {
            ColorLabel::Green => self.green += 1,
            ColorLabel::Orange => self.orange += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.green + self.orange
    }
}

/// 比赛状态（进程内唯一，一场比赛一份）
#[derive(Debug)]
pub struct MatchState {
    running: bool,
    /// 配置的比赛全长
    duration: Duration,
    /// 暂停时冻结的剩余时间
    frozen_remaining: Duration,
    /// 运行时的截止时刻
    deadline: Option<Instant>,
    /// 按颜色的采集计数
    pub counts: CountMap,
    /// 跨机器人交接旗标：采摘侧置位，运送侧读取。
    /// 这是两台机器人之间唯一的协调通道。
    pub transfer_complete: bool,
    /// 短期记忆：最近一次视觉命中的航向幅值（航位推算备份）
    pub last_heading_mag: i32,
    /// 短期记忆：最近一次抓取的颜色
    pub last_color: Option<ColorLabel>,
}

impl MatchState {
    /// 创建暂停状态的新比赛，时钟满额
    pub fn new(duration: Duration) -> Self {
        Self {
            running: false,
            duration,
            frozen_remaining: duration,
            deadline: None,
            counts: CountMap::default(),
            transfer_complete: false,
            last_heading_mag: 0,
            last_color: None,
        }
    }

    pub fn running(&self) -> bool {
        self.running
    }

    /// 剩余时钟（派生值）
    pub fn remaining(&self) -> Duration {
        match self.deadline {
            Some(deadline) if self.running => {
                deadline.saturating_duration_since(Instant::now())
            }
            _ => self.frozen_remaining,
        }
    }

    /// 是否已到时（派生状态：Running 且剩余时钟归零）
    pub fn expired(&self) -> bool {
        self.running && self.remaining() == Duration::ZERO
    }

    /// Paused → Running（幂等）
    pub fn run(&mut self) {
        if !self.running {
            self.deadline = Some(Instant::now() + self.frozen_remaining);
            self.running = true;
        }
    }

    /// Running/Expired → Paused，冻结剩余时钟（幂等）
    pub fn stop(&mut self) {
        if self.running {
            self.frozen_remaining = self.remaining();
            self.deadline = None;
            self.running = false;
        }
    }

    /// 任意状态 → Paused，时钟、计数、旗标全部重置
    pub fn reset(&mut self) {
        *self = Self::new(self.duration);
    }
}

/// 状态快照（锁外观察用，不含锁）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchSnapshot {
    pub running: bool,
    pub expired: bool,
    pub remaining: Duration,
    pub counts: CountMap,
    pub transfer_complete: bool,
}

/// 共享比赛状态句柄
///
/// 决策引擎、会话操作和时钟监视器全部经由这一把锁串行化，
/// 保证到时判断不会与计数递增交错。
#[derive(Debug, Clone)]
pub struct SharedMatch {
    inner: Arc<Mutex<MatchState>>,
}

impl SharedMatch {
    pub fn new(duration: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(MatchState::new(duration))),
        }
    }

    /// 持锁执行一次状态访问/变更
    pub fn with<R>(&self, f: impl FnOnce(&mut MatchState) -> R) -> R {
        let mut guard = self.inner.lock();
        f(&mut guard)
    }

    /// 会话操作：开始/继续比赛
    pub fn run(&self) {
        info!("session: running match");
        self.inner.lock().run();
    }

    /// 会话操作：暂停比赛（冻结时钟，保留计数）
    pub fn stop(&self) {
        info!("session: halting match");
        self.inner.lock().stop();
    }

    /// 会话操作：重置到初始状态
    pub fn reset(&self) {
        info!("session: resetting match");
        self.inner.lock().reset();
    }

    pub fn snapshot(&self) -> MatchSnapshot {
        let state = self.inner.lock();
        MatchSnapshot {
            running: state.running(),
            expired: state.expired(),
            remaining: state.remaining(),
            counts: state.counts,
            transfer_complete: state.transfer_complete,
        }
    }
}
