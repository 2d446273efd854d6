//! 时钟监视线程
//!
//! 周期性地刷新派生时钟并检查 Running → Expired 转换，
//! 与轮询处理共用一把状态锁，两者互斥。到时是派生判断，
//! 监视线程只观察并记日志，不翻转 `running`——暂停仍然
//! 归会话操作管。

use crossbeam_channel::{Sender, bounded};
use orchard_match::SharedMatch;
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::{info, trace, warn};

/// 后台时钟监视器（Drop 时停止并 join）
pub struct ClockMonitor {
    stop_tx: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl ClockMonitor {
    /// 启动监视线程
    pub fn start(shared: SharedMatch, interval: Duration) -> Self {
        let (stop_tx, stop_rx) = bounded::<()>(1);
        let handle = std::thread::spawn(move || {
            let mut was_expired = false;
            loop {
                // recv_timeout 同时充当节拍器和停止信号
                match stop_rx.recv_timeout(interval) {
                    Ok(()) | Err(crossbeam_channel::RecvTimeoutError::Disconnected) => break,
                    Err(crossbeam_channel::RecvTimeoutError::Timeout) => {}
                }
                let snapshot = shared.snapshot();
                trace!(
                    running = snapshot.running,
                    remaining_secs = snapshot.remaining.as_secs(),
                    collected = snapshot.counts.total(),
                    "clock tick"
                );
                if snapshot.expired && !was_expired {
                    info!("match clock expired");
                }
                was_expired = snapshot.expired;
            }
        });
        Self {
            stop_tx: Some(stop_tx),
            handle: Some(handle),
        }
    }
}

impl Drop for ClockMonitor {
    fn drop(&mut self) {
        // 先关停止通道再 join，避免监视线程卡在下一个节拍上
        drop(self.stop_tx.take());
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("clock-monitor thread panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monitor_starts_and_stops() {
        let shared = SharedMatch::new(Duration::from_secs(300));
        let monitor = ClockMonitor::start(shared.clone(), Duration::from_millis(10));
        std::thread::sleep(Duration::from_millis(50));
        shared.run();
        std::thread::sleep(Duration::from_millis(50));
        drop(monitor); // 必须干净退出，不挂起
        assert!(shared.snapshot().running);
    }
}
