//! 网关回环集成测试
//!
//! 真实 TCP 回环：绑定 `127.0.0.1:0`，在后台线程跑接受循环，
//! 用短连接模拟机器人轮询。

use orchard_gateway::Gateway;
use orchard_match::{DecisionConfig, SharedMatch};
use orchard_protocol::{Action, ActionKind, ActionRequest, ActionResponse, RobotId};
use orchard_vision::VisionConfig;
use std::io::{BufRead, BufReader, Write};
use std::net::{SocketAddr, TcpStream};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

struct TestGateway {
    addr: SocketAddr,
    shared: SharedMatch,
    stop: Arc<AtomicBool>,
    handle: Option<std::thread::JoinHandle<()>>,
}

impl TestGateway {
    fn start() -> Self {
        let shared = SharedMatch::new(Duration::from_secs(300));
        let gateway = Gateway::bind(
            "127.0.0.1:0",
            shared.clone(),
            VisionConfig::default(),
            DecisionConfig::default(),
        )
        .expect("bind");
        let addr = gateway.local_addr().expect("local addr");
        let stop = gateway.stop_handle();
        let handle = std::thread::spawn(move || {
            gateway.run().expect("gateway run");
        });
        Self {
            addr,
            shared,
            stop,
            handle: Some(handle),
        }
    }

    /// 一次机器人轮询：连接、发一行、收一行、断开
    fn poll(&self, robot: RobotId, last_action: &str) -> Action {
        let request = ActionRequest {
            robot,
            last_action: last_action.parse().expect("valid action"),
            frame: None,
        };
        let line = request.encode().expect("encode");
        let reply = self.exchange(&line).expect("reply expected");
        ActionResponse::decode(&reply).expect("decode reply").action
    }

    /// 发送原始一行，返回响应行（若有）
    fn exchange(&self, line: &str) -> Option<String> {
        let mut stream = TcpStream::connect(self.addr).expect("connect");
        stream.write_all(line.as_bytes()).expect("write");
        stream.write_all(b"\n").expect("write newline");
        stream.flush().expect("flush");
        // 畸形请求不会有响应：对端直接关闭连接
        let mut reader = BufReader::new(stream);
        let mut reply = String::new();
        let n = reader.read_line(&mut reply).expect("read");
        if n == 0 { None } else { Some(reply.trim_end().to_string()) }
    }
}

impl Drop for TestGateway {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

#[test]
fn test_paused_match_sends_zero() {
    let gw = TestGateway::start();
    let action = gw.poll(RobotId::Picker, "F5000");
    assert_eq!(action, Action::bare(ActionKind::Zero));
}

#[test]
fn test_running_match_drives_picker_fsm() {
    let gw = TestGateway::start();
    gw.shared.run();
    let action = gw.poll(RobotId::Picker, "Z");
    assert_eq!(action.encode(), "F5000");
    // 无帧 → 无视觉 → 无记忆时后退重搜
    let action = gw.poll(RobotId::Picker, "C");
    assert_eq!(action.encode(), "B500");
}

#[test]
fn test_delivery_busy_waits_on_handoff_flag() {
    let gw = TestGateway::start();
    gw.shared.run();
    let action = gw.poll(RobotId::Delivery, "W");
    assert_eq!(action, Action::bare(ActionKind::Wait));
    gw.shared.with(|state| state.transfer_complete = true);
    let action = gw.poll(RobotId::Delivery, "W");
    assert_eq!(action, Action::bare(ActionKind::TurnRight));
}

#[test]
fn test_malformed_request_is_dropped_without_reply() {
    let gw = TestGateway::start();
    assert_eq!(gw.exchange("this is not json"), None);
    // 未知机器人标识同样被丢弃，不影响后续周期
    assert_eq!(
        gw.exchange(r#"{"robot":"scout","last_action":"Z"}"#),
        None
    );
    // 网关仍然存活，正常请求照常服务
    let action = gw.poll(RobotId::Delivery, "Z");
    assert_eq!(action, Action::bare(ActionKind::Zero));
}

#[test]
fn test_reset_clears_state_between_polls() {
    let gw = TestGateway::start();
    gw.shared.run();
    gw.shared.with(|state| {
        state.counts.increment(orchard_vision::ColorLabel::Green);
        state.transfer_complete = true;
    });
    gw.shared.reset();
    let snap = gw.shared.snapshot();
    assert_eq!(snap.counts.total(), 0);
    assert!(!snap.transfer_complete);
    // 重置后回到 Paused：轮询得到回零
    let action = gw.poll(RobotId::Picker, "W");
    assert_eq!(action, Action::bare(ActionKind::Zero));
}
