//! 机器人轮询网关
//!
//! 传输形式：TCP 上的单行 JSON，一次轮询一条短连接。机器人
//! 连接、发送一条请求、读取一条响应、断开；网关串行处理，
//! 严格一问一答——每条请求至多一条响应，处理成功的请求必有
//! 响应，畸形请求记日志后丢弃且**不回复**，由机器人按自己的
//! 周期超时重试。

use crate::GatewayError;
use orchard_match::{DecisionConfig, SharedMatch, decide};
use orchard_protocol::{ActionRequest, ActionResponse, RobotId};
use orchard_vision::{VisionConfig, locate};
use std::io::{BufRead, BufReader, Write};
use std::net::{SocketAddr, TcpListener, TcpStream, ToSocketAddrs};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// 接受循环在无连接时的让步间隔
const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// 轮询网关
///
/// 单线程：一次只终结一个请求/响应交换。采摘机器人的视觉评估
/// 在这里内联执行，随后持比赛状态锁调用决策引擎。
pub struct Gateway {
    listener: TcpListener,
    shared: SharedMatch,
    vision: VisionConfig,
    decision: DecisionConfig,
    stop: Arc<AtomicBool>,
}

impl Gateway {
    /// 绑定监听地址
    pub fn bind<A: ToSocketAddrs>(
        addr: A,
        shared: SharedMatch,
        vision: VisionConfig,
        decision: DecisionConfig,
    ) -> Result<Self, GatewayError> {
        let listener = TcpListener::bind(addr)?;
        // 非阻塞 accept，让停止旗标有机会被检查
        listener.set_nonblocking(true)?;
        info!(addr = %listener.local_addr()?, "gateway listening");
        Ok(Self {
            listener,
            shared,
            vision,
            decision,
            stop: Arc::new(AtomicBool::new(false)),
        })
    }

    /// 实际监听地址（测试用 `:0` 绑定时读取）
    pub fn local_addr(&self) -> Result<SocketAddr, GatewayError> {
        Ok(self.listener.local_addr()?)
    }

    /// 停止旗标句柄（ctrl-c 处理器/测试置位）
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        self.stop.clone()
    }

    /// 接受循环：阻塞当前线程直到停止旗标置位
    pub fn run(&self) -> Result<(), GatewayError> {
        while !self.stop.load(Ordering::Relaxed) {
            match self.listener.accept() {
                Ok((stream, peer)) => {
                    debug!(peer = %peer, "robot connected");
                    if let Err(err) = self.serve_exchange(stream) {
                        // 传输失败只影响当前周期，机器人下一周期重试
                        warn!(peer = %peer, error = %err, "exchange failed");
                    }
                }
                Err(err) if err.kind() == std::io::ErrorKind::WouldBlock => {
                    std::thread::sleep(ACCEPT_POLL_INTERVAL);
                }
                Err(err) => {
                    error!(error = %err, "accept failed");
                    return Err(err.into());
                }
            }
        }
        info!("gateway stopped");
        Ok(())
    }

    /// 终结一次请求/响应交换
    fn serve_exchange(&self, stream: TcpStream) -> Result<(), GatewayError> {
        stream.set_nonblocking(false)?;
        let mut reader = BufReader::new(stream.try_clone()?);
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            return Ok(()); // 对端空连接即断开
        }

        let reply = match self.handle_request(line.trim_end()) {
            Ok(reply) => reply,
            Err(err) => {
                // 畸形请求：记日志后丢弃，不回复，状态不变
                warn!(error = %err, "malformed request dropped");
                return Ok(());
            }
        };

        let mut stream = stream;
        stream.write_all(reply.as_bytes())?;
        stream.write_all(b"\n")?;
        stream.flush()?;
        Ok(())
    }

    /// 解码 → （采摘侧）视觉 → 决策 → 编码
    fn handle_request(&self, line: &str) -> Result<String, GatewayError> {
        let request = ActionRequest::decode(line)?;

        // 视觉评估在锁外执行，锁只覆盖决策本身
        let vision = match (request.robot, &request.frame) {
            (RobotId::Picker, Some(frame)) => locate(frame, &self.vision),
            _ => None,
        };

        let action = self.shared.with(|state| {
            decide(
                request.robot,
                &request.last_action,
                state,
                vision.as_ref(),
                &self.decision,
            )
        });

        debug!(robot = %request.robot, action = %action, "reply");
        Ok(ActionResponse::new(action).encode()?)
    }
}
