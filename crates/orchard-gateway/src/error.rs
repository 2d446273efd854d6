//! 网关层错误类型定义

use orchard_protocol::ProtocolError;
use thiserror::Error;

/// 网关层错误类型
#[derive(Error, Debug)]
pub enum GatewayError {
    /// 套接字绑定/读写失败
    #[error("Transport IO error: {0}")]
    Io(#[from] std::io::Error),

    /// 线级报文解析失败（含未知机器人标识）
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// 配置文件解析失败
    #[error("Config parse error in {path}: {source}")]
    ConfigParse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    /// 配置序列化失败
    #[error("Config serialize error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),
}
