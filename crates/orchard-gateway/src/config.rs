//! 仲裁器配置
//!
//! 进程启动时加载一次，运行期只读。缺省值覆盖所有字段，
//! 空文件等价于默认配置。

use crate::GatewayError;
use orchard_match::DecisionConfig;
use orchard_vision::VisionConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// 网关监听配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// 监听地址
    pub bind: String,
    /// 时钟监视线程的刷新间隔（毫秒）
    pub tick_interval_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:5555".to_string(),
            tick_interval_ms: 200,
        }
    }
}

/// 比赛参数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// 一场比赛的全长（秒）
    pub duration_secs: u64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self { duration_secs: 300 }
    }
}

impl MatchConfig {
    pub fn duration(&self) -> Duration {
        Duration::from_secs(self.duration_secs)
    }
}

/// 仲裁器全量配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArbiterConfig {
    pub server: ServerConfig,
    #[serde(rename = "match")]
    pub match_config: MatchConfig,
    pub vision: VisionConfig,
    pub decision: DecisionConfig,
}

impl ArbiterConfig {
    /// 从 TOML 文件加载
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, GatewayError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|source| GatewayError::ConfigParse {
            path: path.display().to_string(),
            source,
        })
    }

    /// 序列化为 TOML（`config init` 用）
    pub fn to_toml(&self) -> Result<String, GatewayError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ArbiterConfig::default();
        assert_eq!(config.server.bind, "0.0.0.0:5555");
        assert_eq!(config.match_config.duration(), Duration::from_secs(300));
        assert_eq!(config.decision.target_distance, 20);
        assert_eq!(config.vision.profiles.len(), 2);
    }

    #[test]
    fn test_load_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[server]\nbind = \"127.0.0.1:7000\"\n\n[match]\nduration_secs = 120\n"
        )
        .unwrap();
        let config = ArbiterConfig::load(file.path()).unwrap();
        assert_eq!(config.server.bind, "127.0.0.1:7000");
        assert_eq!(config.match_config.duration_secs, 120);
        // 未写出的段落回落到默认值
        assert_eq!(config.server.tick_interval_ms, 200);
        assert_eq!(config.decision.harvest_goal, 8);
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = ArbiterConfig::default();
        let text = config.to_toml().unwrap();
        let back: ArbiterConfig = toml::from_str(&text).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_load_rejects_bad_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "server = not toml").unwrap();
        assert!(matches!(
            ArbiterConfig::load(file.path()),
            Err(GatewayError::ConfigParse { .. })
        ));
    }
}
