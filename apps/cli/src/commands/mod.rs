//! CLI 子命令实现

mod config;
mod locate;
mod serve;

pub use config::ConfigCommand;
pub use locate::LocateCommand;
pub use serve::ServeCommand;

use anyhow::{Context, Result};
use orchard_gateway::ArbiterConfig;
use std::path::Path;

/// 加载配置；文件缺省或不存在时回落到默认值
pub(crate) fn load_config(path: Option<&Path>) -> Result<ArbiterConfig> {
    match path {
        Some(path) => ArbiterConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display())),
        None => Ok(ArbiterConfig::default()),
    }
}
