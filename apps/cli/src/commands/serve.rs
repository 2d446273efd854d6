//! `serve` 子命令：启动仲裁器

use super::load_config;
use anyhow::{Context, Result};
use clap::Args;
use orchard_gateway::{ClockMonitor, Gateway};
use orchard_match::SharedMatch;
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::time::Duration;
use tracing::info;

#[derive(Args, Debug)]
pub struct ServeCommand {
    /// 配置文件路径（缺省用内置默认值）
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 覆盖配置中的监听地址
    #[arg(short, long)]
    bind: Option<String>,

    /// 启动后立即开表（无操作台时的单机模式）
    #[arg(long)]
    autostart: bool,
}

impl ServeCommand {
    pub fn execute(self) -> Result<()> {
        let config = load_config(self.config.as_deref())?;
        let bind = self.bind.unwrap_or_else(|| config.server.bind.clone());

        let shared = SharedMatch::new(config.match_config.duration());
        let _monitor = ClockMonitor::start(
            shared.clone(),
            Duration::from_millis(config.server.tick_interval_ms),
        );

        let gateway = Gateway::bind(
            bind.as_str(),
            shared.clone(),
            config.vision,
            config.decision,
        )
        .with_context(|| format!("failed to bind {bind}"))?;

        // ctrl-c 置停止旗标，accept 循环在下一个节拍退出
        let stop = gateway.stop_handle();
        ctrlc::set_handler(move || {
            info!("shutdown requested");
            stop.store(true, Ordering::Relaxed);
        })
        .context("failed to install ctrl-c handler")?;

        if self.autostart {
            shared.run();
        }

        info!(
            duration_secs = config.match_config.duration_secs,
            autostart = self.autostart,
            "arbiter up"
        );
        gateway.run()?;
        Ok(())
    }
}
