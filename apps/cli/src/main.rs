//! # Orchard Arbiter CLI
//!
//! 赛场仲裁器的命令行入口。
//!
//! ```bash
//! # 启动仲裁器（可选 --autostart 立即开表）
//! orchard-arbiter serve --config arbiter.toml --autostart
//!
//! # 在一张静态图上离线跑一遍视觉流水线（标定用）
//! orchard-arbiter locate captures/tree_03.jpg
//!
//! # 查看/生成配置
//! orchard-arbiter config show
//! orchard-arbiter config init arbiter.toml
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

use commands::{ConfigCommand, LocateCommand, ServeCommand};

/// Orchard Arbiter - 双机器人赛场仲裁器
#[derive(Parser, Debug)]
#[command(name = "orchard-arbiter")]
#[command(about = "Central arbiter for the picker/delivery robot pair", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 启动仲裁器服务
    Serve {
        #[command(flatten)]
        args: ServeCommand,
    },

    /// 在静态图像上运行一次目标获取流水线
    Locate {
        #[command(flatten)]
        args: LocateCommand,
    },

    /// 配置管理
    #[command(subcommand)]
    Config(ConfigCommand),
}

fn main() -> Result<()> {
    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { args } => args.execute(),
        Commands::Locate { args } => args.execute(),
        Commands::Config(cmd) => cmd.execute(),
    }
}
