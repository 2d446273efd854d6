//! `config` 子命令：查看/生成配置

use super::load_config;
use anyhow::{Context, Result, bail};
use clap::Subcommand;
use orchard_gateway::ArbiterConfig;
use std::path::PathBuf;

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// 打印生效配置（TOML）
    Show {
        /// 配置文件路径（缺省打印内置默认值）
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// 写出一份默认配置文件
    Init {
        /// 目标路径
        path: PathBuf,

        /// 允许覆盖已存在的文件
        #[arg(long)]
        force: bool,
    },
}

impl ConfigCommand {
    pub fn execute(self) -> Result<()> {
        match self {
            ConfigCommand::Show { config } => {
                let config = load_config(config.as_deref())?;
                print!("{}", config.to_toml()?);
                Ok(())
            }
            ConfigCommand::Init { path, force } => {
                if path.exists() && !force {
                    bail!("{} already exists (use --force to overwrite)", path.display());
                }
                let text = ArbiterConfig::default().to_toml()?;
                std::fs::write(&path, text)
                    .with_context(|| format!("failed to write {}", path.display()))?;
                println!("wrote {}", path.display());
                Ok(())
            }
        }
    }
}
