//! 控制参数管理命令

use super::load_config;
use anyhow::{Context, Result};
use clap::Subcommand;
use maze_sdk::prelude::*;
use std::path::PathBuf;

/// 配置命令
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// 打印控制参数（默认值或指定文件）
    Show {
        /// 配置文件
        path: Option<PathBuf>,
    },

    /// 写出默认控制参数
    Init {
        /// 目标文件
        path: PathBuf,

        /// 覆盖已存在的文件
        #[arg(short, long)]
        force: bool,
    },

    /// 检查配置文件
    Check {
        /// 配置文件
        path: PathBuf,
    },
}

impl ConfigCommand {
    pub fn execute(self) -> Result<()> {
        match self {
            ConfigCommand::Show { path } => {
                let config = load_config(path.as_deref())?;
                print!("{}", config.to_toml_string()?);
                Ok(())
            },

            ConfigCommand::Init { path, force } => {
                if path.exists() && !force {
                    anyhow::bail!("文件已存在: {}（使用 --force 覆盖）", path.display());
                }
                ControlConfig::default().save_to_file(&path)?;
                println!("✅ 默认配置已写入: {}", path.display());
                Ok(())
            },

            ConfigCommand::Check { path } => {
                ControlConfig::load_from_file(&path)
                    .with_context(|| format!("配置无效: {}", path.display()))?;
                println!("✅ 配置有效: {}", path.display());
                Ok(())
            },
        }
    }
}
