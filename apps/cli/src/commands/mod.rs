//! 命令模块

pub mod config;
pub mod generate;
pub mod solve;

pub use config::ConfigCommand;
pub use generate::GenerateCommand;
pub use solve::SolveCommand;

use anyhow::{Context, Result};
use clap::Args;
use maze_sdk::hal::mock::MazeDescription;
use maze_sdk::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::fs;
use std::path::{Path, PathBuf};

/// 迷宫来源：描述文件或随机生成
#[derive(Args, Debug, Clone)]
pub struct MazeSource {
    /// 迷宫描述文件（TOML）
    #[arg(short, long, conflicts_with = "seed")]
    pub maze: Option<PathBuf>,

    /// 随机迷宫种子（未指定时使用随机种子）
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// 随机迷宫宽度（1..=8）
    #[arg(long, default_value_t = 6)]
    pub width: u8,

    /// 随机迷宫高度（1..=7）
    #[arg(long, default_value_t = 5)]
    pub height: u8,
}

impl MazeSource {
    /// 加载或生成迷宫
    pub fn load(&self) -> Result<SimMaze> {
        match &self.maze {
            Some(path) => load_maze(path),
            None => {
                let seed = self.seed.unwrap_or_else(rand::random);
                let mut rng = StdRng::seed_from_u64(seed);
                let maze = random_tree(&mut rng, self.width, self.height)?;
                tracing::info!(seed, width = self.width, height = self.height, "Generated maze");
                Ok(maze)
            },
        }
    }
}

/// 从 TOML 描述文件加载迷宫
pub fn load_maze(path: &Path) -> Result<SimMaze> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("读取迷宫文件失败: {}", path.display()))?;
    let desc: MazeDescription =
        toml::from_str(&text).with_context(|| format!("解析迷宫文件失败: {}", path.display()))?;
    let maze = SimMaze::try_from(&desc)?;
    Ok(maze)
}

/// 加载控制参数（未指定文件时使用默认值）
pub fn load_config(path: Option<&Path>) -> Result<ControlConfig> {
    match path {
        Some(path) => Ok(ControlConfig::load_from_file(path)?),
        None => Ok(ControlConfig::default()),
    }
}
