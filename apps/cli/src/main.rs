//! # Maze CLI
//!
//! 在仿真线迷宫上运行完整流程：探索 → 代价传播 → 路径构建 → 回放。
//!
//! ```bash
//! # 随机生成一个 6×5 的树形迷宫并求解
//! maze-cli solve --seed 7 --width 6 --height 5
//!
//! # 从描述文件加载迷宫，使用自定义控制参数，输出 JSON
//! maze-cli solve --maze maze.toml --config control.toml --json
//!
//! # 生成迷宫描述文件
//! maze-cli generate --seed 7 --output maze.toml
//!
//! # 导出默认控制参数
//! maze-cli config init control.toml
//! ```
//!
//! 日志级别通过 `RUST_LOG` 控制（默认 `warn`，`-v` 提升为 `info`）。

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

use commands::{ConfigCommand, GenerateCommand, SolveCommand};

/// Maze CLI - 线迷宫仿真与求解工具
#[derive(Parser, Debug)]
#[command(name = "maze-cli")]
#[command(about = "Simulate, solve and replay line mazes", long_about = None)]
#[command(version)]
struct Cli {
    /// 输出 info 级别日志
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 探索并求解迷宫，然后回放
    Solve {
        #[command(flatten)]
        args: SolveCommand,
    },

    /// 生成随机迷宫描述文件
    Generate {
        #[command(flatten)]
        args: GenerateCommand,
    },

    /// 控制参数管理
    #[command(subcommand)]
    Config(ConfigCommand),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    maze_sdk::logging::init_with_default(if cli.verbose { "info" } else { "warn" });

    match cli.command {
        Commands::Solve { args } => args.execute(),

        Commands::Generate { args } => args.execute(),

        Commands::Config(cmd) => cmd.execute(),
    }
}
