//! solve 命令
//!
//! 在仿真迷宫上探索、求解，并依次执行保守/激进回放

use super::{MazeSource, load_config};
use anyhow::Result;
use clap::Args;
use maze_sdk::prelude::*;
use serde::Serialize;
use std::path::PathBuf;

/// 求解命令参数
#[derive(Args, Debug)]
pub struct SolveCommand {
    #[command(flatten)]
    pub source: MazeSource,

    /// 控制参数文件（TOML）
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 第一次检测到终点即停止探索
    #[arg(long)]
    pub first_finish: bool,

    /// 传感器噪声幅值
    #[arg(long, default_value_t = 0)]
    pub noise: u16,

    /// 跳过回放
    #[arg(long)]
    pub no_replay: bool,

    /// 以 JSON 输出结果
    #[arg(long)]
    pub json: bool,
}

/// 单次回放结果
#[derive(Debug, Serialize)]
pub struct ReplaySummary {
    pub runs: usize,
    pub reached_finish: bool,
    pub elapsed_ms: u32,
}

impl From<ExecutionReport> for ReplaySummary {
    fn from(report: ExecutionReport) -> Self {
        Self {
            runs: report.runs,
            reached_finish: report.reached_finish,
            elapsed_ms: report.elapsed_ms,
        }
    }
}

/// 求解结果
#[derive(Debug, Serialize)]
pub struct SolveSummary {
    pub segments: u32,
    pub loops_detected: u32,
    pub closed: bool,
    pub finish: Option<Position>,
    pub path: Vec<PathSegment>,
    pub total_hops: u32,
    pub exploration_ms: u32,
    pub conservative: Option<ReplaySummary>,
    pub aggressive: Option<ReplaySummary>,
}

impl SolveCommand {
    pub fn execute(&self) -> Result<()> {
        let summary = self.run()?;
        if self.json {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Ok(())
    }

    /// 执行求解并返回结果（非 JSON 模式下同时打印进度）
    pub fn run(&self) -> Result<SolveSummary> {
        let maze = self.source.load()?;
        let mut config = load_config(self.config.as_deref())?;
        if self.first_finish {
            config.exploration.finish_policy = FinishPolicy::FirstFinish;
        }

        let sim = SimConfig {
            noise: self.noise,
            seed: self.source.seed.unwrap_or_default(),
            ..SimConfig::default()
        };
        let robot = SimRobot::with_config(maze, sim);

        if !self.json {
            println!("🧭 探索迷宫...");
        }
        let solver = MazeSolver::new(robot, config)?;
        let mut solver = solver.map_maze()?;
        let exploration_ms = solver.robot().get_ms();

        let report = solver.exploration_report();
        let mut summary = SolveSummary {
            segments: report.segments,
            loops_detected: report.loops_detected,
            closed: report.closed,
            finish: report.finish,
            path: solver.path().segments().to_vec(),
            total_hops: solver.path().total_hops(),
            exploration_ms,
            conservative: None,
            aggressive: None,
        };

        if !self.json {
            println!();
            print!("{}", solver.grid());
            println!();
            println!("📊 探索结果:");
            println!("  跟随段数: {}", summary.segments);
            println!("  环路回退: {}", summary.loops_detected);
            println!("  完全闭合: {}", if summary.closed { "是" } else { "否" });
            println!("  耗时: {} ms", exploration_ms);
            println!("  路径: {} ({} 格)", solver.path(), summary.total_hops);
        }

        if !self.no_replay {
            solver.robot_mut().reset();
            let conservative = solver.run_maze_conservative();
            solver.robot_mut().reset();
            let aggressive = solver.run_maze_aggressive();

            if !self.json {
                println!();
                println!("🏁 回放:");
                print_replay("保守", &conservative);
                print_replay("激进", &aggressive);
            }
            summary.conservative = Some(conservative.into());
            summary.aggressive = Some(aggressive.into());
        }

        Ok(summary)
    }
}

fn print_replay(label: &str, report: &ExecutionReport) {
    let mark = if report.reached_finish { "✅" } else { "❌" };
    println!(
        "  {} {}: {} 次跟随, {} ms",
        mark, label, report.runs, report.elapsed_ms
    );
}
