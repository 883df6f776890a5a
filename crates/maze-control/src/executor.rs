//! # 路径回放
//!
//! 两种模式都只读路径，不触碰网格。
//!
//! - **保守**：逐段以基础功率跟随，路口处对中后按记录的转向慢速转弯
//! - **激进**：把连续的直行段合并成一次长距离跟随（忽略中间路口），
//!   按速度曲线加减速，路口处快速转弯
//!
//! 回放前机器人应回到起点，朝向与探索出发时相同。

use crate::config::{CenteringConfig, ControlConfig, TurnConfig};
use crate::follower::{SegmentEnd, SegmentFollower, SpeedProfile};
use crate::turns::{creep, pivot};
use maze_hal::LineRobot;
use maze_map::{Path, Turn};
use smallvec::SmallVec;
use std::fmt;
use tracing::{info, warn};

/// 合并后的一次跟随
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergedRun {
    /// 跟随结束后的转向
    pub turn: Turn,
    /// 覆盖的格数（两端都计）
    pub cells: u8,
    /// 途中需要直行穿过的路口数
    pub ignore: u8,
}

impl fmt::Display for MergedRun {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.turn, self.cells)?;
        if self.ignore > 0 {
            write!(f, "(+{})", self.ignore)?;
        }
        Ok(())
    }
}

/// 合并连续的直行段
///
/// 合并后的格数 = 各段跳数之和 + 1；`ignore` = 被合并的直行段数。
pub fn merge_runs(path: &Path) -> SmallVec<[MergedRun; 16]> {
    let mut runs = SmallVec::new();
    let mut hops: u32 = 0;
    let mut ignore: u8 = 0;

    for segment in path.iter() {
        hops += segment.hops() as u32;
        if segment.turn == Turn::Straight {
            ignore = ignore.saturating_add(1);
            continue;
        }
        runs.push(MergedRun {
            turn: segment.turn,
            cells: (hops + 1).min(u8::MAX as u32) as u8,
            ignore,
        });
        hops = 0;
        ignore = 0;
    }

    // 不完整的路径：末尾的直行段单独成一次跟随
    if ignore > 0 {
        runs.push(MergedRun {
            turn: Turn::Straight,
            cells: (hops + 1).min(u8::MAX as u32) as u8,
            ignore: ignore - 1,
        });
    }
    runs
}

/// 回放报告
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExecutionReport {
    /// 执行的跟随次数（保守模式为段数，激进模式为合并后的次数）
    pub runs: usize,
    /// 结束时中间三个传感器都在终点色块上
    pub reached_finish: bool,
    pub elapsed_ms: u32,
}

/// 路径回放器
#[derive(Debug, Clone, Copy)]
pub struct PathExecutor {
    follower: SegmentFollower,
    centering: CenteringConfig,
    turns: TurnConfig,
    speed: SpeedProfile,
}

impl PathExecutor {
    pub fn new(config: &ControlConfig) -> Self {
        Self {
            follower: SegmentFollower::new(config.follower),
            centering: config.centering,
            turns: config.turns,
            speed: SpeedProfile::new(config.speed),
        }
    }

    /// 保守回放
    ///
    /// `launch` 是出发前需要的转向（见 `MazeSession::launch_turn`）。
    pub fn run_conservative<R: LineRobot + ?Sized>(
        &self,
        robot: &mut R,
        path: &Path,
        launch: Turn,
    ) -> ExecutionReport {
        let begin = robot.get_ms();
        info!(path = %path, "Conservative replay started");
        pivot(robot, launch, &self.turns.conservative);

        let mut runs = 0;
        for segment in path.iter() {
            let outcome = self.follower.follow(robot);
            runs += 1;

            if segment.turn == Turn::Finish {
                creep(robot, self.turns.settle);
                break;
            }
            if outcome.end == SegmentEnd::DeadEnd {
                warn!(segment = %segment, "Dead end during replay");
            }

            creep(robot, self.centering.first);
            creep(robot, self.centering.second);
            pivot(robot, segment.turn, &self.turns.conservative);
        }

        self.finish(robot, begin, runs)
    }

    /// 激进回放
    pub fn run_aggressive<R: LineRobot + ?Sized>(
        &self,
        robot: &mut R,
        path: &Path,
        launch: Turn,
    ) -> ExecutionReport {
        let begin = robot.get_ms();
        let runs = merge_runs(path);
        info!(path = %path, runs = runs.len(), "Aggressive replay started");
        pivot(robot, launch, &self.turns.aggressive);

        let mut executed = 0;
        for run in &runs {
            self.follower.follow_aggressive(robot, &self.speed, run.cells, run.ignore);
            executed += 1;

            if run.turn == Turn::Finish {
                creep(robot, self.turns.settle);
                break;
            }
            creep(robot, self.turns.aggressive_creep);
            pivot(robot, run.turn, &self.turns.aggressive);
        }

        self.finish(robot, begin, executed)
    }

    fn finish<R: LineRobot + ?Sized>(&self, robot: &mut R, begin: u32, runs: usize) -> ExecutionReport {
        let reached_finish = robot
            .read_line()
            .center()
            .iter()
            .all(|&v| v > self.centering.finish_threshold);
        robot.stop();

        let report = ExecutionReport {
            runs,
            reached_finish,
            elapsed_ms: robot.get_ms().wrapping_sub(begin),
        };
        if reached_finish {
            info!(runs, elapsed_ms = report.elapsed_ms, "Replay reached finish");
        } else {
            warn!(runs, elapsed_ms = report.elapsed_ms, "Replay ended off the finish");
        }
        report
    }
}
