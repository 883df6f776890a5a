//! # Maze Control
//!
//! 控制层：在 [`LineRobot`](maze_hal::LineRobot) 之上实现探索、求解与回放。
//!
//! - `follower` - PID 线段跟随（含按速度曲线的高速版本）
//! - `turns` - 定时蠕动与原地转向
//! - `explorer` - 路口识别、段长标定、Tremaux 式转向选择
//! - `session` - 各阶段共享的网格与航向
//! - `executor` - 保守/激进两种路径回放
//! - `solver` - Type State 阶段门（`map_maze` → `run_maze_*`）
//!
//! # 阶段
//!
//! ```text
//! Explorer (写网格) ──► CostPropagator (写代价) ──► PathBuilder ──► PathExecutor (只读)
//! ```
//!
//! 大多数调用方只需要 [`MazeSolver`]。

pub mod config;
mod error;
pub mod executor;
pub mod explorer;
pub mod follower;
pub mod session;
pub mod solver;
pub mod turns;

pub use config::{ControlConfig, FinishPolicy};
pub use error::ControlError;
pub use executor::{ExecutionReport, MergedRun, PathExecutor, merge_runs};
pub use explorer::{
    ExitScan, ExplorationReport, Explorer, JunctionRecord, JunctionView, TurnDecision, select_turn,
};
pub use follower::{FollowOutcome, LineTracker, SegmentEnd, SegmentFollower, SpeedProfile, steer};
pub use session::MazeSession;
pub use solver::{MazeSolver, Solved, Unmapped};
