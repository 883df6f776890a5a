//! Type State 阶段门 - 编译期保证"先探索、后回放"
//!
//! ```text
//! MazeSolver<R, Unmapped> ──map_maze()──► MazeSolver<R, Solved>
//!                                              │
//!                                              ├── run_maze_conservative()
//!                                              └── run_maze_aggressive()
//! ```
//!
//! 未求解的迷宫无法回放；回放阶段只读网格与路径。

use crate::ControlError;
use crate::config::ControlConfig;
use crate::executor::{ExecutionReport, PathExecutor};
use crate::explorer::{ExplorationReport, Explorer};
use crate::session::MazeSession;
use maze_hal::LineRobot;
use maze_map::{Grid, Path, Turn};
use tracing::info;

/// 未探索状态
pub struct Unmapped;

/// 已求解状态
pub struct Solved {
    path: Path,
    launch: Turn,
    report: ExplorationReport,
}

/// 迷宫求解器
pub struct MazeSolver<R, State = Unmapped> {
    robot: R,
    config: ControlConfig,
    session: MazeSession,
    state: State,
}

impl<R: LineRobot> MazeSolver<R, Unmapped> {
    /// 创建求解器（校验配置）
    pub fn new(robot: R, config: ControlConfig) -> Result<Self, ControlError> {
        config.validate()?;
        Ok(Self {
            robot,
            config,
            session: MazeSession::new(),
            state: Unmapped,
        })
    }

    /// 探索并求解
    ///
    /// 阻塞直到路径确定。机器人应位于起点。
    pub fn map_maze(mut self) -> Result<MazeSolver<R, Solved>, ControlError> {
        let report = Explorer::new(&self.config).explore(&mut self.robot, &mut self.session)?;
        let path = self.session.solve(self.config.path_capacity)?;
        let launch = self.session.launch_turn().unwrap_or(Turn::Straight);
        info!(segments = path.len(), launch = %launch, "Maze mapped");

        Ok(MazeSolver {
            robot: self.robot,
            config: self.config,
            session: self.session,
            state: Solved {
                path,
                launch,
                report,
            },
        })
    }
}

impl<R: LineRobot> MazeSolver<R, Solved> {
    /// 保守回放（机器人应已放回起点、朝出发方向）
    pub fn run_maze_conservative(&mut self) -> ExecutionReport {
        PathExecutor::new(&self.config).run_conservative(
            &mut self.robot,
            &self.state.path,
            self.state.launch,
        )
    }

    /// 激进回放
    pub fn run_maze_aggressive(&mut self) -> ExecutionReport {
        PathExecutor::new(&self.config).run_aggressive(
            &mut self.robot,
            &self.state.path,
            self.state.launch,
        )
    }

    pub fn path(&self) -> &Path {
        &self.state.path
    }

    pub fn exploration_report(&self) -> &ExplorationReport {
        &self.state.report
    }
}

impl<R, State> MazeSolver<R, State> {
    pub fn config(&self) -> &ControlConfig {
        &self.config
    }

    pub fn session(&self) -> &MazeSession {
        &self.session
    }

    pub fn grid(&self) -> &Grid {
        self.session.grid()
    }

    pub fn robot(&self) -> &R {
        &self.robot
    }

    /// 例如在两次回放之间把机器人放回起点
    pub fn robot_mut(&mut self) -> &mut R {
        &mut self.robot
    }

    pub fn into_robot(self) -> R {
        self.robot
    }
}
