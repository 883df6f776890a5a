//! Maze SDK - 线迷宫机器人 Rust SDK
//!
//! 在未知的无环线迷宫中探索、用洪水填充求最短路径，再以更高速度回放。
//!
//! # 架构设计
//!
//! 从底层到高层：
//!
//! - **地图层** (`map`): 滑动窗口网格、代价传播、路径压缩（无 IO）
//! - **硬件层** (`hal`): `LineRobot` 传感器/电机接口，`mock` feature 提供仿真
//! - **控制层** (`control`): PID 跟随、探索启发式、路径回放、阶段门
//!
//! # 快速开始
//!
//! ```rust
//! use maze_sdk::prelude::*;
//!
//! let maze = SimMaze::new(Position::new(0, 0))
//!     .line((0, 0), (0, 2))
//!     .and_then(|m| m.line((0, 2), (-1, 2)))
//!     .unwrap()
//!     .with_finish(Position::new(-1, 2));
//!
//! let solver = MazeSolver::new(SimRobot::new(maze), ControlConfig::default()).unwrap();
//! let mut solver = solver.map_maze().unwrap();
//! println!("{}", solver.path());
//!
//! solver.robot_mut().reset();
//! assert!(solver.run_maze_aggressive().reached_finish);
//! ```

pub mod logging;
pub mod prelude;

pub use maze_control as control;
pub use maze_hal as hal;
pub use maze_map as map;

// 常用类型
pub use maze_control::{ControlConfig, ControlError, MazeSolver};
pub use maze_hal::{LineReading, LineRobot};
pub use maze_map::{Direction, Grid, MapError, Path, PathSegment, Position, Turn};
