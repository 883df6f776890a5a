//! Prelude - 常用类型的便捷导入
//!
//! ```rust
//! use maze_sdk::prelude::*;
//! ```

// 阶段门与配置
pub use maze_control::{
    ControlConfig, ExecutionReport, ExplorationReport, FinishPolicy, MazeSession, MazeSolver,
};

// 硬件接口
pub use maze_hal::{LineReading, LineRobot};

// 地图类型
pub use maze_map::{Direction, Grid, Path, PathSegment, Position, Turn};

// 仿真
#[cfg(feature = "mock")]
pub use maze_hal::mock::{SimConfig, SimMaze, SimRobot, random_tree};

// 错误类型
pub use maze_control::ControlError;
pub use maze_map::MapError;
