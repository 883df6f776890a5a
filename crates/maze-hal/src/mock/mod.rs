//! 仿真后端
//!
//! - [`SimMaze`]：格点上的线迷宫（单位长度边 + 起点 + 终点色块）
//! - [`SimRobot`]：在 `SimMaze` 上运行的运动学仿真，实现 `LineRobot`
//! - [`ScriptedRobot`]：逐次回放预设传感器读数，记录电机命令
//! - [`random_tree`]：随机生成无环迷宫

mod generate;
mod maze;
mod scripted;
mod sim;

pub use generate::random_tree;
#[cfg(feature = "serde")]
pub use maze::MazeDescription;
pub use maze::{SimError, SimMaze};
pub use scripted::{MotorCommand, ScriptedRobot};
pub use sim::{CELL_UNITS, SimConfig, SimPose, SimRobot};
