//! # Maze Map
//!
//! 线迷宫地图层：无 IO、纯数据结构与算法。
//!
//! ## 包含模块
//!
//! - `direction` - 循环方向枚举与相对转向
//! - `position` - 逻辑坐标
//! - `grid` - 滑动窗口网格存储（标记、出口、窗口平移）
//! - `cost` - 洪水填充代价传播
//! - `path` - 路径段、压缩路径与路径构建
//!
//! ## 数据生命周期
//!
//! ```text
//! Grid::clear ──► Explorer 写入 ──► CostPropagator 原地写入 ──► PathBuilder 只读 ──► Path
//! ```

pub mod cost;
pub mod direction;
pub mod grid;
pub mod path;
pub mod position;

use thiserror::Error;

pub use cost::{CostPropagator, PropagationStats};
pub use direction::{Direction, Turn};
pub use grid::{Cell, DirMarks, GRID_SIZE, Grid, MAX_MARKS};
pub use path::{DEFAULT_PATH_CAPACITY, Path, PathBuilder, PathSegment};
pub use position::Position;

/// 地图层错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    /// 窗口平移会把起点/终点/当前位置移出存储窗口
    #[error("Window overflow: {what} at ({x}, {y}) would leave the {size}x{size} window")]
    WindowOverflow {
        what: &'static str,
        x: i16,
        y: i16,
        size: usize,
    },

    /// 路径段数量超过固定容量
    #[error("Path capacity exceeded (capacity: {capacity})")]
    PathCapacityExceeded { capacity: usize },

    /// 尚未记录终点
    #[error("Finish position has not been recorded")]
    FinishNotRecorded,

    /// 代价传播未能到达起点
    #[error("Start is unreachable from finish over the explored edges")]
    Unreachable,

    /// 方向场未能在有限步内到达终点
    #[error("Direction field does not lead to finish (gave up after {steps} steps)")]
    PathCorrupt { steps: usize },
}
