//! 迷宫会话：各阶段共享的状态
//!
//! 写入顺序由阶段保证：探索阶段只有 `Explorer` 写网格；
//! 之后 `solve` 原地写入代价并生成路径；回放阶段只读。

use crate::ControlError;
use maze_map::{CostPropagator, Direction, Grid, Path, PathBuilder, PropagationStats, Turn};
use tracing::info;

/// 探索出发时的航向
pub const START_HEADING: Direction = Direction::North;

/// 迷宫会话
#[derive(Debug, Clone, Default)]
pub struct MazeSession {
    pub(crate) grid: Grid,
    pub(crate) heading: Direction,
    propagation: Option<PropagationStats>,
}

impl MazeSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// 清空网格，航向回到出发方向
    pub fn reset(&mut self) {
        self.grid.clear();
        self.heading = START_HEADING;
        self.propagation = None;
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// 当前逻辑航向
    pub fn heading(&self) -> Direction {
        self.heading
    }

    /// 最近一次 `solve` 的传播统计
    pub fn propagation(&self) -> Option<PropagationStats> {
        self.propagation
    }

    /// 传播代价并构建路径
    ///
    /// 传播会原地改写网格中的代价和朝终点方向。
    pub fn solve(&mut self, capacity: usize) -> Result<Path, ControlError> {
        let stats = CostPropagator::new().propagate(&mut self.grid)?;
        let path = PathBuilder::new(capacity).build(&self.grid)?;
        info!(
            start_cost = stats.start_cost,
            updates = stats.updates,
            pruned = stats.pruned,
            path = %path,
            "Maze solved"
        );
        self.propagation = Some(stats);
        Ok(path)
    }

    /// 回放开始前，从出发航向转到起点朝终点方向所需的转向
    ///
    /// 尚未求解时为 `None`。
    pub fn launch_turn(&self) -> Option<Turn> {
        self.propagation?;
        let start = self.grid.cell(self.grid.start())?;
        Some(START_HEADING.turn_to(start.direction_to_finish))
    }
}
