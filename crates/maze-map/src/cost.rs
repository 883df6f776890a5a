//! 代价传播（洪水填充）
//!
//! 从终点以代价 0 出发做深度优先填充：候选代价严格小于单元已存代价时才写入，
//! 同时记录"朝终点方向"，再沿已穿越的边（计数 > 0）以代价 +1 扩展邻格。
//!
//! 严格改进条件既保证结果是已探索边集上的最少跳数，也保证终止（代价只降不升，下界为 0）。
//!
//! # 剪枝
//!
//! 一旦 `代价 + 曼哈顿距离(该格, 起点) >= 起点当前最优代价`，该格之下不再展开。
//! 探索路线本身总是起点代价的一个上界，因此剪枝是安全的。
//!
//! # 实现
//!
//! 使用显式工作栈代替递归，邻格按 N → E → S → W 的固定顺序访问，保证平局时结果确定。

use crate::MapError;
use crate::direction::Direction;
use crate::grid::{Cell, Grid};
use crate::position::Position;
use tracing::{debug, info};

/// 传播统计
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PropagationStats {
    /// 起点的最终代价
    pub start_cost: u16,
    /// 写入代价的次数（含被后续改进覆盖的写入）
    pub updates: usize,
    /// 被剪枝丢弃的工作项
    pub pruned: usize,
}

/// 洪水填充器
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CostPropagator {
    prune: bool,
}

impl Default for CostPropagator {
    fn default() -> Self {
        Self::new()
    }
}

impl CostPropagator {
    /// 启用曼哈顿剪枝
    pub fn new() -> Self {
        Self { prune: true }
    }

    /// 不剪枝：填满所有可达单元
    pub fn exhaustive() -> Self {
        Self { prune: false }
    }

    pub fn is_pruning(&self) -> bool {
        self.prune
    }

    /// 在网格上原地传播代价与方向
    ///
    /// # 错误
    ///
    /// - `FinishNotRecorded`: 网格没有终点
    /// - `Unreachable`: 已探索的边集不连通起点与终点
    pub fn propagate(&self, grid: &mut Grid) -> Result<PropagationStats, MapError> {
        let finish = grid.finish().ok_or(MapError::FinishNotRecorded)?;
        let start = grid.start();

        grid.reset_costs();

        let mut stats = PropagationStats::default();
        let mut best = Cell::UNREACHED;
        // (位置, 候选代价, 朝终点方向)
        let mut stack: Vec<(Position, u16, Direction)> = vec![(finish, 0, Direction::North)];

        while let Some((pos, cost, toward_finish)) = stack.pop() {
            if self.prune
                && best != Cell::UNREACHED
                && cost.saturating_add(pos.manhattan(start)) >= best
            {
                stats.pruned += 1;
                continue;
            }

            let Some(cell) = grid.cell_mut(pos) else {
                continue;
            };
            if cost >= cell.cost {
                continue;
            }
            cell.cost = cost;
            cell.direction_to_finish = toward_finish;
            stats.updates += 1;

            if pos == start {
                best = cost;
            }

            // 逆序入栈，使出栈顺序为 N → E → S → W
            for dir in Direction::ALL.into_iter().rev() {
                if grid.edge_marks(pos, dir) == 0 {
                    continue;
                }
                let next = pos.neighbor(dir);
                if grid.contains(next) {
                    stack.push((next, cost + 1, dir.flip()));
                }
            }
        }

        if best == Cell::UNREACHED {
            debug!(updates = stats.updates, "Flood fill never reached start");
            return Err(MapError::Unreachable);
        }

        stats.start_cost = best;
        info!(
            start_cost = best,
            updates = stats.updates,
            pruned = stats.pruned,
            "Cost propagation complete"
        );
        Ok(stats)
    }
}
