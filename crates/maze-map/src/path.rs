//! 压缩路径
//!
//! `PathBuilder` 沿网格方向场从起点走到终点，只在以下位置产生路径段：
//!
//! - 行进方向改变（左/右转）
//! - 直行穿过有侧向分支的单元：这是一个真实路口，高速回放时需要显式的 "直行" 动作
//!
//! 每个段的 `distance` 是转向前直线行驶覆盖的格数（首尾都计入，即跳数 + 1）。
//! 序列总是以 `Finish` 段结束。

use crate::MapError;
use crate::direction::Turn;
use crate::grid::{GRID_SIZE, Grid};
use smallvec::SmallVec;
use std::fmt;
use tracing::debug;

/// 默认路径容量
pub const DEFAULT_PATH_CAPACITY: usize = 64;

/// 路径段：先直行 `distance` 格，再执行 `turn`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathSegment {
    pub turn: Turn,
    /// 直线覆盖的格数（含两端）
    pub distance: u8,
}

impl PathSegment {
    pub const fn new(turn: Turn, distance: u8) -> Self {
        Self { turn, distance }
    }

    /// 直线段包含的单位边数
    pub fn hops(&self) -> u8 {
        self.distance.saturating_sub(1)
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.turn, self.distance)
    }
}

/// 有界路径
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    segments: SmallVec<[PathSegment; 16]>,
    capacity: usize,
}

impl Default for Path {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_PATH_CAPACITY)
    }
}

impl Path {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            segments: SmallVec::new(),
            capacity,
        }
    }

    /// 追加路径段；超出容量时返回错误而不是越界写入
    pub fn push(&mut self, segment: PathSegment) -> Result<(), MapError> {
        if self.segments.len() >= self.capacity {
            return Err(MapError::PathCapacityExceeded {
                capacity: self.capacity,
            });
        }
        self.segments.push(segment);
        Ok(())
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn iter(&self) -> impl Iterator<Item = &PathSegment> {
        self.segments.iter()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// 是否以 `Finish` 段结束
    pub fn is_complete(&self) -> bool {
        self.segments.last().is_some_and(|s| s.turn == Turn::Finish)
    }

    /// 总跳数
    pub fn total_hops(&self) -> u32 {
        self.segments.iter().map(|s| s.hops() as u32).sum()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for segment in &self.segments {
            if !first {
                write!(f, " ")?;
            }
            write!(f, "{}", segment)?;
            first = false;
        }
        Ok(())
    }
}

/// 路径构建器
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathBuilder {
    capacity: usize,
}

impl Default for PathBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_PATH_CAPACITY)
    }
}

impl PathBuilder {
    pub fn new(capacity: usize) -> Self {
        Self { capacity }
    }

    /// 沿方向场从起点走到终点，生成压缩路径
    ///
    /// 前置条件：网格已经过 `CostPropagator::propagate`。
    pub fn build(&self, grid: &Grid) -> Result<Path, MapError> {
        let finish = grid.finish().ok_or(MapError::FinishNotRecorded)?;
        let start = grid.start();
        let max_steps = GRID_SIZE * GRID_SIZE;

        let start_cell = grid.cell(start).ok_or(MapError::Unreachable)?;
        if !start_cell.is_reached() {
            return Err(MapError::Unreachable);
        }

        let mut path = Path::with_capacity(self.capacity);
        let mut pos = start;
        let mut heading = start_cell.direction_to_finish;
        let mut run: u8 = 1;
        let mut steps = 0;

        while pos != finish {
            if steps >= max_steps {
                return Err(MapError::PathCorrupt { steps });
            }
            let cell = grid.cell(pos).ok_or(MapError::PathCorrupt { steps })?;
            let dir = cell.direction_to_finish;

            if pos != start {
                if dir != heading {
                    path.push(PathSegment::new(heading.turn_to(dir), run))?;
                    run = 1;
                    heading = dir;
                } else if grid.has_side_branch(pos, heading) {
                    path.push(PathSegment::new(Turn::Straight, run))?;
                    run = 1;
                }
            }

            pos = pos.neighbor(dir);
            run = run.saturating_add(1);
            steps += 1;
        }

        path.push(PathSegment::new(Turn::Finish, run))?;
        debug!(path = %path, segments = path.len(), "Path built");
        Ok(path)
    }
}
