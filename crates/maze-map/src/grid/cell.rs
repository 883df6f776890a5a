//! 单元格与方向标记

use crate::direction::Direction;
use std::ops::Index;

/// 边计数饱和上限（2 bit 计数器）
pub const MAX_MARKS: u8 = 3;

/// 网格单元
///
/// 每条边只存一次：存放在它连接的两格中靠南/靠西的那一格上。
/// 因此一个单元只持有"北边"和"东边"两条边的信息。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// 到终点的跳数（`UNREACHED` 表示未到达）
    pub cost: u16,
    /// 北边被穿越的次数（饱和于 3）
    pub north_marks: u8,
    /// 东边被穿越的次数（饱和于 3）
    pub east_marks: u8,
    /// 传感器曾在此报告北向出口
    pub north_exit: bool,
    /// 传感器曾在此报告东向出口
    pub east_exit: bool,
    /// 朝终点前进的方向
    pub direction_to_finish: Direction,
}

impl Cell {
    /// 未到达哨兵值
    pub const UNREACHED: u16 = u16::MAX;

    /// 空单元（清空和窗口平移腾出的位置都使用它）
    pub const EMPTY: Cell = Cell {
        cost: Cell::UNREACHED,
        north_marks: 0,
        east_marks: 0,
        north_exit: false,
        east_exit: false,
        direction_to_finish: Direction::North,
    };

    pub fn is_reached(&self) -> bool {
        self.cost != Cell::UNREACHED
    }

    /// 是否记录过任何边信息
    pub fn is_empty(&self) -> bool {
        self.north_marks == 0 && self.east_marks == 0 && !self.north_exit && !self.east_exit
    }
}

impl Default for Cell {
    fn default() -> Self {
        Cell::EMPTY
    }
}

/// 某个位置四个方向上的边标记数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DirMarks(pub [u8; 4]);

impl DirMarks {
    pub fn get(&self, dir: Direction) -> u8 {
        self.0[dir.index()]
    }
}

impl Index<Direction> for DirMarks {
    type Output = u8;

    fn index(&self, dir: Direction) -> &u8 {
        &self.0[dir.index()]
    }
}
