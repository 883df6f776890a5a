//! 滑动窗口网格
//!
//! 固定 N×N 存储，作为无界逻辑坐标空间上的一个窗口。机器人从窗口中心出发；
//! 探索过程中通过窗口平移（见 `window` 模块）保证当前位置、起点和终点始终在窗口内。
//!
//! # 坐标
//!
//! ```text
//!        +y (North)
//!  -x (West)   +x (East)
//!        -y (South)
//! ```
//!
//! `anchor` 是逻辑原点（出发格）当前所在的窗口坐标，平移时随之移动。

mod cell;
mod window;

pub use cell::{Cell, DirMarks, MAX_MARKS};

use crate::direction::Direction;
use crate::position::Position;
use std::fmt;

/// 窗口边长
pub const GRID_SIZE: usize = 16;

const SIZE: i16 = GRID_SIZE as i16;

/// 边存储轴：边记录在哪个单元的哪个字段上
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    North,
    East,
}

/// 迷宫网格
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    /// 存储，按 `[x][y]` 索引
    cells: [[Cell; GRID_SIZE]; GRID_SIZE],
    start: Position,
    here: Position,
    finish: Option<Position>,
    anchor: Position,
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

impl Grid {
    /// 创建已清空的网格，起点位于窗口中心
    pub fn new() -> Self {
        let center = Self::center();
        Self {
            cells: [[Cell::EMPTY; GRID_SIZE]; GRID_SIZE],
            start: center,
            here: center,
            finish: None,
            anchor: center,
        }
    }

    /// 窗口中心
    pub const fn center() -> Position {
        Position::new(SIZE / 2, SIZE / 2)
    }

    /// 清空全部单元，位置回到中心
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// 位置是否在存储窗口内
    pub fn contains(&self, pos: Position) -> bool {
        (0..SIZE).contains(&pos.x) && (0..SIZE).contains(&pos.y)
    }

    pub fn cell(&self, pos: Position) -> Option<&Cell> {
        if self.contains(pos) {
            Some(&self.cells[pos.x as usize][pos.y as usize])
        } else {
            None
        }
    }

    pub fn cell_mut(&mut self, pos: Position) -> Option<&mut Cell> {
        if self.contains(pos) {
            Some(&mut self.cells[pos.x as usize][pos.y as usize])
        } else {
            None
        }
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn here(&self) -> Position {
        self.here
    }

    pub fn finish(&self) -> Option<Position> {
        self.finish
    }

    /// 逻辑原点当前的窗口坐标
    pub fn anchor(&self) -> Position {
        self.anchor
    }

    /// 窗口坐标 → 逻辑坐标（出发格为原点）
    pub fn to_logical(&self, pos: Position) -> Position {
        pos - self.anchor
    }

    /// 逻辑坐标 → 窗口坐标
    pub fn to_window(&self, logical: Position) -> Position {
        logical + self.anchor
    }

    /// 记录终点（只在第一次调用时生效）
    ///
    /// 返回是否为首次记录。
    pub fn record_finish(&mut self, pos: Position) -> bool {
        if self.finish.is_some() {
            return false;
        }
        self.finish = Some(pos);
        true
    }

    /// 边 `(pos, dir)` 的存储位置
    fn edge_owner(pos: Position, dir: Direction) -> (Position, Axis) {
        match dir {
            Direction::North => (pos, Axis::North),
            Direction::East => (pos, Axis::East),
            Direction::South => (pos.neighbor(Direction::South), Axis::North),
            Direction::West => (pos.neighbor(Direction::West), Axis::East),
        }
    }

    /// 从 `pos` 出发沿 `dir` 的边已被穿越的次数（窗口外视为 0）
    pub fn edge_marks(&self, pos: Position, dir: Direction) -> u8 {
        let (owner, axis) = Self::edge_owner(pos, dir);
        match (self.cell(owner), axis) {
            (Some(cell), Axis::North) => cell.north_marks,
            (Some(cell), Axis::East) => cell.east_marks,
            (None, _) => 0,
        }
    }

    /// 穿越计数 +1（饱和于 `MAX_MARKS`），返回新值
    pub fn add_mark(&mut self, pos: Position, dir: Direction) -> u8 {
        let (owner, axis) = Self::edge_owner(pos, dir);
        let Some(cell) = self.cell_mut(owner) else {
            return 0;
        };
        let marks = match axis {
            Axis::North => &mut cell.north_marks,
            Axis::East => &mut cell.east_marks,
        };
        *marks = (*marks + 1).min(MAX_MARKS);
        *marks
    }

    /// 传感器是否在此报告过 `dir` 方向的出口
    pub fn has_exit(&self, pos: Position, dir: Direction) -> bool {
        let (owner, axis) = Self::edge_owner(pos, dir);
        match (self.cell(owner), axis) {
            (Some(cell), Axis::North) => cell.north_exit,
            (Some(cell), Axis::East) => cell.east_exit,
            (None, _) => false,
        }
    }

    /// 记录出口
    pub fn open_exit(&mut self, pos: Position, dir: Direction) {
        let (owner, axis) = Self::edge_owner(pos, dir);
        if let Some(cell) = self.cell_mut(owner) {
            match axis {
                Axis::North => cell.north_exit = true,
                Axis::East => cell.east_exit = true,
            }
        }
    }

    /// 批量记录出口
    pub fn record_exits(&mut self, pos: Position, exits: impl IntoIterator<Item = Direction>) {
        for dir in exits {
            self.open_exit(pos, dir);
        }
    }

    /// 边是否已知（报告过出口或被穿越过）
    pub fn knows_edge(&self, pos: Position, dir: Direction) -> bool {
        self.edge_marks(pos, dir) > 0 || self.has_exit(pos, dir)
    }

    /// 除 `except` 外是否还有任何已知边
    ///
    /// 用于判断路口是否曾经到访过。
    pub fn junction_known(&self, pos: Position, except: Direction) -> bool {
        Direction::ALL
            .into_iter()
            .filter(|&d| d != except)
            .any(|d| self.knows_edge(pos, d))
    }

    /// 沿 `heading` 直行穿过 `pos` 时，两侧是否有已知分支
    pub fn has_side_branch(&self, pos: Position, heading: Direction) -> bool {
        self.knows_edge(pos, heading.left()) || self.knows_edge(pos, heading.right())
    }

    /// 四个方向的穿越计数
    pub fn dir_marks(&self, pos: Position) -> DirMarks {
        DirMarks(Direction::ALL.map(|d| self.edge_marks(pos, d)))
    }

    /// 把所有代价重置为未到达
    pub fn reset_costs(&mut self) {
        for column in self.cells.iter_mut() {
            for cell in column.iter_mut() {
                cell.cost = Cell::UNREACHED;
            }
        }
    }

    /// 遍历所有单元 `(窗口坐标, 单元)`
    pub fn iter(&self) -> impl Iterator<Item = (Position, &Cell)> {
        self.cells.iter().enumerate().flat_map(|(x, column)| {
            column
                .iter()
                .enumerate()
                .map(move |(y, cell)| (Position::new(x as i16, y as i16), cell))
        })
    }

    pub(crate) fn set_here(&mut self, pos: Position) {
        self.here = pos;
    }
}

impl fmt::Display for Grid {
    /// ASCII 渲染：`-`/`|` 为走过的边，`~`/`:` 为仅报告过的出口
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in (0..SIZE).rev() {
            let mut row = String::with_capacity(GRID_SIZE * 2);
            let mut below = String::with_capacity(GRID_SIZE * 2);
            for x in 0..SIZE {
                let pos = Position::new(x, y);
                let glyph = if Some(pos) == self.finish {
                    'F'
                } else if pos == self.start {
                    'S'
                } else if pos == self.here {
                    '@'
                } else if Direction::ALL.iter().any(|&d| self.knows_edge(pos, d)) {
                    'o'
                } else {
                    '.'
                };
                row.push(glyph);
                row.push(if self.edge_marks(pos, Direction::East) > 0 {
                    '-'
                } else if self.has_exit(pos, Direction::East) {
                    '~'
                } else {
                    ' '
                });
                below.push(if self.edge_marks(pos, Direction::South) > 0 {
                    '|'
                } else if self.has_exit(pos, Direction::South) {
                    ':'
                } else {
                    ' '
                });
                below.push(' ');
            }
            writeln!(f, "{}", row.trim_end())?;
            if y > 0 {
                writeln!(f, "{}", below.trim_end())?;
            }
        }
        Ok(())
    }
}
