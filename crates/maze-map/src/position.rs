//! 网格坐标

use crate::direction::Direction;
use std::fmt;
use std::ops::{Add, Sub};

/// 有符号网格坐标 `(x, y)`
///
/// 既用于窗口坐标（存储索引），也用于逻辑坐标（机器人出发点为原点）。
/// 有符号是必须的：前进一段后、窗口平移前，坐标可能暂时越界。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: i16,
    pub y: i16,
}

impl Position {
    pub const fn new(x: i16, y: i16) -> Self {
        Self { x, y }
    }

    /// 沿 `dir` 前进 `distance` 格
    pub fn step(self, dir: Direction, distance: i16) -> Self {
        let (dx, dy) = dir.offset();
        Self {
            x: self.x + dx * distance,
            y: self.y + dy * distance,
        }
    }

    /// 相邻格
    pub fn neighbor(self, dir: Direction) -> Self {
        self.step(dir, 1)
    }

    /// 曼哈顿距离
    pub fn manhattan(self, other: Position) -> u16 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

impl Add for Position {
    type Output = Position;

    fn add(self, rhs: Position) -> Position {
        Position::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Position {
    type Output = Position;

    fn sub(self, rhs: Position) -> Position {
        Position::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl From<(i16, i16)> for Position {
    fn from((x, y): (i16, i16)) -> Self {
        Position::new(x, y)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
