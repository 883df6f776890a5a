//! 方向与转向
//!
//! `Direction` 是四值循环枚举，`Turn` 是相对当前航向的动作。

use num_enum::{IntoPrimitive, TryFromPrimitive};
use std::fmt;

/// 绝对方向（网格坐标系：+y 为北，+x 为东）
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, TryFromPrimitive, IntoPrimitive,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[repr(u8)]
pub enum Direction {
    North = 0,
    East = 1,
    South = 2,
    West = 3,
}

// 不使用 `#[default]`：num_enum 会把它当作 TryFromPrimitive 的兜底变体
impl Default for Direction {
    fn default() -> Self {
        Direction::North
    }
}

impl Direction {
    /// 固定遍历顺序 N → E → S → W
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// 按模 4 从索引构造
    pub fn from_index(index: u8) -> Self {
        match index % 4 {
            0 => Direction::North,
            1 => Direction::East,
            2 => Direction::South,
            _ => Direction::West,
        }
    }

    pub fn index(self) -> usize {
        u8::from(self) as usize
    }

    /// 旋转 180°
    pub fn flip(self) -> Self {
        Self::from_index(u8::from(self) + 2)
    }

    /// 逆时针旋转 90°
    pub fn left(self) -> Self {
        Self::from_index(u8::from(self) + 3)
    }

    /// 顺时针旋转 90°
    pub fn right(self) -> Self {
        Self::from_index(u8::from(self) + 1)
    }

    /// 单位步进偏移 `(dx, dy)`
    pub fn offset(self) -> (i16, i16) {
        match self {
            Direction::North => (0, 1),
            Direction::East => (1, 0),
            Direction::South => (0, -1),
            Direction::West => (-1, 0),
        }
    }

    /// 应用相对转向，得到新的航向
    ///
    /// `Straight` 与 `Finish` 不改变航向。
    pub fn apply(self, turn: Turn) -> Self {
        match turn {
            Turn::Left => self.left(),
            Turn::Right => self.right(),
            Turn::Back => self.flip(),
            Turn::Straight | Turn::Finish => self,
        }
    }

    /// 从当前航向转到 `target` 需要的相对转向
    pub fn turn_to(self, target: Direction) -> Turn {
        match (u8::from(target) + 4 - u8::from(self)) % 4 {
            0 => Turn::Straight,
            1 => Turn::Right,
            2 => Turn::Back,
            _ => Turn::Left,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            Direction::North => 'N',
            Direction::East => 'E',
            Direction::South => 'S',
            Direction::West => 'W',
        };
        write!(f, "{}", c)
    }
}

/// 相对转向动作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Turn {
    Left,
    Right,
    Straight,
    Back,
    /// 路径结束标记（到达终点）
    Finish,
}

impl Turn {
    /// 单字符表示（L/R/S/B/F）
    pub fn as_char(self) -> char {
        match self {
            Turn::Left => 'L',
            Turn::Right => 'R',
            Turn::Straight => 'S',
            Turn::Back => 'B',
            Turn::Finish => 'F',
        }
    }
}

impl fmt::Display for Turn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}
