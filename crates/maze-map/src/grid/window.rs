//! 窗口平移与段落记录
//!
//! 平移是保持"当前/起点/终点都在窗口内"这一不变量的唯一手段。
//! 平移时存储整体移动 `amount` 格，腾出的单元清空，三个位置同步平移。

use super::{Cell, GRID_SIZE, Grid, SIZE};
use crate::MapError;
use crate::direction::Direction;
use crate::position::Position;
use tracing::debug;

impl Grid {
    /// 内容向北（+y）平移
    pub fn shift_north(&mut self, amount: u8) -> Result<(), MapError> {
        self.translate(0, amount as i16)
    }

    /// 内容向南（-y）平移
    pub fn shift_south(&mut self, amount: u8) -> Result<(), MapError> {
        self.translate(0, -(amount as i16))
    }

    /// 内容向东（+x）平移
    pub fn shift_east(&mut self, amount: u8) -> Result<(), MapError> {
        self.translate(amount as i16, 0)
    }

    /// 内容向西（-x）平移
    pub fn shift_west(&mut self, amount: u8) -> Result<(), MapError> {
        self.translate(-(amount as i16), 0)
    }

    fn translate(&mut self, dx: i16, dy: i16) -> Result<(), MapError> {
        if dx == 0 && dy == 0 {
            return Ok(());
        }
        let delta = Position::new(dx, dy);

        // 先检查，再修改：失败时网格保持原样
        let mut tracked = vec![("start", self.start), ("current", self.here)];
        if let Some(finish) = self.finish {
            tracked.push(("finish", finish));
        }
        for (what, pos) in tracked {
            let moved = pos + delta;
            if !self.contains(moved) {
                return Err(MapError::WindowOverflow {
                    what,
                    x: moved.x,
                    y: moved.y,
                    size: GRID_SIZE,
                });
            }
        }

        let old = self.cells;
        for x in 0..SIZE {
            for y in 0..SIZE {
                let source = Position::new(x - dx, y - dy);
                self.cells[x as usize][y as usize] = if self.contains(source) {
                    old[source.x as usize][source.y as usize]
                } else {
                    Cell::EMPTY
                };
            }
        }

        self.start = self.start + delta;
        self.here = self.here + delta;
        self.finish = self.finish.map(|f| f + delta);
        self.anchor = self.anchor + delta;

        debug!(dx, dy, anchor = %self.anchor, "Grid window shifted");
        Ok(())
    }

    /// 记录一段沿 `heading` 长 `length` 格的直线行驶
    ///
    /// 1. 计算新位置；越过窗口边界时先平移，恰好把新位置带到边界索引
    ///    （当前位置保持在 `[1, N-1]`，保证南/西邻格可寻址）
    /// 2. 对途经的每条单位边计数 +1（不仅是两端）
    ///
    /// 返回新的当前位置（窗口坐标）。
    pub fn advance(&mut self, heading: Direction, length: u8) -> Result<Position, MapError> {
        let target = self.here.step(heading, length as i16);

        match heading {
            Direction::North if target.y > SIZE - 1 => {
                self.translate(0, (SIZE - 1) - target.y)?;
            },
            Direction::South if target.y < 1 => {
                self.translate(0, 1 - target.y)?;
            },
            Direction::East if target.x > SIZE - 1 => {
                self.translate((SIZE - 1) - target.x, 0)?;
            },
            Direction::West if target.x < 1 => {
                self.translate(1 - target.x, 0)?;
            },
            _ => {},
        }

        let mut cursor = self.here;
        for _ in 0..length {
            self.add_mark(cursor, heading);
            cursor = cursor.neighbor(heading);
        }
        self.set_here(cursor);
        Ok(cursor)
    }
}
