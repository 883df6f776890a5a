//! 格点线迷宫

use maze_map::{Direction, Position};
use std::collections::BTreeSet;
use thiserror::Error;

/// 仿真迷宫错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    #[error("Line from {from} to {to} is not axis-aligned")]
    NotAxisAligned { from: Position, to: Position },

    #[error("Line at {at} has zero length")]
    EmptyLine { at: Position },

    #[error("Start {0} is not on any line")]
    StartNotOnLine(Position),

    #[error("Invalid maze size {width}x{height} (width 1..=8, height 1..=7)")]
    InvalidSize { width: u8, height: u8 },
}

/// 格点上的线迷宫
///
/// 每条线由若干单位边组成；边只存一次（从南/西端点出发的北/东向）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimMaze {
    start: Position,
    finish: Option<Position>,
    edges: BTreeSet<(Position, Direction)>,
}

impl SimMaze {
    pub fn new(start: Position) -> Self {
        Self {
            start,
            finish: None,
            edges: BTreeSet::new(),
        }
    }

    pub fn with_finish(mut self, finish: Position) -> Self {
        self.finish = Some(finish);
        self
    }

    pub fn set_finish(&mut self, finish: Option<Position>) {
        self.finish = finish;
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn finish(&self) -> Option<Position> {
        self.finish
    }

    fn key(pos: Position, dir: Direction) -> (Position, Direction) {
        match dir {
            Direction::North | Direction::East => (pos, dir),
            Direction::South | Direction::West => (pos.neighbor(dir), dir.flip()),
        }
    }

    /// 添加一条单位边
    pub fn add_edge(&mut self, pos: Position, dir: Direction) {
        self.edges.insert(Self::key(pos, dir));
    }

    /// 添加一条轴对齐的线段（拆成单位边）
    pub fn add_line(&mut self, from: Position, to: Position) -> Result<(), SimError> {
        let dir = match (to.x - from.x, to.y - from.y) {
            (0, 0) => return Err(SimError::EmptyLine { at: from }),
            (0, dy) if dy > 0 => Direction::North,
            (0, _) => Direction::South,
            (dx, 0) if dx > 0 => Direction::East,
            (_, 0) => Direction::West,
            _ => return Err(SimError::NotAxisAligned { from, to }),
        };
        let mut cursor = from;
        while cursor != to {
            self.add_edge(cursor, dir);
            cursor = cursor.neighbor(dir);
        }
        Ok(())
    }

    /// 链式添加线段，便于在测试中描述迷宫
    pub fn line(mut self, from: impl Into<Position>, to: impl Into<Position>) -> Result<Self, SimError> {
        self.add_line(from.into(), to.into())?;
        Ok(self)
    }

    pub fn connected(&self, pos: Position, dir: Direction) -> bool {
        self.edges.contains(&Self::key(pos, dir))
    }

    /// 节点的出口方向
    pub fn exits(&self, pos: Position) -> impl Iterator<Item = Direction> + '_ {
        Direction::ALL.into_iter().filter(move |&d| self.connected(pos, d))
    }

    pub fn degree(&self, pos: Position) -> usize {
        self.exits(pos).count()
    }

    pub fn has_edges(&self, pos: Position) -> bool {
        self.exits(pos).next().is_some()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// 所有单位边 `(南/西端点, 北/东)`
    pub fn edges(&self) -> impl Iterator<Item = (Position, Direction)> + '_ {
        self.edges.iter().copied()
    }

    /// 所有有边的节点
    pub fn nodes(&self) -> BTreeSet<Position> {
        self.edges
            .iter()
            .flat_map(|&(p, d)| [p, p.neighbor(d)])
            .collect()
    }

    /// 检查迷宫可用于仿真
    pub fn validate(&self) -> Result<(), SimError> {
        if !self.has_edges(self.start) {
            return Err(SimError::StartNotOnLine(self.start));
        }
        Ok(())
    }
}

/// 可序列化的迷宫描述
///
/// ```toml
/// start = [0, 0]
/// finish = [-1, 2]
/// lines = [
///     [0, 0, 0, 2],
///     [0, 2, -1, 2],
/// ]
/// ```
#[cfg(feature = "serde")]
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MazeDescription {
    pub start: [i16; 2],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish: Option<[i16; 2]>,
    /// `[x0, y0, x1, y1]`
    pub lines: Vec<[i16; 4]>,
}

#[cfg(feature = "serde")]
impl TryFrom<&MazeDescription> for SimMaze {
    type Error = SimError;

    fn try_from(desc: &MazeDescription) -> Result<Self, SimError> {
        let mut maze = SimMaze::new(Position::new(desc.start[0], desc.start[1]));
        maze.set_finish(desc.finish.map(|[x, y]| Position::new(x, y)));
        for &[x0, y0, x1, y1] in &desc.lines {
            maze.add_line(Position::new(x0, y0), Position::new(x1, y1))?;
        }
        maze.validate()?;
        Ok(maze)
    }
}

#[cfg(feature = "serde")]
impl From<&SimMaze> for MazeDescription {
    fn from(maze: &SimMaze) -> Self {
        Self {
            start: [maze.start.x, maze.start.y],
            finish: maze.finish.map(|f| [f.x, f.y]),
            lines: maze
                .edges()
                .map(|(p, d)| {
                    let q = p.neighbor(d);
                    [p.x, p.y, q.x, q.y]
                })
                .collect(),
        }
    }
}
