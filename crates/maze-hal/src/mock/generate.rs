//! 随机无环迷宫生成
//!
//! 在 `width × height` 的格点区域上用随机深度优先生成一棵生成树，
//! 起点是区域下方的一个叶子（机器人朝北出发），终点随机取自其余叶子。

use super::maze::{SimError, SimMaze};
use maze_map::{Direction, Position};
use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::BTreeSet;
use tracing::debug;

/// 生成随机树形迷宫
///
/// 起点固定在逻辑原点 `(0, 0)`；区域横向位置随机，使入口落在区域底边的某一列。
pub fn random_tree<R: Rng>(rng: &mut R, width: u8, height: u8) -> Result<SimMaze, SimError> {
    if !(1..=8).contains(&width) || !(1..=7).contains(&height) {
        return Err(SimError::InvalidSize { width, height });
    }
    let (w, h) = (width as i16, height as i16);
    let entry_column = rng.gen_range(0..w);
    let inside = |p: Position| {
        (-entry_column..w - entry_column).contains(&p.x) && (1..=h).contains(&p.y)
    };

    let start = Position::new(0, 0);
    let entry = Position::new(0, 1);
    let mut maze = SimMaze::new(start);
    maze.add_edge(start, Direction::North);

    let mut visited = BTreeSet::from([entry]);
    let mut stack = vec![entry];
    while let Some(&here) = stack.last() {
        let mut options: Vec<Direction> = Direction::ALL
            .into_iter()
            .filter(|&d| {
                let next = here.neighbor(d);
                inside(next) && !visited.contains(&next)
            })
            .collect();
        options.shuffle(rng);
        match options.first() {
            Some(&dir) => {
                let next = here.neighbor(dir);
                maze.add_edge(here, dir);
                visited.insert(next);
                stack.push(next);
            },
            None => {
                stack.pop();
            },
        }
    }

    let leaves: Vec<Position> = maze
        .nodes()
        .into_iter()
        .filter(|&p| p != start && maze.degree(p) == 1)
        .collect();
    // 区域只有入口一个节点时，入口就是叶子，因此 leaves 不会为空
    let finish = leaves.choose(rng).copied().unwrap_or(entry);
    maze.set_finish(Some(finish));

    debug!(
        width,
        height,
        edges = maze.edge_count(),
        leaves = leaves.len(),
        finish = %finish,
        "Generated random tree maze"
    );
    Ok(maze)
}
