//! 地图层的属性测试
//!
//! 使用 proptest 验证方向代数、窗口平移与代价传播的性质。

use maze_map::{CostPropagator, Direction, Grid, PathBuilder, Position, Turn};
use proptest::prelude::*;

/// 随机走一条折线并在终点处记录 finish；窗口溢出时返回 None
fn random_walk(moves: &[(u8, u8)]) -> Option<Grid> {
    let mut grid = Grid::new();
    for &(dir, len) in moves {
        grid.advance(Direction::from_index(dir), len).ok()?;
    }
    grid.record_finish(grid.here());
    Some(grid)
}

proptest! {
    /// 测试相对转向与绝对方向的互逆
    #[test]
    fn turn_to_then_apply(a in 0u8..4, b in 0u8..4) {
        let from = Direction::from_index(a);
        let to = Direction::from_index(b);
        prop_assert_eq!(from.apply(from.turn_to(to)), to);
    }

    /// 测试左右旋转互逆、翻转两次恒等
    #[test]
    fn rotation_inverses(a in 0u8..4) {
        let d = Direction::from_index(a);
        prop_assert_eq!(d.left().right(), d);
        prop_assert_eq!(d.flip().flip(), d);
        prop_assert_eq!(d.left().left(), d.flip());
    }

    /// 测试窗口平移可逆（内容未被挤出时）
    #[test]
    fn shift_is_invertible(
        k in 1u8..7,
        marks in prop::collection::vec((7i16..10, 7i16..10, 0u8..4), 0..10),
    ) {
        let mut grid = Grid::new();
        for (x, y, dir) in marks {
            grid.add_mark(Position::new(x, y), Direction::from_index(dir));
        }
        let original = grid.clone();

        grid.shift_north(k).unwrap();
        grid.shift_south(k).unwrap();
        prop_assert_eq!(&grid, &original);

        grid.shift_west(k).unwrap();
        grid.shift_east(k).unwrap();
        prop_assert_eq!(&grid, &original);
    }

    /// 测试不剪枝时方向场处处指向代价恰好小 1 的邻格
    #[test]
    fn exhaustive_costs_descend(moves in prop::collection::vec((0u8..4, 1u8..4), 1..6)) {
        let Some(mut grid) = random_walk(&moves) else {
            return Ok(());
        };
        CostPropagator::exhaustive().propagate(&mut grid).unwrap();
        let finish = grid.finish().unwrap();

        let reached: Vec<_> = grid.iter().filter(|(_, c)| c.is_reached()).map(|(p, c)| (p, *c)).collect();
        for (pos, cell) in reached {
            if pos == finish {
                prop_assert_eq!(cell.cost, 0);
                continue;
            }
            let dir = cell.direction_to_finish;
            prop_assert!(grid.edge_marks(pos, dir) > 0);
            let next = grid.cell(pos.neighbor(dir)).unwrap();
            prop_assert_eq!(next.cost + 1, cell.cost);
        }
    }

    /// 测试路径回放从起点到达终点，总跳数等于起点代价
    #[test]
    fn path_replay_reaches_finish(moves in prop::collection::vec((0u8..4, 1u8..4), 1..6)) {
        let Some(mut grid) = random_walk(&moves) else {
            return Ok(());
        };
        let stats = CostPropagator::new().propagate(&mut grid).unwrap();
        let path = PathBuilder::default().build(&grid).unwrap();

        prop_assert!(path.is_complete());
        prop_assert_eq!(path.total_hops(), stats.start_cost as u32);

        let mut pos = grid.start();
        let mut heading = grid.cell(pos).unwrap().direction_to_finish;
        for segment in path.iter() {
            pos = pos.step(heading, segment.hops() as i16);
            if segment.turn != Turn::Finish {
                heading = heading.apply(segment.turn);
            }
        }
        prop_assert_eq!(Some(pos), grid.finish());
    }
}
