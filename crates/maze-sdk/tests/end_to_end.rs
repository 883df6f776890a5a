//! 端到端场景：SimRobot 上的完整探索 → 求解 → 回放

use maze_sdk::control::explorer::{ExitScan, JunctionView, TurnDecision, select_turn};
use maze_sdk::hal::mock::MazeDescription;
use maze_sdk::map::DirMarks;
use maze_sdk::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::{BTreeMap, VecDeque};

/// 起点北行 2 格到路口；路口西 1 格为终点，北 1 格为死路
fn junction_maze() -> SimMaze {
    SimMaze::new(Position::new(0, 0))
        .line((0, 0), (0, 2))
        .and_then(|m| m.line((0, 2), (-1, 2)))
        .and_then(|m| m.line((0, 2), (0, 3)))
        .unwrap()
        .with_finish(Position::new(-1, 2))
}

/// 仿真迷宫上起点到终点的最少跳数
fn bfs_hops(maze: &SimMaze) -> u32 {
    let finish = maze.finish().unwrap();
    let mut dist = BTreeMap::from([(maze.start(), 0u32)]);
    let mut queue = VecDeque::from([maze.start()]);
    while let Some(p) = queue.pop_front() {
        let d = dist[&p];
        if p == finish {
            return d;
        }
        for dir in maze.exits(p) {
            let next = p.neighbor(dir);
            if !dist.contains_key(&next) {
                dist.insert(next, d + 1);
                queue.push_back(next);
            }
        }
    }
    panic!("finish unreachable in fixture");
}

fn cost_at(grid: &Grid, logical: Position) -> u16 {
    grid.cell(grid.to_window(logical)).unwrap().cost
}

#[test]
fn test_junction_maze_costs_and_path() {
    let solver = MazeSolver::new(SimRobot::new(junction_maze()), ControlConfig::default()).unwrap();
    let solver = solver.map_maze().unwrap();

    let grid = solver.grid();
    assert_eq!(cost_at(grid, Position::new(-1, 2)), 0);
    assert_eq!(cost_at(grid, Position::new(0, 2)), 1);
    assert_eq!(cost_at(grid, Position::new(0, 0)), 3);

    assert_eq!(
        solver.path().segments(),
        &[PathSegment::new(Turn::Left, 3), PathSegment::new(Turn::Finish, 2)]
    );
    assert_eq!(solver.path().to_string(), "L3 F2");
}

#[test]
fn test_replay_both_modes() {
    let solver = MazeSolver::new(SimRobot::new(junction_maze()), ControlConfig::default()).unwrap();
    let mut solver = solver.map_maze().unwrap();

    solver.robot_mut().reset();
    let slow = solver.run_maze_conservative();
    assert!(slow.reached_finish);
    assert_eq!(slow.runs, 2);

    solver.robot_mut().reset();
    let fast = solver.run_maze_aggressive();
    assert!(fast.reached_finish);
    assert!(fast.elapsed_ms < slow.elapsed_ms);
    assert!(!solver.robot().is_derailed());
}

#[test]
fn test_first_finish_policy() {
    let mut config = ControlConfig::default();
    config.exploration.finish_policy = FinishPolicy::FirstFinish;
    let solver = MazeSolver::new(SimRobot::new(junction_maze()), config).unwrap();
    let solver = solver.map_maze().unwrap();

    let report = solver.exploration_report();
    assert!(!report.closed);
    assert_eq!(report.segments, 2);
    assert_eq!(solver.path().to_string(), "L3 F2");

    // 北侧死路没有走过，只记录了出口
    let grid = solver.grid();
    let junction = grid.to_window(Position::new(0, 2));
    assert_eq!(grid.edge_marks(junction, Direction::North), 0);
    assert!(grid.has_exit(junction, Direction::North));
}

#[test]
fn test_straight_through_side_branch() {
    // 起点北行 3 格到终点；第 1 格处向东有一条死路
    let maze = SimMaze::new(Position::new(0, 0))
        .line((0, 0), (0, 3))
        .and_then(|m| m.line((0, 1), (1, 1)))
        .unwrap()
        .with_finish(Position::new(0, 3));

    let solver = MazeSolver::new(SimRobot::new(maze), ControlConfig::default()).unwrap();
    let mut solver = solver.map_maze().unwrap();
    assert_eq!(solver.path().to_string(), "S2 F3");

    solver.robot_mut().reset();
    assert!(solver.run_maze_aggressive().reached_finish);
    solver.robot_mut().reset();
    assert!(solver.run_maze_conservative().reached_finish);
}

#[test]
fn test_maze_from_toml_description() {
    let text = r#"
        start = [0, 0]
        finish = [2, 3]
        lines = [
            [0, 0, 0, 3],
            [0, 3, 2, 3],
            [0, 2, -2, 2],
            [-1, 2, -1, 4],
        ]
    "#;
    let desc: MazeDescription = toml::from_str(text).unwrap();
    let maze = SimMaze::try_from(&desc).unwrap();
    let hops = bfs_hops(&maze);

    let solver = MazeSolver::new(SimRobot::new(maze), ControlConfig::default()).unwrap();
    let mut solver = solver.map_maze().unwrap();
    assert!(solver.exploration_report().closed);
    assert_eq!(solver.path().total_hops(), hops);
    assert_eq!(solver.path().to_string(), "S3 R2 F3");

    solver.robot_mut().reset();
    assert!(solver.run_maze_aggressive().reached_finish);
}

#[test]
fn test_random_trees_solve_and_replay() {
    for seed in 0..8u64 {
        let mut rng = StdRng::seed_from_u64(seed);
        let (width, height) = [(3, 3), (5, 4), (8, 7), (6, 6)][seed as usize % 4];
        let maze = random_tree(&mut rng, width, height).unwrap();
        let hops = bfs_hops(&maze);

        let solver = MazeSolver::new(SimRobot::new(maze.clone()), ControlConfig::default()).unwrap();
        let mut solver = solver.map_maze().unwrap();

        let report = solver.exploration_report();
        assert!(report.closed, "seed {}", seed);
        assert_eq!(report.loops_detected, 0, "seed {}", seed);
        assert_eq!(solver.path().total_hops(), hops, "seed {}: {}", seed, solver.path());

        // 树上的 Tremaux：每条边恰好走两次
        let grid = solver.grid();
        for (p, d) in maze.edges() {
            assert_eq!(
                grid.edge_marks(grid.to_window(p), d),
                2,
                "seed {}: edge {} {}",
                seed,
                p,
                d
            );
        }

        solver.robot_mut().reset();
        assert!(solver.run_maze_conservative().reached_finish, "seed {} conservative", seed);
        solver.robot_mut().reset();
        assert!(solver.run_maze_aggressive().reached_finish, "seed {} aggressive", seed);
        assert!(!solver.robot().is_derailed(), "seed {}", seed);
    }
}

#[test]
fn test_unreachable_finish_is_reported() {
    // 终点色块不在任何线上
    let maze = SimMaze::new(Position::new(0, 0))
        .line((0, 0), (0, 2))
        .unwrap()
        .with_finish(Position::new(5, 5));
    let solver = MazeSolver::new(SimRobot::new(maze), ControlConfig::default()).unwrap();
    let err = solver.map_maze().err().unwrap();
    assert!(matches!(err, ControlError::FinishNotFound));
}

#[test]
fn test_loop_scenario_turns_back() {
    // 经由新边回到到访过的路口：无论传感器报告哪些出口都掉头
    for exits in [
        ExitScan { left: true, straight: true, right: true },
        ExitScan { left: false, straight: true, right: false },
        ExitScan::NONE,
    ] {
        let view = JunctionView {
            heading: Direction::West,
            exits,
            marks: DirMarks([1, 1, 0, 0]),
            visited: true,
        };
        assert_eq!(select_turn(&view), TurnDecision::LoopBack);
    }
}

#[test]
fn test_loop_maze_degrades_gracefully() {
    // 一个方形环：起点北行进入环，终点挂在环的远端
    let maze = SimMaze::new(Position::new(0, 0))
        .line((0, 0), (0, 1))
        .and_then(|m| m.line((-1, 1), (1, 1)))
        .and_then(|m| m.line((-1, 1), (-1, 3)))
        .and_then(|m| m.line((1, 1), (1, 3)))
        .and_then(|m| m.line((-1, 3), (1, 3)))
        .and_then(|m| m.line((0, 3), (0, 4)))
        .unwrap()
        .with_finish(Position::new(0, 4));
    let hops = bfs_hops(&maze);

    let solver = MazeSolver::new(SimRobot::new(maze), ControlConfig::default()).unwrap();
    let mut solver = solver.map_maze().unwrap();
    assert!(solver.exploration_report().loops_detected > 0);
    assert_eq!(solver.path().total_hops(), hops);

    solver.robot_mut().reset();
    assert!(solver.run_maze_conservative().reached_finish);
}
