//! # 探索与转向启发式
//!
//! 每个路口的处理顺序：
//!
//! ```text
//! follow ──► 蠕动 1 ──► 采样左/右 ──► 蠕动 2 ──► 采样直行/终点 ──► 停车
//!        ──► 段长标定 ──► Grid::advance（位置、标记）──► 记录出口 ──► select_turn ──► 转向
//! ```
//!
//! 位置更新先于标记记录，标记记录先于转向选择。
//!
//! ## 转向选择（Tremaux 变体）
//!
//! 按左 > 直 > 右的优先级，选择标记数最少且严格小于 2 的出口。
//! 来向标记为 1 且路口此前到访过，说明经由新边回到了旧路口（环路），改为掉头。
//! 没有可选出口且来向标记 ≥ 2 时探索闭合（"X"）。
//!
//! 终点按死路处理：终点色块会让两侧传感器饱和，那里的左右采样不是真实出口。

use crate::ControlError;
use crate::config::{
    CalibrationConfig, CenteringConfig, ControlConfig, ExplorationConfig, FinishPolicy, TurnTiming,
};
use crate::follower::{SegmentEnd, SegmentFollower};
use crate::session::MazeSession;
use crate::turns::{creep, pivot};
use maze_hal::LineRobot;
use maze_map::{DirMarks, Direction, Position, Turn};
use std::fmt;
use tracing::{debug, info, warn};

/// 传感器在路口报告的出口（相对当前航向）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExitScan {
    pub left: bool,
    pub straight: bool,
    pub right: bool,
}

impl ExitScan {
    pub const NONE: ExitScan = ExitScan {
        left: false,
        straight: false,
        right: false,
    };

    pub fn is_empty(&self) -> bool {
        !(self.left || self.straight || self.right)
    }

    /// 按优先级排列的 `(是否存在, 转向)`
    fn candidates(&self) -> [(bool, Turn); 3] {
        [
            (self.left, Turn::Left),
            (self.straight, Turn::Straight),
            (self.right, Turn::Right),
        ]
    }

    /// 出口的绝对方向
    pub fn directions(&self, heading: Direction) -> impl Iterator<Item = Direction> {
        self.candidates()
            .into_iter()
            .filter(|&(present, _)| present)
            .map(move |(_, turn)| heading.apply(turn))
    }
}

impl fmt::Display for ExitScan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (present, turn) in self.candidates() {
            write!(f, "{}", if present { turn.as_char() } else { '-' })?;
        }
        Ok(())
    }
}

/// 转向选择的输入
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JunctionView {
    /// 到达时的航向
    pub heading: Direction,
    pub exits: ExitScan,
    /// 记录本段之后四个方向的标记数
    pub marks: DirMarks,
    /// 到达前此路口是否已有来向以外的已知边
    pub visited: bool,
}

/// 转向决策
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnDecision {
    Turn(Turn),
    /// 检测到环路，掉头
    LoopBack,
    /// 探索闭合
    Closed,
}

impl TurnDecision {
    /// 需要执行的转向（闭合时为 `None`）
    pub fn turn(self) -> Option<Turn> {
        match self {
            TurnDecision::Turn(turn) => Some(turn),
            TurnDecision::LoopBack => Some(Turn::Back),
            TurnDecision::Closed => None,
        }
    }
}

impl fmt::Display for TurnDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnDecision::Turn(turn) => write!(f, "{}", turn),
            TurnDecision::LoopBack => write!(f, "B (loop)"),
            TurnDecision::Closed => write!(f, "X"),
        }
    }
}

/// 选择下一步转向
pub fn select_turn(view: &JunctionView) -> TurnDecision {
    let back = view.marks[view.heading.flip()];

    if view.visited && back == 1 {
        return TurnDecision::LoopBack;
    }

    let mut selected = None;
    let mut fewest = 2;
    for (present, turn) in view.exits.candidates() {
        let marks = view.marks[view.heading.apply(turn)];
        if present && marks < fewest {
            selected = Some(turn);
            fewest = marks;
        }
    }

    match selected {
        Some(turn) => TurnDecision::Turn(turn),
        None if back >= 2 => TurnDecision::Closed,
        None => TurnDecision::Turn(Turn::Back),
    }
}

/// 段长标定：`round((elapsed_ms - offset_ms) / unit_ms)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DistanceCalibration {
    offset_ms: u32,
    unit_ms: u32,
}

impl DistanceCalibration {
    pub fn new(config: CalibrationConfig) -> Self {
        Self {
            offset_ms: config.offset_ms,
            unit_ms: config.unit_ms.max(1),
        }
    }

    /// 经过的格数（跳数），饱和于 `0..=255`
    pub fn cells(&self, elapsed_ms: u32) -> u8 {
        let cells = elapsed_ms
            .saturating_sub(self.offset_ms)
            .saturating_add(self.unit_ms / 2)
            / self.unit_ms;
        cells.min(u8::MAX as u32) as u8
    }
}

/// 一个路口的传感器采样结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JunctionScan {
    pub end: SegmentEnd,
    pub exits: ExitScan,
    pub finish: bool,
    /// 从出发到第二段蠕动结束的时间
    pub elapsed_ms: u32,
}

/// 一次路口决策的记录
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JunctionRecord {
    /// 逻辑坐标
    pub at: Position,
    pub heading: Direction,
    pub length: u8,
    pub exits: ExitScan,
    pub finish: bool,
    pub decision: TurnDecision,
}

/// 探索报告
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExplorationReport {
    pub segments: u32,
    pub junctions: Vec<JunctionRecord>,
    pub loops_detected: u32,
    /// 终点逻辑坐标
    pub finish: Option<Position>,
    /// 是否回到了完全探索的起点
    pub closed: bool,
}

/// 迷宫探索器
#[derive(Debug, Clone, Copy)]
pub struct Explorer {
    follower: SegmentFollower,
    centering: CenteringConfig,
    calibration: DistanceCalibration,
    turns: TurnTiming,
    exploration: ExplorationConfig,
}

impl Explorer {
    pub fn new(config: &ControlConfig) -> Self {
        Self {
            follower: SegmentFollower::new(config.follower),
            centering: config.centering,
            calibration: DistanceCalibration::new(config.calibration),
            turns: config.turns.conservative,
            exploration: config.exploration,
        }
    }

    /// 跟随一段并识别路口
    pub fn scan<R: LineRobot + ?Sized>(&self, robot: &mut R) -> JunctionScan {
        let begin = robot.get_ms();
        let outcome = self.follower.follow(robot);

        creep(robot, self.centering.first);
        let reading = robot.read_line();
        let left = reading.left() > self.centering.side_threshold;
        let right = reading.right() > self.centering.side_threshold;

        creep(robot, self.centering.second);
        let elapsed_ms = robot.get_ms().wrapping_sub(begin);

        let center = robot.read_line().center();
        let straight = center.iter().any(|&v| v > self.centering.straight_threshold);
        let finish = center.iter().all(|&v| v > self.centering.finish_threshold);

        JunctionScan {
            end: outcome.end,
            exits: ExitScan {
                left,
                straight,
                right,
            },
            finish,
            elapsed_ms,
        }
    }

    /// 探索整个迷宫
    ///
    /// 会清空会话中的网格。成功返回时终点已记录。
    ///
    /// # 错误
    ///
    /// - `Map(WindowOverflow)`: 迷宫超出存储窗口
    /// - `ExplorationLimit`: 跟随段数达到上限
    /// - `FinishNotFound`: 探索闭合但没有找到终点
    pub fn explore<R: LineRobot + ?Sized>(
        &self,
        robot: &mut R,
        session: &mut MazeSession,
    ) -> Result<ExplorationReport, ControlError> {
        session.reset();
        let mut report = ExplorationReport::default();
        info!(policy = ?self.exploration.finish_policy, "Exploration started");

        loop {
            if report.segments >= self.exploration.max_segments {
                robot.stop();
                return Err(ControlError::ExplorationLimit {
                    segments: report.segments,
                });
            }

            let scan = self.scan(robot);
            robot.stop();
            report.segments += 1;

            let heading = session.heading;
            let length = self.calibration.cells(scan.elapsed_ms);
            let here = session.grid.advance(heading, length)?;
            let visited = session.grid.junction_known(here, heading.flip());

            let exits = if scan.finish { ExitScan::NONE } else { scan.exits };
            session.grid.record_exits(here, exits.directions(heading));

            let at = session.grid.to_logical(here);
            if scan.finish && session.grid.record_finish(here) {
                info!(finish = %at, segments = report.segments, "Finish detected");
                report.finish = Some(at);
            }

            let view = JunctionView {
                heading,
                exits,
                marks: session.grid.dir_marks(here),
                visited,
            };
            let decision =
                if scan.finish && self.exploration.finish_policy == FinishPolicy::FirstFinish {
                    TurnDecision::Turn(Turn::Finish)
                } else {
                    select_turn(&view)
                };

            debug!(
                at = %at,
                heading = %heading,
                length,
                elapsed_ms = scan.elapsed_ms,
                end = ?scan.end,
                exits = %exits,
                visited,
                decision = %decision,
                "Junction"
            );
            report.junctions.push(JunctionRecord {
                at,
                heading,
                length,
                exits,
                finish: scan.finish,
                decision,
            });

            match decision {
                TurnDecision::Closed => {
                    report.closed = true;
                    break;
                },
                TurnDecision::Turn(Turn::Finish) => break,
                TurnDecision::LoopBack => {
                    report.loops_detected += 1;
                    warn!(at = %at, heading = %heading, "Loop detected, turning back");
                },
                TurnDecision::Turn(_) => {},
            }

            if let Some(turn) = decision.turn() {
                pivot(robot, turn, &self.turns);
                session.heading = heading.apply(turn);
            }
        }

        robot.stop();
        if session.grid.finish().is_none() {
            return Err(ControlError::FinishNotFound);
        }

        info!(
            segments = report.segments,
            loops = report.loops_detected,
            closed = report.closed,
            "Exploration finished"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_hal::mock::{SimMaze, SimRobot};

    fn view(heading: Direction, exits: ExitScan, marks: [u8; 4], visited: bool) -> JunctionView {
        JunctionView {
            heading,
            exits,
            marks: DirMarks(marks),
            visited,
        }
    }

    const ALL_EXITS: ExitScan = ExitScan {
        left: true,
        straight: true,
        right: true,
    };

    #[test]
    fn test_exit_directions() {
        let exits = ExitScan {
            left: true,
            straight: false,
            right: true,
        };
        let dirs: Vec<_> = exits.directions(Direction::North).collect();
        assert_eq!(dirs, vec![Direction::West, Direction::East]);
        assert_eq!(exits.to_string(), "L-R");
        assert!(ExitScan::NONE.is_empty());
    }

    #[test]
    fn test_prefers_left_on_fresh_junction() {
        // 北行到达：来向（南）标记 1
        let v = view(Direction::North, ALL_EXITS, [0, 0, 1, 0], false);
        assert_eq!(select_turn(&v), TurnDecision::Turn(Turn::Left));
    }

    #[test]
    fn test_picks_fewest_marks() {
        // 左（西）已走过一次，直行未走过
        let v = view(Direction::North, ALL_EXITS, [0, 0, 2, 1], true);
        assert_eq!(select_turn(&v), TurnDecision::Turn(Turn::Straight));

        // 两次以上的出口永不再选
        let exits = ExitScan {
            left: true,
            straight: false,
            right: false,
        };
        let v = view(Direction::North, exits, [0, 0, 2, 2], true);
        assert_eq!(select_turn(&v), TurnDecision::Closed);
    }

    #[test]
    fn test_loop_turns_back_regardless_of_exits() {
        for exits in [ALL_EXITS, ExitScan::NONE, ExitScan { left: false, straight: true, right: false }] {
            let v = view(Direction::East, exits, [0, 0, 0, 1], true);
            assert_eq!(select_turn(&v), TurnDecision::LoopBack, "exits {}", exits);
            assert_eq!(select_turn(&v).turn(), Some(Turn::Back));
        }
    }

    #[test]
    fn test_first_visit_is_not_a_loop() {
        let v = view(Direction::East, ALL_EXITS, [0, 0, 0, 1], false);
        assert_eq!(select_turn(&v), TurnDecision::Turn(Turn::Left));
    }

    #[test]
    fn test_dead_end_turns_back() {
        let v = view(Direction::South, ExitScan::NONE, [1, 0, 0, 0], false);
        assert_eq!(select_turn(&v), TurnDecision::Turn(Turn::Back));
    }

    #[test]
    fn test_closure_at_explored_origin() {
        let v = view(Direction::South, ExitScan::NONE, [2, 0, 0, 0], false);
        assert_eq!(select_turn(&v), TurnDecision::Closed);
        assert_eq!(TurnDecision::Closed.turn(), None);
    }

    #[test]
    fn test_distance_calibration() {
        let cal = DistanceCalibration::new(CalibrationConfig::default());
        assert_eq!(cal.cells(668 * 2 + 77), 2);
        assert_eq!(cal.cells(668 + 142), 1);
        assert_eq!(cal.cells(668 * 3 + 8), 3);
        assert_eq!(cal.cells(0), 0);
        assert_eq!(cal.cells(u32::MAX), u8::MAX);
    }

    /// 起点北行 2 格到路口；路口西 1 格为终点，北 1 格为死路
    fn junction_maze() -> SimMaze {
        SimMaze::new(Position::new(0, 0))
            .line((0, 0), (0, 2))
            .and_then(|m| m.line((0, 2), (-1, 2)))
            .and_then(|m| m.line((0, 2), (0, 3)))
            .unwrap()
            .with_finish(Position::new(-1, 2))
    }

    #[test]
    fn test_scan_first_junction() {
        let mut robot = SimRobot::new(junction_maze());
        let explorer = Explorer::new(&ControlConfig::default());
        let scan = explorer.scan(&mut robot);

        assert_eq!(scan.end, SegmentEnd::Intersection);
        assert_eq!(
            scan.exits,
            ExitScan {
                left: true,
                straight: true,
                right: false
            }
        );
        assert!(!scan.finish);
        assert_eq!(explorer.calibration.cells(scan.elapsed_ms), 2);
        assert_eq!(robot.pose().nearest_node(), Position::new(0, 2));
    }

    #[test]
    fn test_explore_full_closure() {
        let mut robot = SimRobot::new(junction_maze());
        let mut session = MazeSession::new();
        let report = Explorer::new(&ControlConfig::default())
            .explore(&mut robot, &mut session)
            .unwrap();

        let trace: Vec<(u8, TurnDecision)> =
            report.junctions.iter().map(|j| (j.length, j.decision)).collect();
        assert_eq!(
            trace,
            vec![
                (2, TurnDecision::Turn(Turn::Left)),
                (1, TurnDecision::Turn(Turn::Back)),
                (1, TurnDecision::Turn(Turn::Left)),
                (1, TurnDecision::Turn(Turn::Back)),
                (1, TurnDecision::Turn(Turn::Straight)),
                (2, TurnDecision::Closed),
            ]
        );
        assert!(report.closed);
        assert_eq!(report.segments, 6);
        assert_eq!(report.loops_detected, 0);
        assert_eq!(report.finish, Some(Position::new(-1, 2)));
        assert!(report.junctions[1].finish);
        assert!(!robot.is_derailed());

        let grid = session.grid();
        let junction = grid.to_window(Position::new(0, 2));
        assert_eq!(grid.edge_marks(junction, Direction::West), 2);
        assert_eq!(grid.edge_marks(junction, Direction::North), 2);
        assert_eq!(grid.edge_marks(junction, Direction::South), 2);
    }

    #[test]
    fn test_explore_first_finish_stops() {
        let mut config = ControlConfig::default();
        config.exploration.finish_policy = FinishPolicy::FirstFinish;
        let mut robot = SimRobot::new(junction_maze());
        let mut session = MazeSession::new();
        let report = Explorer::new(&config).explore(&mut robot, &mut session).unwrap();

        assert_eq!(report.segments, 2);
        assert!(!report.closed);
        assert_eq!(report.junctions[1].decision, TurnDecision::Turn(Turn::Finish));
        assert!(robot.at_finish());
    }

    #[test]
    fn test_explore_without_finish() {
        let maze = SimMaze::new(Position::new(0, 0)).line((0, 0), (0, 3)).unwrap();
        let mut robot = SimRobot::new(maze);
        let mut session = MazeSession::new();
        let err = Explorer::new(&ControlConfig::default())
            .explore(&mut robot, &mut session)
            .unwrap_err();
        assert!(matches!(err, ControlError::FinishNotFound));
    }

    #[test]
    fn test_explore_segment_limit() {
        let mut config = ControlConfig::default();
        config.exploration.max_segments = 3;
        let mut robot = SimRobot::new(junction_maze());
        let mut session = MazeSession::new();
        let err = Explorer::new(&config).explore(&mut robot, &mut session).unwrap_err();
        assert!(matches!(err, ControlError::ExplorationLimit { segments: 3 }));
        assert_eq!(robot.motors(), (0, 0));
    }
}
