//! 控制层启发式的属性测试

use maze_control::config::{CalibrationConfig, FollowerConfig};
use maze_control::explorer::DistanceCalibration;
use maze_control::{
    ExitScan, JunctionView, SegmentEnd, SegmentFollower, TurnDecision, merge_runs, select_turn, steer,
};
use maze_hal::mock::ScriptedRobot;
use maze_map::{DirMarks, Direction, Path, PathSegment, Turn};
use proptest::prelude::*;

fn exit_scan() -> impl Strategy<Value = ExitScan> {
    (any::<bool>(), any::<bool>(), any::<bool>()).prop_map(|(left, straight, right)| ExitScan {
        left,
        straight,
        right,
    })
}

fn path_turn() -> impl Strategy<Value = Turn> {
    prop_oneof![Just(Turn::Left), Just(Turn::Straight), Just(Turn::Right), Just(Turn::Back)]
}

/// 中间至少一个传感器 ≥ 100
fn center_on_line() -> impl Strategy<Value = [u16; 3]> {
    (prop::array::uniform3(0u16..=1000), 0usize..3, 100u16..=1000).prop_map(|(mut c, k, v)| {
        c[k] = v;
        c
    })
}

/// 既不是死路也不是路口的读数
fn plain_reading() -> impl Strategy<Value = [u16; 5]> {
    (0u16..=200, center_on_line(), 0u16..=200).prop_map(|(l, c, r)| [l, c[0], c[1], c[2], r])
}

/// 终止读数及其预期结果
fn ending_reading() -> impl Strategy<Value = ([u16; 5], SegmentEnd)> {
    prop_oneof![
        // 死路优先于路口判定
        (0u16..=1000, prop::array::uniform3(0u16..100), 0u16..=1000)
            .prop_map(|(l, c, r)| ([l, c[0], c[1], c[2], r], SegmentEnd::DeadEnd)),
        (201u16..=1000, center_on_line(), 0u16..=1000, any::<bool>()).prop_map(|(hi, c, other, swap)| {
            let (l, r) = if swap { (other, hi) } else { (hi, other) };
            ([l, c[0], c[1], c[2], r], SegmentEnd::Intersection)
        }),
    ]
}

proptest! {
    /// 测试跟随恰好在第一个满足条件的读数处终止
    #[test]
    fn follow_stops_on_first_qualifying_reading(
        prefix in prop::collection::vec(plain_reading(), 0..40),
        end in ending_reading(),
    ) {
        let (ending, expected) = end;
        let mut script = prefix.clone();
        script.push(ending);
        let mut robot = ScriptedRobot::new(script);

        let outcome = SegmentFollower::new(FollowerConfig::default()).follow(&mut robot);
        prop_assert_eq!(outcome.end, expected);
        prop_assert_eq!(outcome.iterations as usize, prefix.len() + 1);
        prop_assert_eq!(robot.reads(), prefix.len() + 1);
        prop_assert_eq!(robot.commands().len(), prefix.len() + 1);
    }

    /// 测试选中的出口一定是报告过的、标记数小于 2 的出口
    #[test]
    fn selected_exit_is_reported_and_open(
        heading in 0u8..4,
        exits in exit_scan(),
        marks in prop::array::uniform4(0u8..4),
        visited in any::<bool>(),
    ) {
        let heading = Direction::from_index(heading);
        let view = JunctionView { heading, exits, marks: DirMarks(marks), visited };

        match select_turn(&view) {
            TurnDecision::Turn(Turn::Back) => {
                prop_assert!(exits.directions(heading).all(|d| view.marks[d] >= 2));
            },
            TurnDecision::Turn(turn) => {
                let dir = heading.apply(turn);
                prop_assert!(exits.directions(heading).any(|d| d == dir));
                prop_assert!(view.marks[dir] < 2);
                // 没有标记数更少的出口
                prop_assert!(exits.directions(heading).all(|d| view.marks[d] >= view.marks[dir]));
            },
            TurnDecision::LoopBack => {
                prop_assert!(visited);
                prop_assert_eq!(view.marks[heading.flip()], 1);
            },
            TurnDecision::Closed => {
                prop_assert!(view.marks[heading.flip()] >= 2);
                prop_assert!(exits.directions(heading).all(|d| view.marks[d] >= 2));
            },
        }
    }

    /// 测试差速分配：功率不超过上限，左右差等于钳位后的差值
    #[test]
    fn steering_stays_in_range(diff in -2000i32..2000, max in 0i32..=255) {
        let s = steer(diff, max);
        prop_assert!((0..=max).contains(&(s.left as i32)));
        prop_assert!((0..=max).contains(&(s.right as i32)));
        prop_assert_eq!(s.left as i32 - s.right as i32, s.differential);
        prop_assert!(s.differential.abs() <= max);
    }

    /// 测试段长标定单调不减
    #[test]
    fn calibration_is_monotonic(a in any::<u32>(), b in any::<u32>()) {
        let calibration = DistanceCalibration::new(CalibrationConfig::default());
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(calibration.cells(lo) <= calibration.cells(hi));
    }

    /// 测试合并直行段后总跳数不变，且只剩末尾可能出现直行
    #[test]
    fn merge_preserves_hops(
        segments in prop::collection::vec((path_turn(), 1u8..6), 0..12),
        finish in 1u8..6,
    ) {
        let mut path = Path::default();
        for &(turn, distance) in &segments {
            path.push(PathSegment::new(turn, distance)).unwrap();
        }
        path.push(PathSegment::new(Turn::Finish, finish)).unwrap();

        let runs = merge_runs(&path);
        let merged_hops: u32 = runs.iter().map(|r| r.cells as u32 - 1).sum();
        prop_assert_eq!(merged_hops, path.total_hops());

        let straights = segments.iter().filter(|(t, _)| *t == Turn::Straight).count();
        prop_assert_eq!(runs.len(), path.len() - straights);
        prop_assert_eq!(runs.iter().map(|r| r.ignore as usize).sum::<usize>(), straights);
        prop_assert_eq!(runs.last().map(|r| r.turn), Some(Turn::Finish));
    }
}
