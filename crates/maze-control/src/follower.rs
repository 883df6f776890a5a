//! 线段跟随（PID 循迹）
//!
//! # 算法
//!
//! ```text
//! error        = position - 2000
//! integral    += error
//! derivative   = error - last_error
//! differential = error / 20 + integral / 10000 + derivative * 3 / 2
//! ```
//!
//! 差值钳位到 `±max_power` 后分配到两侧电机：
//! 差值 < 0 时 `(max + diff, max)`，否则 `(max, max - diff)`，两侧功率都不为负。
//!
//! # 终止条件
//!
//! - **死路**：中间三个传感器都低于 100
//! - **路口**：任一外侧传感器高于 200
//!
//! 电机在检查终止条件之前已经更新。除此之外循环不会退出。
//!
//! 高速版本把 `max_power` 换成随时间变化的速度曲线（见 [`SpeedProfile`]），
//! 并可以忽略前若干个路口；没有死路检查。

use crate::config::{FollowerConfig, PidGains, SpeedConfig};
use maze_hal::{LINE_CENTER, LineReading, LineRobot};
use tracing::{debug, trace};

/// PID 状态
#[derive(Debug, Clone)]
pub struct LineTracker {
    gains: PidGains,
    integral: i64,
    last_error: i32,
}

impl LineTracker {
    pub fn new(gains: PidGains) -> Self {
        Self {
            gains,
            integral: 0,
            last_error: 0,
        }
    }

    /// 输入线位置，返回未钳位的差值
    pub fn update(&mut self, position: u16) -> i32 {
        let error = position as i32 - LINE_CENTER as i32;
        let derivative = error - self.last_error;
        self.integral += error as i64;
        self.last_error = error;

        let g = &self.gains;
        error / g.p_divisor
            + (self.integral / g.i_divisor as i64) as i32
            + derivative * g.d_numerator / g.d_denominator
    }

    pub fn integral(&self) -> i64 {
        self.integral
    }

    pub fn reset(&mut self) {
        self.integral = 0;
        self.last_error = 0;
    }
}

/// 一次电机分配结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Steering {
    pub left: i16,
    pub right: i16,
    /// 钳位后的差值
    pub differential: i32,
}

/// 差值 → 电机功率
///
/// 左右功率之差恒等于钳位后的差值。
pub fn steer(differential: i32, max_power: i32) -> Steering {
    let diff = differential.clamp(-max_power, max_power);
    let (left, right) = if diff < 0 {
        (max_power + diff, max_power)
    } else {
        (max_power, max_power - diff)
    };
    Steering {
        left: left as i16,
        right: right as i16,
        differential: diff,
    }
}

/// 跟随终止原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentEnd {
    DeadEnd,
    Intersection,
}

/// 一次跟随的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FollowOutcome {
    pub end: SegmentEnd,
    /// 循环次数（含终止的那一次）
    pub iterations: u32,
    /// 最后一次迭代的钳位差值
    pub differential: i32,
    pub elapsed_ms: u32,
}

/// 高速回放速度曲线
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpeedProfile {
    config: SpeedConfig,
}

impl SpeedProfile {
    pub fn new(config: SpeedConfig) -> Self {
        Self { config }
    }

    /// 全速窗口长度（ms）
    pub fn full_speed_ms(&self, cells: u8) -> i32 {
        self.config.ms_per_cell * (cells as i32 - self.config.cell_bias) + self.config.window_offset_ms
    }

    /// `elapsed_ms` 时刻允许的最大功率
    pub fn max_power(&self, elapsed_ms: u32, full_speed_ms: i32) -> i32 {
        let c = &self.config;
        let elapsed = elapsed_ms.min(i32::MAX as u32) as i32;
        let ceiling = c.ceiling as i32;

        let accel = (c.floor as i32).saturating_add(elapsed.saturating_mul(c.accel_per_ms)).min(ceiling);

        let over = elapsed - full_speed_ms;
        let decel = if over > c.decel_window_ms {
            c.decel_floor as i32
        } else if over > 0 {
            ceiling - over / c.decay_divisor
        } else {
            ceiling
        };

        accel.min(decel)
    }
}

/// 线段跟随器
#[derive(Debug, Clone, Copy)]
pub struct SegmentFollower {
    config: FollowerConfig,
}

impl SegmentFollower {
    pub fn new(config: FollowerConfig) -> Self {
        Self { config }
    }

    fn is_dead_end(&self, reading: &LineReading) -> bool {
        reading.center().iter().all(|&v| v < self.config.dead_end_threshold)
    }

    fn is_intersection(&self, reading: &LineReading) -> bool {
        reading.left() > self.config.intersection_threshold
            || reading.right() > self.config.intersection_threshold
    }

    /// 以基础功率跟随，直到死路或路口
    pub fn follow<R: LineRobot + ?Sized>(&self, robot: &mut R) -> FollowOutcome {
        let begin = robot.get_ms();
        let mut tracker = LineTracker::new(self.config.gains);
        let max_power = self.config.base_power as i32;
        let mut iterations = 0;

        loop {
            let reading = robot.read_line();
            iterations += 1;

            let steering = steer(tracker.update(reading.position), max_power);
            robot.set_motors(steering.left, steering.right);
            trace!(
                position = reading.position,
                differential = steering.differential,
                "follow"
            );

            let end = if self.is_dead_end(&reading) {
                SegmentEnd::DeadEnd
            } else if self.is_intersection(&reading) {
                SegmentEnd::Intersection
            } else {
                continue;
            };

            let outcome = FollowOutcome {
                end,
                iterations,
                differential: steering.differential,
                elapsed_ms: robot.get_ms().wrapping_sub(begin),
            };
            debug!(?end, iterations, elapsed_ms = outcome.elapsed_ms, "Segment followed");
            return outcome;
        }
    }

    /// 按速度曲线跟随 `cells` 格，忽略前 `ignore` 个路口
    ///
    /// 一个宽路口持续多次迭代时只计数一次。
    pub fn follow_aggressive<R: LineRobot + ?Sized>(
        &self,
        robot: &mut R,
        profile: &SpeedProfile,
        cells: u8,
        ignore: u8,
    ) -> FollowOutcome {
        let begin = robot.get_ms();
        let full_speed_ms = profile.full_speed_ms(cells);
        let mut tracker = LineTracker::new(self.config.gains);
        let mut iterations = 0;
        let mut seen: u32 = 0;
        let mut on_intersection = false;

        loop {
            let reading = robot.read_line();
            iterations += 1;

            let differential = tracker.update(reading.position);
            let elapsed = robot.get_ms().wrapping_sub(begin);
            let max_power = profile.max_power(elapsed, full_speed_ms);
            let steering = steer(differential, max_power);
            robot.set_motors(steering.left, steering.right);
            trace!(
                position = reading.position,
                max_power,
                differential = steering.differential,
                "follow_aggressive"
            );

            if !self.is_intersection(&reading) {
                on_intersection = false;
                continue;
            }
            if !on_intersection {
                on_intersection = true;
                seen += 1;
            }
            if seen > ignore as u32 {
                debug!(cells, ignore, iterations, elapsed_ms = elapsed, "Run followed");
                return FollowOutcome {
                    end: SegmentEnd::Intersection,
                    iterations,
                    differential: steering.differential,
                    elapsed_ms: elapsed,
                };
            }
        }
    }
}
