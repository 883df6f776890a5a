//! 运动学仿真
//!
//! 机器人总是位于迷宫的某条格线上，用 `(node, heading, along)` 描述：
//! 从格点 `node` 沿 `heading` 前进了 `along` 个长度单位（一格 = [`CELL_UNITS`]）。
//!
//! # 运动模型（每毫秒积分一次）
//!
//! - 两电机同号：`along += (l + r) / 2`，线相对车体的横向偏移随差速变化
//! - 两电机异号（原地转向）：累积 `spin += (r - l) / 2`；转向在下一次非转向的
//!   `set_motors` 时结算为 0/1/2/3 个四分之一圈
//!
//! 在功率 60 下走完一格约 668 ms。
//!
//! # 传感器模型
//!
//! 传感器阵列位于车体前方 `sensor_offset` 处：
//!
//! - 线上：按横向偏移生成中间的亮带
//! - 格点附近（`line_half_width` 内）：侧向分支使左侧 `0..=2` 或右侧 `2..=4` 饱和
//! - 终点色块（`finish_radius` 内）：全部饱和

use super::maze::SimMaze;
use crate::{LineReading, LineRobot, MAX_POSITION, SENSOR_COUNT, clamp_power};
use maze_map::{Direction, Position};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace, warn};

/// 一格的长度单位
pub const CELL_UNITS: i32 = 40_080;

const FULL: u16 = 1000;

/// 横向偏移上限（超出后线已完全离开传感器阵列）
const LATERAL_LIMIT: f32 = 3000.0;

/// 仿真参数
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    /// 每次 `read_line` 消耗的时间（ms）
    pub read_ms: u32,
    /// 传感器阵列在车体前方的距离
    pub sensor_offset: i32,
    /// 格点周围能看到侧向分支/线端的半宽
    pub line_half_width: i32,
    /// 终点色块半径
    pub finish_radius: i32,
    /// 四分之一圈需要累积的转向量
    pub quarter_turn: i32,
    /// 四分之一圈转向时允许的对位误差
    pub snap_tolerance: i32,
    /// 差速对横向偏移的增益（每 ms、每单位功率差）
    pub steering_gain: f32,
    /// 恒定横向漂移（每 ms）
    pub lateral_drift: f32,
    /// 传感器噪声幅值（`0..=noise` 均匀分布）
    pub noise: u16,
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            read_ms: 2,
            sensor_offset: 8_500,
            line_half_width: 2_000,
            finish_radius: 6_000,
            quarter_turn: 16_000,
            snap_tolerance: 3_000,
            steering_gain: 0.05,
            lateral_drift: 0.0,
            noise: 0,
            seed: 0,
        }
    }
}

/// 车体位姿
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimPose {
    pub node: Position,
    pub heading: Direction,
    /// `0..CELL_UNITS`
    pub along: i32,
    /// 线相对车体中心的横向偏移（传感器单位，右为正）
    pub line_offset: f32,
}

impl SimPose {
    pub fn at(node: Position, heading: Direction) -> Self {
        Self {
            node,
            heading,
            along: 0,
            line_offset: 0.0,
        }
    }

    /// 最近的格点
    pub fn nearest_node(&self) -> Position {
        if self.along * 2 < CELL_UNITS {
            self.node
        } else {
            self.node.neighbor(self.heading)
        }
    }
}

/// 线迷宫仿真机器人
#[derive(Debug, Clone)]
pub struct SimRobot {
    maze: SimMaze,
    config: SimConfig,
    pose: SimPose,
    spin: i32,
    motors: (i16, i16),
    now_ms: u32,
    last_position: u16,
    derailed: bool,
    reads: u64,
    rng: StdRng,
}

impl SimRobot {
    /// 机器人放在起点，朝北
    pub fn new(maze: SimMaze) -> Self {
        Self::with_config(maze, SimConfig::default())
    }

    pub fn with_config(maze: SimMaze, config: SimConfig) -> Self {
        let pose = SimPose::at(maze.start(), Direction::North);
        let rng = StdRng::seed_from_u64(config.seed);
        Self {
            maze,
            config,
            pose,
            spin: 0,
            motors: (0, 0),
            now_ms: 0,
            last_position: 0,
            derailed: false,
            reads: 0,
            rng,
        }
    }

    /// 把机器人搬到格点上（时钟不复位）
    pub fn place(&mut self, node: Position, heading: Direction) {
        self.pose = SimPose::at(node, heading);
        self.spin = 0;
        self.motors = (0, 0);
        self.derailed = false;
        debug!(node = %node, heading = %heading, "Robot placed");
    }

    /// 放回起点，朝北
    pub fn reset(&mut self) {
        self.place(self.maze.start(), Direction::North);
    }

    pub fn pose(&self) -> SimPose {
        self.pose
    }

    pub fn maze(&self) -> &SimMaze {
        &self.maze
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn motors(&self) -> (i16, i16) {
        self.motors
    }

    /// 是否曾在远离格点处做四分之一圈转向
    pub fn is_derailed(&self) -> bool {
        self.derailed
    }

    pub fn reads(&self) -> u64 {
        self.reads
    }

    /// 车体中心是否在终点色块上
    pub fn at_finish(&self) -> bool {
        let Some(finish) = self.maze.finish() else {
            return false;
        };
        [0, 1].into_iter().any(|k| {
            self.pose.node.step(self.pose.heading, k) == finish
                && (self.pose.along - k as i32 * CELL_UNITS).abs() <= self.config.finish_radius
        })
    }

    fn is_pivot(left: i16, right: i16) -> bool {
        (left as i32) * (right as i32) < 0
    }

    fn advance(&mut self, ms: u32) {
        for _ in 0..ms {
            self.step_ms();
        }
    }

    fn step_ms(&mut self) {
        let (l, r) = (self.motors.0 as i32, self.motors.1 as i32);
        if l * r < 0 {
            self.spin += (r - l) / 2;
        } else {
            self.pose.along += (l + r) / 2;
            let offset = self.pose.line_offset
                + (r - l) as f32 * self.config.steering_gain
                + self.config.lateral_drift;
            self.pose.line_offset = offset.clamp(-LATERAL_LIMIT, LATERAL_LIMIT);
            self.normalize();
        }
        self.now_ms = self.now_ms.wrapping_add(1);
    }

    fn normalize(&mut self) {
        while self.pose.along >= CELL_UNITS {
            self.pose.node = self.pose.node.neighbor(self.pose.heading);
            self.pose.along -= CELL_UNITS;
        }
        while self.pose.along < 0 {
            self.pose.node = self.pose.node.neighbor(self.pose.heading.flip());
            self.pose.along += CELL_UNITS;
        }
    }

    /// 结算累积的原地转向
    fn resolve_pivot(&mut self) {
        let quarters = (self.spin as f32 / self.config.quarter_turn as f32).round() as i32;
        self.spin = 0;

        let pose = &mut self.pose;
        match quarters.rem_euclid(4) {
            0 => return,
            2 => {
                // 掉头：位置不变，改用前方格点作为参考
                if pose.along > 0 {
                    pose.node = pose.node.neighbor(pose.heading);
                    pose.along = CELL_UNITS - pose.along;
                }
                pose.heading = pose.heading.flip();
            },
            q => {
                if pose.along > self.config.snap_tolerance
                    && CELL_UNITS - pose.along > self.config.snap_tolerance
                {
                    warn!(node = %pose.node, along = pose.along, "Quarter turn away from a node");
                    self.derailed = true;
                }
                pose.node = pose.nearest_node();
                pose.along = 0;
                pose.heading = if q == 1 {
                    pose.heading.left()
                } else {
                    pose.heading.right()
                };
            },
        }
        pose.line_offset = 0.0;
        debug!(
            quarters,
            node = %pose.node,
            heading = %pose.heading,
            along = pose.along,
            "Pivot resolved"
        );
    }

    fn finish_visible(&self, s: i32, i: i32) -> bool {
        let Some(finish) = self.maze.finish() else {
            return false;
        };
        [i, i + 1].into_iter().any(|k| {
            self.pose.node.step(self.pose.heading, k as i16) == finish
                && (s - k * CELL_UNITS).abs() <= self.config.finish_radius
        })
    }

    fn sense(&mut self) -> [u16; SENSOR_COUNT] {
        let SimPose {
            node,
            heading,
            along,
            line_offset,
        } = self.pose;
        let s = along + self.config.sensor_offset;
        let i = s.div_euclid(CELL_UNITS);
        let f = s.rem_euclid(CELL_UNITS);
        let a = node.step(heading, i as i16);
        let b = a.neighbor(heading);
        let near_a = f <= self.config.line_half_width;
        let near_b = CELL_UNITS - f <= self.config.line_half_width;

        let mut values = [0u16; SENSOR_COUNT];
        if self.finish_visible(s, i) {
            values = [FULL; SENSOR_COUNT];
        } else {
            let on_line = self.maze.connected(a, heading)
                || (near_a && self.maze.has_edges(a))
                || (near_b && self.maze.has_edges(b));
            if on_line {
                for (j, v) in values.iter_mut().enumerate() {
                    let lateral = (j as f32 - 2.0) * 1000.0;
                    *v = (FULL as f32 - (lateral - line_offset).abs()).max(0.0) as u16;
                }
            }
            for (near, n) in [(near_a, a), (near_b, b)] {
                if !near {
                    continue;
                }
                if self.maze.connected(n, heading.left()) {
                    values[..3].fill(FULL);
                }
                if self.maze.connected(n, heading.right()) {
                    values[2..].fill(FULL);
                }
            }
        }

        if self.config.noise > 0 {
            for v in values.iter_mut() {
                *v = (*v + self.rng.gen_range(0..=self.config.noise)).min(FULL);
            }
        }
        values
    }
}

impl LineRobot for SimRobot {
    fn read_line(&mut self) -> LineReading {
        self.advance(self.config.read_ms);
        let intensities = self.sense();
        let reading = LineReading::from_intensities(intensities, self.last_position);
        if reading.is_on_line() {
            self.last_position = reading.position.min(MAX_POSITION);
        }
        self.reads += 1;
        trace!(
            t = self.now_ms,
            node = %self.pose.node,
            along = self.pose.along,
            position = reading.position,
            ?intensities,
            "read_line"
        );
        reading
    }

    fn set_motors(&mut self, left: i16, right: i16) {
        let left = clamp_power(left as i32);
        let right = clamp_power(right as i32);
        if self.spin != 0 && !Self::is_pivot(left, right) {
            self.resolve_pivot();
        }
        self.motors = (left, right);
    }

    fn get_ms(&self) -> u32 {
        self.now_ms
    }

    fn delay_ms(&mut self, ms: u32) {
        self.advance(ms);
    }
}
