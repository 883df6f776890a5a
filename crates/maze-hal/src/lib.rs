//! # Maze HAL
//!
//! 线迷宫机器人的硬件抽象层：5 路反射式线传感器 + 差速电机 + 毫秒时钟。
//!
//! 控制层只通过 [`LineRobot`] trait 访问硬件。传感器标定是前置条件，
//! 不在这一层验证。
//!
//! ## 后端
//!
//! - 真实硬件：由固件实现 `LineRobot`
//! - `mock` feature：[`mock::SimRobot`]（运动学仿真）与 [`mock::ScriptedRobot`]（传感器脚本回放）

#[cfg(feature = "mock")]
pub mod mock;

/// 传感器数量
pub const SENSOR_COUNT: usize = 5;

/// 线居中时的位置读数
pub const LINE_CENTER: u16 = 2000;

/// 位置读数上限（线在最右侧传感器下）
pub const MAX_POSITION: u16 = ((SENSOR_COUNT - 1) * 1000) as u16;

/// 电机功率绝对值上限
pub const MAX_MOTOR_POWER: i16 = 255;

/// 参与加权平均的最低强度
const NOISE_FLOOR: u16 = 50;

/// 判定"看到线"的最低强度
const ON_LINE_THRESHOLD: u16 = 200;

/// 一次线传感器读数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineReading {
    /// 加权线位置，`0..=4000`（0 = 最左传感器下）
    pub position: u16,
    /// 标定后的强度，`0..=1000`，下标 0 为最左
    pub intensities: [u16; SENSOR_COUNT],
}

impl LineReading {
    /// 由强度计算加权线位置
    ///
    /// 强度超过 50 的传感器参与加权平均；没有任何传感器超过 200 时视为丢线，
    /// 根据上一次位置返回最左（0）或最右（4000）。
    pub fn from_intensities(intensities: [u16; SENSOR_COUNT], last_position: u16) -> Self {
        let mut weighted: u32 = 0;
        let mut sum: u32 = 0;
        let mut on_line = false;

        for (i, &value) in intensities.iter().enumerate() {
            if value > ON_LINE_THRESHOLD {
                on_line = true;
            }
            if value > NOISE_FLOOR {
                weighted += value as u32 * (i as u32 * 1000);
                sum += value as u32;
            }
        }

        let position = if !on_line || sum == 0 {
            if last_position < LINE_CENTER { 0 } else { MAX_POSITION }
        } else {
            (weighted / sum) as u16
        };

        Self {
            position,
            intensities,
        }
    }

    /// 是否有任一传感器看到线
    pub fn is_on_line(&self) -> bool {
        self.intensities.iter().any(|&v| v > ON_LINE_THRESHOLD)
    }

    /// 中间三个传感器 `[1, 2, 3]`
    pub fn center(&self) -> [u16; 3] {
        [self.intensities[1], self.intensities[2], self.intensities[3]]
    }

    pub fn left(&self) -> u16 {
        self.intensities[0]
    }

    pub fn right(&self) -> u16 {
        self.intensities[SENSOR_COUNT - 1]
    }
}

/// 线迷宫机器人硬件接口
///
/// 单线程、忙轮询使用；所有方法都不会失败。
pub trait LineRobot {
    /// 读取线传感器（含位置计算）
    fn read_line(&mut self) -> LineReading;

    /// 设置左右电机功率，`-255..=255`
    fn set_motors(&mut self, left: i16, right: i16);

    /// 单调毫秒时钟
    fn get_ms(&self) -> u32;

    /// 阻塞延时（期间电机保持上一次的设定）
    fn delay_ms(&mut self, ms: u32);

    /// 停止两个电机
    fn stop(&mut self) {
        self.set_motors(0, 0);
    }
}

impl<R: LineRobot + ?Sized> LineRobot for &mut R {
    fn read_line(&mut self) -> LineReading {
        (**self).read_line()
    }

    fn set_motors(&mut self, left: i16, right: i16) {
        (**self).set_motors(left, right)
    }

    fn get_ms(&self) -> u32 {
        (**self).get_ms()
    }

    fn delay_ms(&mut self, ms: u32) {
        (**self).delay_ms(ms)
    }
}

/// 把功率限制在电机允许范围内
pub fn clamp_power(power: i32) -> i16 {
    power.clamp(-(MAX_MOTOR_POWER as i32), MAX_MOTOR_POWER as i32) as i16
}
