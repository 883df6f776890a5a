//! # 控制配置
//!
//! 所有可调参数集中在 [`ControlConfig`]。默认值针对 3pi 级小车标定：
//! 基础功率 60、PID 增益 `1/20, 1/10000, 3/2`、标定 `(ms - 140) / 668` 等。
//!
//! 配置文件为 TOML，所有字段都有默认值，可以只写需要覆盖的部分：
//!
//! ```toml
//! [follower]
//! base_power = 70
//!
//! [exploration]
//! finish_policy = "first_finish"
//! ```

use crate::ControlError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

/// 控制配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    /// 路径段容量
    pub path_capacity: usize,

    /// 线跟随
    pub follower: FollowerConfig,

    /// 路口对中
    pub centering: CenteringConfig,

    /// 时间 → 格数标定
    pub calibration: CalibrationConfig,

    /// 原地转向
    pub turns: TurnConfig,

    /// 高速回放的速度曲线
    pub speed: SpeedConfig,

    /// 探索策略
    pub exploration: ExplorationConfig,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            path_capacity: maze_map::DEFAULT_PATH_CAPACITY,
            follower: FollowerConfig::default(),
            centering: CenteringConfig::default(),
            calibration: CalibrationConfig::default(),
            turns: TurnConfig::default(),
            speed: SpeedConfig::default(),
            exploration: ExplorationConfig::default(),
        }
    }
}

impl ControlConfig {
    /// 从 TOML 文本解析并校验
    pub fn from_toml_str(text: &str) -> Result<Self, ControlError> {
        let config: ControlConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ControlError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// 从文件加载配置
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ControlError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ControlError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        debug!(path = %path.display(), "Loaded control config");
        Ok(config)
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ControlError> {
        let path = path.as_ref();
        let text = self.to_toml_string()?;
        fs::write(path, text).map_err(|source| ControlError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })
    }

    /// 校验参数
    ///
    /// 拒绝零除数、超出 `[0, 255]` 的功率和零容量。
    pub fn validate(&self) -> Result<(), ControlError> {
        fn invalid(msg: impl Into<String>) -> Result<(), ControlError> {
            Err(ControlError::InvalidConfig(msg.into()))
        }
        fn check_power(name: &str, power: i16) -> Result<(), ControlError> {
            if !(0..=255).contains(&power) {
                return invalid(format!("{} = {} (must be within 0..=255)", name, power));
            }
            Ok(())
        }

        if self.path_capacity == 0 {
            return invalid("path_capacity must be > 0");
        }

        let gains = &self.follower.gains;
        if gains.p_divisor == 0 || gains.i_divisor == 0 || gains.d_denominator == 0 {
            return invalid("follower.gains divisors must be non-zero");
        }
        check_power("follower.base_power", self.follower.base_power)?;

        check_power("centering.first.power", self.centering.first.power)?;
        check_power("centering.second.power", self.centering.second.power)?;

        if self.calibration.unit_ms == 0 {
            return invalid("calibration.unit_ms must be > 0");
        }

        check_power("turns.conservative.power", self.turns.conservative.power)?;
        check_power("turns.aggressive.power", self.turns.aggressive.power)?;
        check_power("turns.aggressive_creep.power", self.turns.aggressive_creep.power)?;
        check_power("turns.settle.power", self.turns.settle.power)?;

        let speed = &self.speed;
        check_power("speed.floor", speed.floor)?;
        check_power("speed.ceiling", speed.ceiling)?;
        check_power("speed.decel_floor", speed.decel_floor)?;
        if speed.floor > speed.ceiling {
            return invalid(format!(
                "speed.floor ({}) exceeds speed.ceiling ({})",
                speed.floor, speed.ceiling
            ));
        }
        if speed.decay_divisor == 0 {
            return invalid("speed.decay_divisor must be > 0");
        }

        if self.exploration.max_segments == 0 {
            return invalid("exploration.max_segments must be > 0");
        }
        Ok(())
    }
}

/// PID 增益（整数比例形式）
///
/// `differential = p / p_divisor + integral / i_divisor + d * d_numerator / d_denominator`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PidGains {
    pub p_divisor: i32,
    pub i_divisor: i32,
    pub d_numerator: i32,
    pub d_denominator: i32,
}

impl Default for PidGains {
    fn default() -> Self {
        Self {
            p_divisor: 20,
            i_divisor: 10_000,
            d_numerator: 3,
            d_denominator: 2,
        }
    }
}

/// 线跟随配置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FollowerConfig {
    /// 保守跟随的最大功率
    pub base_power: i16,
    /// 中间三个传感器都低于此值时判定为死路
    pub dead_end_threshold: u16,
    /// 任一外侧传感器高于此值时判定为路口
    pub intersection_threshold: u16,
    pub gains: PidGains,
}

impl Default for FollowerConfig {
    fn default() -> Self {
        Self {
            base_power: 60,
            dead_end_threshold: 100,
            intersection_threshold: 200,
            gains: PidGains::default(),
        }
    }
}

/// 一段定时直行
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creep {
    pub power: i16,
    pub ms: u32,
}

impl Creep {
    pub const fn new(power: i16, ms: u32) -> Self {
        Self { power, ms }
    }
}

/// 路口对中配置
///
/// 第一段直行后采样左右出口，第二段后采样直行出口与终点。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CenteringConfig {
    /// 外侧传感器高于此值时认为有左/右出口
    pub side_threshold: u16,
    /// 中间任一传感器高于此值时认为有直行出口
    pub straight_threshold: u16,
    /// 中间三个传感器都高于此值时认为到达终点
    pub finish_threshold: u16,
    pub first: Creep,
    pub second: Creep,
}

impl Default for CenteringConfig {
    fn default() -> Self {
        Self {
            side_threshold: 100,
            straight_threshold: 200,
            finish_threshold: 600,
            first: Creep::new(50, 50),
            second: Creep::new(40, 200),
        }
    }
}

/// 段长标定：`cells = round((elapsed_ms - offset_ms) / unit_ms)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationConfig {
    pub offset_ms: u32,
    pub unit_ms: u32,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            offset_ms: 140,
            unit_ms: 668,
        }
    }
}

/// 原地转向参数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnTiming {
    pub power: i16,
    /// 左/右转持续时间
    pub quarter_ms: u32,
    /// 掉头持续时间
    pub back_ms: u32,
}

/// 转向配置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TurnConfig {
    pub conservative: TurnTiming,
    pub aggressive: TurnTiming,
    /// 高速回放中转向前的对中直行
    pub aggressive_creep: Creep,
    /// 到达终点后的停稳直行
    pub settle: Creep,
}

impl Default for TurnConfig {
    fn default() -> Self {
        Self {
            conservative: TurnTiming {
                power: 80,
                quarter_ms: 200,
                back_ms: 400,
            },
            aggressive: TurnTiming {
                power: 160,
                quarter_ms: 100,
                back_ms: 200,
            },
            aggressive_creep: Creep::new(100, 105),
            settle: Creep::new(40, 100),
        }
    }
}

/// 高速回放速度曲线
///
/// - 加速：`floor + accel_per_ms * elapsed`，上限 `ceiling`
/// - 减速：全速窗口 `ms_per_cell * (cells - cell_bias) + window_offset_ms` 之后
///   按 `(elapsed - window) / decay_divisor` 线性下降；超出窗口 `decel_window_ms` 后固定为 `decel_floor`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedConfig {
    pub floor: i16,
    pub ceiling: i16,
    pub accel_per_ms: i32,
    pub decel_floor: i16,
    pub decel_window_ms: i32,
    pub ms_per_cell: i32,
    pub cell_bias: i32,
    pub window_offset_ms: i32,
    pub decay_divisor: i32,
}

impl Default for SpeedConfig {
    fn default() -> Self {
        Self {
            floor: 60,
            ceiling: 255,
            accel_per_ms: 1,
            decel_floor: 128,
            decel_window_ms: 310,
            ms_per_cell: 137,
            cell_bias: 2,
            window_offset_ms: 58,
            decay_divisor: 2,
        }
    }
}

/// 检测到终点后的策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishPolicy {
    /// 继续探索直到回到起点且所有分支都已走过两次
    #[default]
    FullClosure,
    /// 第一次检测到终点即停止
    FirstFinish,
}

/// 探索配置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorationConfig {
    pub finish_policy: FinishPolicy,
    /// 跟随段数上限
    pub max_segments: u32,
}

impl Default for ExplorationConfig {
    fn default() -> Self {
        Self {
            finish_policy: FinishPolicy::FullClosure,
            max_segments: 512,
        }
    }
}
