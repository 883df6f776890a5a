//! 定时动作：直行蠕动与原地转向
//!
//! 转向都是开环的：固定差速、固定时长。转完后立即停车。

use crate::config::{Creep, TurnTiming};
use maze_hal::LineRobot;
use maze_map::Turn;
use tracing::debug;

/// 以固定功率直行一段时间（不停车）
pub fn creep<R: LineRobot + ?Sized>(robot: &mut R, creep: Creep) {
    robot.set_motors(creep.power, creep.power);
    robot.delay_ms(creep.ms);
}

/// 执行相对转向
///
/// - `Left`：`(-p, p)` 持续 `quarter_ms`
/// - `Right`：`(p, -p)` 持续 `quarter_ms`
/// - `Back`：`(p, -p)` 持续 `back_ms`
/// - `Straight` / `Finish`：不动
pub fn pivot<R: LineRobot + ?Sized>(robot: &mut R, turn: Turn, timing: &TurnTiming) {
    let p = timing.power;
    let (left, right, ms) = match turn {
        Turn::Left => (-p, p, timing.quarter_ms),
        Turn::Right => (p, -p, timing.quarter_ms),
        Turn::Back => (p, -p, timing.back_ms),
        Turn::Straight | Turn::Finish => return,
    };
    robot.set_motors(left, right);
    robot.delay_ms(ms);
    robot.stop();
    debug!(%turn, power = p, ms, "Pivot");
}
