//! 传感器脚本回放
//!
//! 每次 `read_line` 依次返回脚本中的下一组强度；脚本耗尽后重复最后一组。
//! 所有电机命令连同时间戳一起记录，供测试断言。

use crate::{LineReading, LineRobot, SENSOR_COUNT, clamp_power};
use std::collections::VecDeque;

/// 一条已记录的电机命令
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotorCommand {
    pub at_ms: u32,
    pub left: i16,
    pub right: i16,
}

/// 脚本回放机器人
#[derive(Debug, Clone, Default)]
pub struct ScriptedRobot {
    script: VecDeque<[u16; SENSOR_COUNT]>,
    last: [u16; SENSOR_COUNT],
    last_position: u16,
    read_ms: u32,
    now_ms: u32,
    reads: usize,
    commands: Vec<MotorCommand>,
}

impl ScriptedRobot {
    pub fn new(script: impl IntoIterator<Item = [u16; SENSOR_COUNT]>) -> Self {
        Self {
            script: script.into_iter().collect(),
            read_ms: 2,
            ..Self::default()
        }
    }

    /// 每次读数消耗的时间
    pub fn with_read_ms(mut self, read_ms: u32) -> Self {
        self.read_ms = read_ms;
        self
    }

    /// 追加读数
    pub fn push(&mut self, intensities: [u16; SENSOR_COUNT]) {
        self.script.push_back(intensities);
    }

    /// 已执行的读数次数
    pub fn reads(&self) -> usize {
        self.reads
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }

    pub fn commands(&self) -> &[MotorCommand] {
        &self.commands
    }

    pub fn last_command(&self) -> Option<MotorCommand> {
        self.commands.last().copied()
    }
}

impl LineRobot for ScriptedRobot {
    fn read_line(&mut self) -> LineReading {
        self.now_ms += self.read_ms;
        if let Some(next) = self.script.pop_front() {
            self.last = next;
        }
        self.reads += 1;
        let reading = LineReading::from_intensities(self.last, self.last_position);
        if reading.is_on_line() {
            self.last_position = reading.position;
        }
        reading
    }

    fn set_motors(&mut self, left: i16, right: i16) {
        self.commands.push(MotorCommand {
            at_ms: self.now_ms,
            left: clamp_power(left as i32),
            right: clamp_power(right as i32),
        });
    }

    fn get_ms(&self) -> u32 {
        self.now_ms
    }

    fn delay_ms(&mut self, ms: u32) {
        self.now_ms += ms;
    }
}
