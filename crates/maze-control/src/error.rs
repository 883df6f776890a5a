//! 控制层错误类型定义

use maze_map::MapError;
use std::path::PathBuf;
use thiserror::Error;

/// 控制层错误类型
///
/// 死路、环路回退、探索闭合都是正常的启发式结果，不会以错误形式出现。
#[derive(Error, Debug)]
pub enum ControlError {
    /// 地图层错误（窗口溢出、路径容量、不可达等）
    #[error("Map error: {0}")]
    Map(#[from] MapError),

    /// 探索已闭合，但从未检测到终点
    #[error("Exploration closed without detecting the finish")]
    FinishNotFound,

    /// 跟随的段数超过上限
    #[error("Exploration limit reached after {segments} segments")]
    ExplorationLimit { segments: u32 },

    /// 配置无效
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// 配置文件读写失败
    #[error("Config file {}: {source}", path.display())]
    ConfigIo {
        path: PathBuf,
        source: std::io::Error,
    },

    /// 配置文件解析失败
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// 配置序列化失败
    #[error("Config serialize error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_error_display() {
        let err = ControlError::from(MapError::Unreachable);
        let msg = format!("{}", err);
        assert!(msg.starts_with("Map error"), "{}", msg);

        let err = ControlError::ExplorationLimit { segments: 512 };
        assert_eq!(format!("{}", err), "Exploration limit reached after 512 segments");

        let err = ControlError::ConfigIo {
            path: PathBuf::from("/tmp/missing.toml"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("/tmp/missing.toml") && msg.contains("not found"), "{}", msg);
    }
}
