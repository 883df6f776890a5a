//! generate 命令
//!
//! 生成迷宫描述文件（TOML），可再交给 `solve --maze` 使用

use super::MazeSource;
use anyhow::{Context, Result};
use clap::Args;
use maze_sdk::hal::mock::MazeDescription;
use std::fs;
use std::path::PathBuf;

/// 迷宫生成命令参数
#[derive(Args, Debug)]
pub struct GenerateCommand {
    #[command(flatten)]
    pub source: MazeSource,

    /// 输出文件（默认打印到标准输出）
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl GenerateCommand {
    pub fn execute(&self) -> Result<()> {
        let text = self.render()?;
        match &self.output {
            Some(path) => {
                fs::write(path, text).with_context(|| format!("写入迷宫文件失败: {}", path.display()))?;
                println!("✅ 迷宫已写入: {}", path.display());
            },
            None => print!("{}", text),
        }
        Ok(())
    }

    fn render(&self) -> Result<String> {
        let maze = self.source.load()?;
        let desc = MazeDescription::from(&maze);
        Ok(toml::to_string(&desc)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::load_maze;

    #[test]
    fn test_generated_file_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("maze.toml");
        let cmd = GenerateCommand {
            source: MazeSource {
                maze: None,
                seed: Some(11),
                width: 5,
                height: 4,
            },
            output: Some(path.clone()),
        };
        cmd.execute().unwrap();

        let loaded = load_maze(&path).unwrap();
        let regenerated = cmd.source.load().unwrap();
        assert_eq!(loaded.start(), regenerated.start());
        assert_eq!(loaded.finish(), regenerated.finish());
        assert_eq!(loaded.edge_count(), regenerated.edge_count());
    }
}
