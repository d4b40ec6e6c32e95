use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::{debug, info};

use crate::error::{Result, VolbackError};

/// 备份保留策略
///
/// 无内部状态，每次调用都重新扫描目录，单次调用至多删除一个文件。
#[derive(Debug, Clone)]
pub struct RetentionPolicy {
    directory: PathBuf,
    keep: usize,
}

/// 目录中一个待评估的备份文件
#[derive(Debug)]
struct Candidate {
    path: PathBuf,
    name: String,
    modified: SystemTime,
}

impl RetentionPolicy {
    pub fn new(directory: impl Into<PathBuf>, keep: usize) -> Self {
        Self {
            directory: directory.into(),
            keep,
        }
    }

    /// 检查并执行一次清理，返回被删除的文件路径
    ///
    /// 淘汰对象是修改时间最早的匹配文件；修改时间相同则按文件名
    /// 字典序取最小者，保证结果与目录遍历顺序无关。
    pub fn check(&self, pattern: &str) -> Result<Option<PathBuf>> {
        if self.keep == 0 {
            debug!("保留数量为 0，跳过清理");
            return Ok(None);
        }

        let candidates = self.matching_files(pattern)?;

        if candidates.is_empty() {
            debug!(pattern, "没有匹配的备份文件");
            return Ok(None);
        }

        if candidates.len() <= self.keep {
            debug!(
                found = candidates.len(),
                keep = self.keep,
                "文件数量未超出保留配额"
            );
            return Ok(None);
        }

        let Some(oldest) = candidates
            .into_iter()
            .min_by(|a, b| a.modified.cmp(&b.modified).then_with(|| a.name.cmp(&b.name)))
        else {
            return Ok(None);
        };

        std::fs::remove_file(&oldest.path).map_err(|e| {
            VolbackError::Retention(format!("删除 {} 失败: {e}", oldest.path.display()))
        })?;

        info!(file = %oldest.path.display(), "已删除最旧的备份文件");
        Ok(Some(oldest.path))
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// 收集目录下名称包含 pattern 的普通文件
    fn matching_files(&self, pattern: &str) -> Result<Vec<Candidate>> {
        let entries = std::fs::read_dir(&self.directory).map_err(|e| {
            VolbackError::Retention(format!("读取目录 {} 失败: {e}", self.directory.display()))
        })?;

        let mut candidates = Vec::new();
        for entry in entries {
            let entry = entry
                .map_err(|e| VolbackError::Retention(format!("读取目录项失败: {e}")))?;
            let name = entry.file_name().to_string_lossy().to_string();
            if !name.contains(pattern) {
                continue;
            }

            let metadata = entry.metadata().map_err(|e| {
                VolbackError::Retention(format!("读取 {name} 的元数据失败: {e}"))
            })?;
            if !metadata.is_file() {
                continue;
            }

            let modified = metadata.modified().map_err(|e| {
                VolbackError::Retention(format!("读取 {name} 的修改时间失败: {e}"))
            })?;

            candidates.push(Candidate {
                path: entry.path(),
                name,
                modified,
            });
        }

        Ok(candidates)
    }
}
