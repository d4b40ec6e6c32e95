use tracing::{error, info};

use crate::error::VolbackError;

/// 单次运行的有序可读日志
///
/// 除了落到 tracing 之外额外保留一份行序列，备份结束后整体交给告警边界。
#[derive(Debug, Clone, Default)]
pub struct RunLog {
    lines: Vec<String>,
}

impl RunLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一行并同步输出到日志
    pub fn add(&mut self, line: impl Into<String>) {
        let line = line.into();
        info!("{line}");
        self.lines.push(line);
    }

    /// 追加一条错误记录
    pub fn error(&mut self, err: &VolbackError) {
        let line = format!("> 错误: {err}");
        error!("{line}");
        self.lines.push(line);
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_keep_insertion_order() {
        let mut log = RunLog::new();
        log.add("第一步");
        log.error(&VolbackError::custom("坏了"));
        log.add("第二步");

        assert_eq!(log.lines().len(), 3);
        assert_eq!(log.lines()[0], "第一步");
        assert!(log.lines()[1].starts_with("> 错误:"));
        assert_eq!(log.lines()[2], "第二步");
    }
}
