use std::path::PathBuf;
use thiserror::Error;

use crate::container::ContainerState;

pub type Result<T> = std::result::Result<T, VolbackError>;

#[derive(Error, Debug)]
pub enum VolbackError {
    #[error("配置错误: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP 请求错误: {0}")]
    Http(#[from] reqwest::Error),

    #[error("序列化错误: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("任务执行错误: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("Docker 命令执行失败: {0}")]
    Docker(String),

    #[error("容器不可用: {0}")]
    ContainerUnusable(String),

    #[error("容器 {container} 未能在限定时间内进入 {target} 状态")]
    ControlTimeout {
        container: String,
        target: ContainerState,
    },

    #[error("卷快照失败: {0}")]
    Snapshot(String),

    #[error("路径已存在: {}", .0.display())]
    PathExists(PathBuf),

    #[error("命名重试次数已用尽（共尝试 {0} 次）")]
    NamingExhausted(u32),

    #[error("备份移动失败: {0}")]
    Move(String),

    #[error("保留策略执行失败: {0}")]
    Retention(String),

    #[error("告警发送失败: {0}")]
    Alert(String),

    #[error("cron 表达式无效: {0}")]
    Cron(String),

    #[error("自定义错误: {0}")]
    Custom(String),
}

impl VolbackError {
    pub fn custom(msg: impl Into<String>) -> Self {
        Self::Custom(msg.into())
    }

    pub fn docker(msg: impl Into<String>) -> Self {
        Self::Docker(msg.into())
    }

    pub fn snapshot(msg: impl Into<String>) -> Self {
        Self::Snapshot(msg.into())
    }

    pub fn moving(msg: impl Into<String>) -> Self {
        Self::Move(msg.into())
    }

    pub fn retention(msg: impl Into<String>) -> Self {
        Self::Retention(msg.into())
    }

    pub fn alert(msg: impl Into<String>) -> Self {
        Self::Alert(msg.into())
    }

    /// 命名冲突属于可自动重试的错误，调用方据此递增尝试计数
    pub fn is_path_exists(&self) -> bool {
        matches!(self, Self::PathExists(_))
    }
}
