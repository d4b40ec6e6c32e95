use std::fmt;
use std::future::Future;
use std::path::Path;

use serde::Deserialize;

use crate::constants::docker::status;
use crate::error::Result;

/// 容器运行状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerState {
    Running,
    Stopped,
    Restarting,
    Paused,
    Dead,
    Unknown,
}

impl ContainerState {
    /// 从 docker inspect 的状态字符串解析
    pub fn from_status(value: &str) -> Self {
        match value {
            status::RUNNING => ContainerState::Running,
            status::STOPPED => ContainerState::Stopped,
            status::RESTARTING => ContainerState::Restarting,
            status::PAUSED => ContainerState::Paused,
            status::DEAD => ContainerState::Dead,
            _ => ContainerState::Unknown,
        }
    }

    /// 获取状态的中文显示名称
    pub fn display_name(&self) -> &'static str {
        match self {
            ContainerState::Running => "运行中",
            ContainerState::Stopped => "已停止",
            ContainerState::Restarting => "重启中",
            ContainerState::Paused => "已暂停",
            ContainerState::Dead => "已死亡",
            ContainerState::Unknown => "未知",
        }
    }
}

impl fmt::Display for ContainerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// `docker container inspect -f '{{json .State}}'` 的输出结构
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ContainerStateDetail {
    pub status: String,
    pub running: bool,
    pub paused: bool,
    pub restarting: bool,
    #[serde(rename = "OOMKilled", default)]
    pub oom_killed: bool,
    pub dead: bool,
    #[serde(default)]
    pub pid: i64,
    #[serde(default)]
    pub exit_code: i64,
    #[serde(default)]
    pub error: String,
    #[serde(default)]
    pub started_at: String,
    #[serde(default)]
    pub finished_at: String,
}

impl ContainerStateDetail {
    pub fn state(&self) -> ContainerState {
        ContainerState::from_status(&self.status)
    }
}

/// 容器引擎的操作原语
///
/// 生产实现为 [`DockerCli`]，通过 docker 命令行完成；测试中用记录调用
/// 序列的假实现替换，以验证编排器的重启语义。
pub trait ContainerRuntime {
    /// 确认容器存在且可访问，返回原始 inspect 输出
    fn inspect(&self, name: &str) -> impl Future<Output = Result<String>> + Send;

    /// 下发停止命令，不等待容器真正停下
    fn stop(&self, name: &str) -> impl Future<Output = Result<String>> + Send;

    /// 下发启动命令，不等待容器真正就绪
    fn start(&self, name: &str) -> impl Future<Output = Result<String>> + Send;

    /// 读取容器当前状态
    fn state(&self, name: &str) -> impl Future<Output = Result<ContainerStateDetail>> + Send;

    /// 把容器卷归档为暂存目录下的 tar 文件
    fn snapshot(
        &self,
        name: &str,
        source_dir: &str,
        staging_dir: &Path,
        file_name: &str,
    ) -> impl Future<Output = Result<String>> + Send;
}

/// 基于 docker 命令行的容器引擎适配器
#[derive(Debug, Clone)]
pub struct DockerCli {
    /// which 解析出的 docker 可执行文件路径
    pub(crate) binary: std::path::PathBuf,
}
