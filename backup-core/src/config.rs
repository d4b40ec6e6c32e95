use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// 应用配置结构
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct AppConfig {
    pub backup: BackupConfig,
    #[serde(default)]
    pub destination: DestinationConfig,
    #[serde(default)]
    pub alert: AlertConfig,
    #[serde(default)]
    pub daemon: DaemonConfig,
}

/// 备份目标配置
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct BackupConfig {
    /// 需要备份的 Docker 容器列表
    #[serde(default)]
    pub docker: Vec<ContainerConfig>,
}

/// 单个容器的备份配置
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ContainerConfig {
    /// 容器名称
    pub name: String,
    /// 容器内要归档的数据目录
    pub directory: String,
    /// 归档文件的命名与暂存配置
    #[serde(default)]
    pub tar: TarConfig,
    /// 备份完成后的附加动作
    #[serde(default)]
    pub post: PostConfig,
}

/// 归档文件命名配置
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct TarConfig {
    /// 目标文件名模式，支持模板变量
    #[serde(default)]
    pub pattern: String,
    /// 为 true 时向不含 {{DATE}} 的模式追加日期后缀
    #[serde(default)]
    pub use_date: bool,
    /// 暂存目录，支持模板变量
    #[serde(default)]
    pub directory: String,
}

/// 备份完成后的附加动作
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct PostConfig {
    /// 快照成功后需要重启的关联容器
    #[serde(default)]
    pub reboot: Vec<String>,
}

/// 备份产物的归属地配置
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct DestinationConfig {
    #[serde(default)]
    pub retain: RetainConfig,
    #[serde(default)]
    pub local: LocalDestConfig,
    /// 远端目的地预留位，尚未实现
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sftp: Option<SftpDestConfig>,
}

/// 保留策略配置
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct RetainConfig {
    /// 每个容器保留的备份文件数量，0 表示不清理
    #[serde(default)]
    pub keep: usize,
}

/// 本地目的地配置
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct LocalDestConfig {
    /// 备份文件的最终存放目录，支持模板变量；留空则跳过移动
    #[serde(default)]
    pub path: String,
}

/// SFTP 目的地配置（预留的扩展点）
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct SftpDestConfig {
    pub path: String,
    pub server: String,
    pub username: String,
    pub password: String,
}

/// 告警配置
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct AlertConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discord: Option<DiscordAlertConfig>,
}

/// Discord Webhook 告警配置
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct DiscordAlertConfig {
    /// Webhook 消息的显示用户名
    #[serde(default)]
    pub username: String,
    /// Webhook 地址列表
    #[serde(default)]
    pub webhooks: Vec<String>,
    /// 为 true 时仅在备份失败时发送告警
    #[serde(default)]
    pub only_on_error: bool,
}

/// 守护进程配置
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct DaemonConfig {
    /// 定时备份的 cron 表达式，留空则只支持单次运行
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cron: Option<String>,
}

impl AppConfig {
    /// 从指定文件加载配置
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)?;
        let config: AppConfig = serde_yaml::from_str(&content)?;

        tracing::debug!(
            containers = config.backup.docker.len(),
            "配置文件加载完成: {}",
            path.as_ref().display()
        );
        Ok(config)
    }

    /// 生成带注释的配置模板，供 init 命令写入
    pub fn template() -> &'static str {
        r#"# Volback 配置文件
# 模板变量: {{PWD}} 工作目录, {{DATE}} 当前日期, {{USERDIR}} 用户主目录

backup:
  docker:
    - name: webdav
      # 容器内要归档的数据目录
      directory: /var/lib/dav
      tar:
        # 最终备份文件的命名模式
        pattern: data
        # 为 true 时向模式追加当天日期
        use_date: true
        # 归档生成时的暂存目录
        directory: "{{PWD}}"
      # 快照成功后需要重启的关联容器（可选）
      # post:
      #   reboot:
      #     - webdav-frontend

destination:
  retain:
    # 每个容器保留的备份文件数量，0 表示不清理
    keep: 10
  local:
    # 备份文件的最终存放目录
    path: "{{USERDIR}}/backups"

# alert:
#   discord:
#     username: volback
#     webhooks:
#       - https://discord.com/api/webhooks/...
#     only_on_error: false

# daemon:
#   cron: "0 2 * * *"
"#
    }
}
