use std::path::Path;

use backup_core::config::AppConfig;
use backup_core::container::DockerCli;
use backup_core::error::Result;
use backup_core::runner::BackupRunner;
use tracing::info;

use crate::cli::Commands;
use crate::commands;

/// CLI 应用上下文：配置 + 协调器
pub struct CliApp {
    pub config: AppConfig,
    runner: BackupRunner<DockerCli>,
}

impl CliApp {
    /// 加载配置并初始化CLI应用
    pub fn new(config_path: &Path) -> Result<Self> {
        let config = AppConfig::load_from_file(config_path)?;
        let runtime = DockerCli::new()?;
        let runner = BackupRunner::new(config.clone(), runtime);

        Ok(Self { config, runner })
    }

    pub fn runner(&self) -> &BackupRunner<DockerCli> {
        &self.runner
    }

    /// 运行应用命令
    pub async fn run(&mut self, command: Commands) -> Result<()> {
        match command {
            Commands::Init { .. } => unreachable!(), // 已经在 main.rs 中处理
            Commands::Backup => {
                info!("💾 开始执行一轮备份...");
                commands::run_backup(self).await
            }
            Commands::Daemon { cron } => {
                info!("⏰ 以守护进程方式运行定时备份...");
                commands::run_daemon(self, cron).await
            }
            Commands::Status => {
                info!("📋 检查配置...");
                commands::run_status(self)
            }
        }
    }
}
