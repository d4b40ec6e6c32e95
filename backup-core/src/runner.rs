use std::path::PathBuf;

use tracing::{debug, error, info, warn};

use crate::alert::{AlertReport, DiscordAlerter};
use crate::config::{AppConfig, ContainerConfig};
use crate::constants::naming;
use crate::container::ContainerRuntime;
use crate::details::RunDetails;
use crate::error::{Result, VolbackError};
use crate::logs::RunLog;
use crate::recon::ReconEngine;
use crate::retention::RetentionPolicy;
use crate::snapshot;
use crate::transfer;
use crate::vars::resolve_config_vars;

/// 备份运行协调器
///
/// 按配置顺序处理每个容器：侦察命名 → 快照 → 移动 → 清理 → 告警。
/// 单个容器失败不会中断整轮备份，各容器的结果独立上报。
#[derive(Debug, Clone)]
pub struct BackupRunner<R> {
    config: AppConfig,
    runtime: R,
    recon: ReconEngine,
    alerter: Option<DiscordAlerter>,
}

impl<R: ContainerRuntime> BackupRunner<R> {
    pub fn new(config: AppConfig, runtime: R) -> Self {
        let alerter = config.alert.discord.as_ref().map(DiscordAlerter::new);
        let recon = ReconEngine::new(config.clone());

        Self {
            config,
            runtime,
            recon,
            alerter,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// 对配置中的全部容器执行一轮备份
    pub async fn run_sweep(&self) {
        if self.config.destination.sftp.is_some() {
            warn!("SFTP 目的地尚未实现，本轮忽略该配置");
        }

        for container in &self.config.backup.docker {
            if let Err(e) = self.run_container(container).await {
                error!(
                    container = %container.name,
                    error = %e,
                    "容器备份失败，继续处理下一个容器"
                );
            }
        }
    }

    /// 备份单个容器，维护本次运行的有序日志并负责告警
    pub async fn run_container(&self, container: &ContainerConfig) -> Result<()> {
        let mut log = RunLog::new();
        log.add("容器备份任务已开始");

        match self.execute_run(container, &mut log).await {
            Ok(()) => {
                log.add(format!("容器 '{}' 备份完成，没有错误", container.name));
                self.dispatch_alert(container, true, &log).await;
                Ok(())
            }
            Err(e) => {
                log.error(&e);
                self.dispatch_alert(container, false, &log).await;
                Err(e)
            }
        }
    }

    /// 单个容器的完整流水线
    async fn execute_run(&self, container: &ContainerConfig, log: &mut RunLog) -> Result<()> {
        let dest_root = self.review_storage_location(log)?;

        // 任何破坏性动作之前先固定所有命名
        let details = self.recon.scout(container)?;
        log.add(format!(
            "暂存文件将生成为 '{}'",
            details.backup.file_name_with_extension
        ));

        snapshot::backup_volume(&self.runtime, container, &details).await?;
        log.add(format!(
            "备份已生成 '{}'",
            details.backup.file_name_with_extension
        ));

        // 快照成功后重启配置里的关联容器
        self.post_reboot_containers(&container.post.reboot).await;

        if let Some(root) = dest_root {
            transfer::move_to_destination(&details, &root)?;

            // 移动成功后暂存文件才可以删除
            std::fs::remove_file(&details.backup.full_file_path)?;
            log.add(format!(
                "备份已移动到 '{}'",
                details.dest.local.full_file_path.display()
            ));

            self.enforce_retention(&details, log);
        }

        Ok(())
    }

    /// 目的地根目录可达性检查；未配置本地目的地时返回 None
    fn review_storage_location(&self, log: &mut RunLog) -> Result<Option<PathBuf>> {
        let path = &self.config.destination.local.path;
        if path.is_empty() {
            log.add("未配置本地目的地，跳过移动与清理");
            return Ok(None);
        }

        let resolved = resolve_config_vars(path)?;
        let root = PathBuf::from(&resolved);
        if !root.exists() {
            return Err(VolbackError::Move(format!("无法访问目的地 '{resolved}'")));
        }

        log.add(format!("目的地 '{resolved}' 可访问"));
        Ok(Some(root))
    }

    /// 执行保留策略；失败只记录，不影响本次运行的结果
    fn enforce_retention(&self, details: &RunDetails, log: &mut RunLog) {
        let keep = self.config.destination.retain.keep;
        let policy = RetentionPolicy::new(&details.dest.local.directory, keep);

        match policy.check(&format!(".{}", naming::EXTENSION)) {
            Ok(Some(removed)) => {
                log.add(format!("已按保留策略删除 '{}'", removed.display()));
            }
            Ok(None) => {}
            Err(e) => {
                warn!(error = %e, "保留策略执行失败");
                log.add(format!("> 保留策略执行失败: {e}"));
            }
        }
    }

    /// 重启备份后需要跟随重启的关联容器，失败只告警
    async fn post_reboot_containers(&self, names: &[String]) {
        if names.is_empty() {
            return;
        }

        info!("执行备份后的容器重启请求");
        for name in names {
            info!(container = %name, "重启关联容器");
            if let Err(e) = self.runtime.stop(name).await {
                warn!(container = %name, error = %e, "停止关联容器失败");
            }
            if let Err(e) = self.runtime.start(name).await {
                warn!(container = %name, error = %e, "启动关联容器失败");
            }
        }
    }

    /// 通过告警边界上报结果；投递失败不影响备份流程
    async fn dispatch_alert(&self, container: &ContainerConfig, success: bool, log: &RunLog) {
        let Some(alerter) = &self.alerter else {
            return;
        };

        if !alerter.should_send(success) {
            debug!(container = %container.name, "按配置跳过成功告警");
            return;
        }

        let report = AlertReport {
            container_name: &container.name,
            success,
            lines: log.lines(),
        };

        if let Err(e) = alerter.dispatch(&report).await {
            warn!(container = %container.name, error = %e, "告警发送失败");
        }
    }
}
