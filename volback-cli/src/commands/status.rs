use backup_core::error::Result;
use backup_core::vars::resolve_config_vars;
use tracing::{info, warn};

use super::daemon::parse_cron_expression;
use crate::app::CliApp;

/// 校验配置并显示备份计划
pub fn run_status(app: &CliApp) -> Result<()> {
    let config = &app.config;

    info!(containers = config.backup.docker.len(), "已配置的容器");
    for container in &config.backup.docker {
        info!(
            container = %container.name,
            source = %container.directory,
            staging = %container.tar.directory,
            pattern = %container.tar.pattern,
            use_date = container.tar.use_date,
            "备份计划"
        );
        if !container.post.reboot.is_empty() {
            info!(
                container = %container.name,
                reboot = ?container.post.reboot,
                "备份后重启的关联容器"
            );
        }
    }

    if config.destination.local.path.is_empty() {
        info!("本地目的地: 未配置，备份将停留在暂存目录");
    } else {
        let resolved = resolve_config_vars(&config.destination.local.path)?;
        info!("本地目的地: {resolved}");
        if config.destination.retain.keep == 0 {
            info!("保留策略: 不清理");
        } else {
            info!("保留策略: 每个容器保留 {} 份", config.destination.retain.keep);
        }
    }

    if config.destination.sftp.is_some() {
        warn!("SFTP 目的地尚未实现，该配置会被忽略");
    }

    match &config.daemon.cron {
        Some(expression) => {
            // 提前校验表达式，daemon 启动时不再踩坑
            parse_cron_expression(expression)?;
            info!("定时任务: {expression}");
        }
        None => info!("定时任务: 未配置"),
    }

    match &config.alert.discord {
        Some(discord) => info!(
            webhooks = discord.webhooks.len(),
            only_on_error = discord.only_on_error,
            "Discord 告警已配置"
        ),
        None => info!("Discord 告警: 未配置"),
    }

    info!("✅ 配置有效");
    Ok(())
}
