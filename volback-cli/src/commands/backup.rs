use backup_core::error::Result;
use tracing::info;

use crate::app::CliApp;

/// 对配置中的全部容器执行一轮备份
///
/// 单个容器的失败在协调器内部记录并告警，不会中断整轮执行。
pub async fn run_backup(app: &CliApp) -> Result<()> {
    let containers = app.config.backup.docker.len();
    info!(containers, "开始处理配置中的容器");

    app.runner().run_sweep().await;

    info!("✅ 本轮备份执行完毕");
    Ok(())
}
