use std::path::Path;

use backup_core::config::AppConfig;
use backup_core::error::Result;
use tracing::{info, warn};

/// 运行独立的初始化流程
pub fn run_init(config_path: &Path, force: bool) -> Result<()> {
    info!("📦 Volback 初始化");
    info!("======================");

    // 检查是否已经初始化过
    if !force && config_path.exists() {
        warn!("⚠️  检测到已存在的配置文件: {}", config_path.display());
        info!("如果您要重新初始化，请使用 --force 参数");
        info!("示例: volback-cli init --force");
        return Ok(());
    }

    std::fs::write(config_path, AppConfig::template())?;
    info!("   ✅ 创建配置文件: {}", config_path.display());
    info!("👉 编辑配置文件后运行 'volback-cli backup' 开始第一次备份");

    Ok(())
}
