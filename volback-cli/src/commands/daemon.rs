use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use backup_core::constants::cron::CRON_FIELDS_COUNT;
use backup_core::error::{Result, VolbackError};
use chrono::Local;
use cron::Schedule;
use tokio::sync::Mutex;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::app::CliApp;
use crate::shutdown::ShutdownCoordinator;

/// 以守护进程方式按 cron 调度执行备份
///
/// 每次触发把整轮备份作为独立任务拉起，慢备份不会拖慢调度时钟；
/// 同一时间只允许一轮备份在跑，上一轮未结束时本次触发被跳过。
pub async fn run_daemon(app: &CliApp, cron_override: Option<String>) -> Result<()> {
    let expression = cron_override
        .or_else(|| app.config.daemon.cron.clone())
        .ok_or_else(|| {
            VolbackError::Cron(
                "daemon 模式需要 cron 表达式（配置 daemon.cron 或使用 --cron）".to_string(),
            )
        })?;

    let schedule = parse_cron_expression(&expression)?;
    info!(expression = %expression, "定时备份已启动");

    let shutdown = ShutdownCoordinator::new();
    let signal_task = shutdown.install_signal_handlers();

    // 整轮备份的互斥锁，杜绝两轮备份同时操作同一个容器
    let sweep_guard = Arc::new(Mutex::new(()));

    while !shutdown.is_shutdown_requested() {
        let Some(next) = schedule.upcoming(Local).next() else {
            warn!("调度表达式没有下一次触发时间，退出守护进程");
            break;
        };
        let delay = (next - Local::now()).to_std().unwrap_or(Duration::ZERO);
        debug!(next = %next, "等待下一次触发");

        tokio::select! {
            _ = sleep(delay) => {
                info!("🔔 定时触发，开始新一轮备份");
                let guard = Arc::clone(&sweep_guard);
                let runner = app.runner().clone();
                tokio::spawn(async move {
                    match guard.try_lock() {
                        Ok(_lock) => runner.run_sweep().await,
                        Err(_) => warn!("上一轮备份尚未结束，跳过本次触发"),
                    }
                });
            }
            _ = shutdown.wait_for_shutdown() => break,
        }
    }

    // 优雅停机只在轮次边界生效：等进行中的备份收尾
    let _lock = sweep_guard.lock().await;
    signal_task.abort();
    info!("✅ 调度器已停止");

    Ok(())
}

/// 解析调度表达式，接受标准的 5 字段 crontab 写法
pub(crate) fn parse_cron_expression(expression: &str) -> Result<Schedule> {
    let fields: Vec<&str> = expression.split_whitespace().collect();

    // cron crate 要求秒字段，标准 crontab 表达式在前面补一个 0
    let normalized = if fields.len() == CRON_FIELDS_COUNT {
        format!("0 {}", fields.join(" "))
    } else {
        fields.join(" ")
    };

    Schedule::from_str(&normalized).map_err(|e| VolbackError::Cron(e.to_string()))
}
