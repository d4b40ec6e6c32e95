use std::time::Duration;

use tracing::{error, info};

use crate::config::ContainerConfig;
use crate::constants::polling;
use crate::container::{ContainerRuntime, poll_until_running, poll_until_stopped};
use crate::details::RunDetails;
use crate::error::{Result, VolbackError};

/// 执行单个容器的卷快照：停止 → 归档 → 启动
///
/// 命名已由侦察阶段固定，这里只负责容器生命周期与归档动作，
/// 成功与否之外不产生其他输出。
pub async fn backup_volume<R: ContainerRuntime>(
    runtime: &R,
    container: &ContainerConfig,
    details: &RunDetails,
) -> Result<()> {
    backup_volume_with_budget(
        runtime,
        container,
        details,
        polling::MAX_ATTEMPTS,
        polling::INTERVAL,
    )
    .await
}

/// 带显式轮询预算的快照流程，测试用零间隔注入
pub async fn backup_volume_with_budget<R: ContainerRuntime>(
    runtime: &R,
    container: &ContainerConfig,
    details: &RunDetails,
    max_attempts: u32,
    interval: Duration,
) -> Result<()> {
    let name = container.name.as_str();

    info!(container = name, "检查容器");
    if let Err(e) = runtime.inspect(name).await {
        // 容器本身不可用，不存在可恢复的运行状态，直接终止本次运行
        return Err(VolbackError::ContainerUnusable(raw_message(e)));
    }

    info!(container = name, "停止容器");
    if let Err(e) = poll_until_stopped(runtime, name, max_attempts, interval).await {
        // 停止超时后容器状态不明，先尽力恢复运行再上报
        if let Err(restart_err) = runtime.start(name).await {
            error!(container = name, error = %restart_err, "停止超时后恢复容器失败");
        }
        return Err(e);
    }

    info!(
        container = name,
        file = %details.backup.file_name_with_extension,
        "开始归档容器卷"
    );
    let snapshot_result = match runtime
        .snapshot(
            name,
            &details.backup.target_directory,
            &details.backup.local_directory,
            &details.backup.file_name,
        )
        .await
    {
        Ok(_) => {
            // 归档命令成功还不够，暂存文件必须真的落盘
            if details.backup.full_file_path.exists() {
                Ok(())
            } else {
                Err(VolbackError::Snapshot(format!(
                    "归档命令完成但未找到暂存文件: {}",
                    details.backup.full_file_path.display()
                )))
            }
        }
        Err(e) => Err(VolbackError::Snapshot(raw_message(e))),
    };

    info!(container = name, "启动容器");
    let restart_result = poll_until_running(runtime, name, max_attempts, interval).await;

    match (snapshot_result, restart_result) {
        (Ok(()), Ok(())) => Ok(()),
        (Ok(()), Err(restart_err)) => Err(restart_err),
        (Err(snapshot_err), restart_result) => {
            // 快照错误优先上报，但重启失败也要留下记录
            if let Err(restart_err) = restart_result {
                error!(
                    container = name,
                    error = %restart_err,
                    "快照失败后重启容器也失败"
                );
            }
            Err(snapshot_err)
        }
    }
}

/// 尽量保留容器引擎的原始输出作为错误信息
fn raw_message(err: VolbackError) -> String {
    match err {
        VolbackError::Docker(raw) => raw,
        other => other.to_string(),
    }
}
