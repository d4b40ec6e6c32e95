use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, warn};

use super::types::{ContainerRuntime, ContainerState};
use crate::error::{Result, VolbackError};

/// 反复下发停止命令并探测状态，直到容器停止或次数用尽
pub async fn poll_until_stopped<R: ContainerRuntime>(
    runtime: &R,
    name: &str,
    max_attempts: u32,
    interval: Duration,
) -> Result<()> {
    poll_until(runtime, name, ContainerState::Stopped, max_attempts, interval).await
}

/// 反复下发启动命令并探测状态，直到容器运行或次数用尽
pub async fn poll_until_running<R: ContainerRuntime>(
    runtime: &R,
    name: &str,
    max_attempts: u32,
    interval: Duration,
) -> Result<()> {
    poll_until(runtime, name, ContainerState::Running, max_attempts, interval).await
}

/// 轮询主循环
///
/// 单次 stop/start 命令失败不会中断轮询，只会在预算内继续重试；
/// 预算耗尽后统一以 ControlTimeout 上报。
async fn poll_until<R: ContainerRuntime>(
    runtime: &R,
    name: &str,
    target: ContainerState,
    max_attempts: u32,
    interval: Duration,
) -> Result<()> {
    for attempt in 0..max_attempts {
        match runtime.state(name).await {
            Ok(detail) if detail.state() == target => return Ok(()),
            Ok(detail) => {
                debug!(
                    container = name,
                    current = %detail.state(),
                    desired = %target,
                    attempt,
                    "容器尚未到达目标状态"
                );
            }
            Err(e) => {
                warn!(container = name, error = %e, "读取容器状态失败，继续重试");
            }
        }

        let command = match target {
            ContainerState::Stopped => runtime.stop(name).await,
            _ => runtime.start(name).await,
        };
        if let Err(e) = command {
            warn!(container = name, error = %e, "容器控制命令失败，继续重试");
        }

        sleep(interval).await;
    }

    Err(VolbackError::ControlTimeout {
        container: name.to_string(),
        target,
    })
}
