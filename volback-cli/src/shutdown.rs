use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Notify;
use tracing::{info, warn};

/// 停机协调器
///
/// SIGTERM/SIGINT 请求优雅停机：调度循环在触发边界退出，
/// 进行中的备份允许收尾；SIGQUIT 立即结束进程，不做清理。
#[derive(Clone, Default)]
pub struct ShutdownCoordinator {
    requested: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

impl ShutdownCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 请求优雅停机
    pub fn request_shutdown(&self) {
        if !self.requested.swap(true, Ordering::SeqCst) {
            info!("收到停机请求");
            self.notify.notify_waiters();
        }
    }

    pub fn is_shutdown_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    /// 等待停机信号
    pub async fn wait_for_shutdown(&self) {
        if self.is_shutdown_requested() {
            return;
        }
        self.notify.notified().await;
    }

    /// 安装信号监听，返回后台任务句柄
    pub fn install_signal_handlers(&self) -> tokio::task::JoinHandle<()> {
        let coordinator = self.clone();

        tokio::spawn(async move {
            #[cfg(unix)]
            {
                use tokio::signal::unix::{SignalKind, signal};

                let (Ok(mut sigint), Ok(mut sigterm), Ok(mut sigquit)) = (
                    signal(SignalKind::interrupt()),
                    signal(SignalKind::terminate()),
                    signal(SignalKind::quit()),
                ) else {
                    warn!("安装信号监听失败，停机只能依赖进程管理器");
                    return;
                };

                tokio::select! {
                    _ = sigint.recv() => {
                        warn!("收到 SIGINT，准备优雅停机");
                        coordinator.request_shutdown();
                    }
                    _ = sigterm.recv() => {
                        warn!("收到 SIGTERM，准备优雅停机");
                        coordinator.request_shutdown();
                    }
                    _ = sigquit.recv() => {
                        warn!("收到 SIGQUIT，立即退出");
                        std::process::exit(0);
                    }
                }
            }

            #[cfg(not(unix))]
            {
                if tokio::signal::ctrl_c().await.is_ok() {
                    warn!("收到 Ctrl-C，准备优雅停机");
                    coordinator.request_shutdown();
                }
            }
        })
    }
}
