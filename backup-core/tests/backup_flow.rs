//! 端到端备份流程测试
//!
//! 用假容器引擎代替 docker 命令行，走通 侦察 → 快照 → 移动 → 清理 的完整链路。

use std::fs;
use std::path::Path;
use std::sync::Mutex;
use std::time::{Duration, SystemTime};

use backup_core::config::{
    AppConfig, BackupConfig, ContainerConfig, DestinationConfig, LocalDestConfig, RetainConfig,
    TarConfig,
};
use backup_core::container::{ContainerRuntime, ContainerStateDetail};
use backup_core::error::{Result, VolbackError};
use backup_core::runner::BackupRunner;
use tempfile::tempdir;

/// 模拟容器引擎：快照动作真实写出暂存文件
struct FakeEngine {
    status: Mutex<&'static str>,
    /// inspect 对该容器返回错误，模拟不可用的容器
    broken_container: Option<String>,
}

impl FakeEngine {
    fn new() -> Self {
        Self {
            status: Mutex::new("running"),
            broken_container: None,
        }
    }

    fn with_broken_container(name: &str) -> Self {
        Self {
            status: Mutex::new("running"),
            broken_container: Some(name.to_string()),
        }
    }
}

impl ContainerRuntime for FakeEngine {
    async fn inspect(&self, name: &str) -> Result<String> {
        if self.broken_container.as_deref() == Some(name) {
            return Err(VolbackError::Docker(format!(
                "Error: No such container: {name}"
            )));
        }
        Ok(String::new())
    }

    async fn stop(&self, _name: &str) -> Result<String> {
        *self.status.lock().unwrap() = "exited";
        Ok(String::new())
    }

    async fn start(&self, _name: &str) -> Result<String> {
        *self.status.lock().unwrap() = "running";
        Ok(String::new())
    }

    async fn state(&self, _name: &str) -> Result<ContainerStateDetail> {
        let status = *self.status.lock().unwrap();
        let detail: ContainerStateDetail = serde_json::from_str(&format!(
            r#"{{"Status":"{status}","Running":false,"Paused":false,
                "Restarting":false,"OOMKilled":false,"Dead":false}}"#
        ))?;
        Ok(detail)
    }

    async fn snapshot(
        &self,
        _name: &str,
        _source_dir: &str,
        staging_dir: &Path,
        file_name: &str,
    ) -> Result<String> {
        fs::create_dir_all(staging_dir)?;
        fs::write(staging_dir.join(format!("{file_name}.tar")), b"tar-bytes")?;
        Ok(String::new())
    }
}

fn demo_config(staging: &Path, dest: &Path, keep: usize) -> AppConfig {
    AppConfig {
        backup: BackupConfig {
            docker: vec![ContainerConfig {
                name: "demo".to_string(),
                directory: "/data".to_string(),
                tar: TarConfig {
                    pattern: "data".to_string(),
                    use_date: false,
                    directory: staging.to_string_lossy().to_string(),
                },
                post: Default::default(),
            }],
        },
        destination: DestinationConfig {
            retain: RetainConfig { keep },
            local: LocalDestConfig {
                path: dest.to_string_lossy().to_string(),
            },
            sftp: None,
        },
        ..Default::default()
    }
}

fn dest_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}

fn set_mtime(path: &Path, time: SystemTime) {
    let file = fs::File::options().write(true).open(path).unwrap();
    file.set_modified(time).unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_single_run_moves_archive_to_destination() {
    let staging = tempdir().unwrap();
    let dest = tempdir().unwrap();
    let config = demo_config(staging.path(), dest.path(), 2);
    let container = config.backup.docker[0].clone();

    let runner = BackupRunner::new(config, FakeEngine::new());
    runner.run_container(&container).await.unwrap();

    // 产物落在 <dest>/demo/data.0.tar
    let final_path = dest.path().join("demo").join("data.0.tar");
    assert!(final_path.exists());
    assert_eq!(fs::read(&final_path).unwrap(), b"tar-bytes");

    // 移动成功后暂存文件已删除
    let staging_dir = staging.path().join("demo");
    assert_eq!(fs::read_dir(&staging_dir).unwrap().count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_three_runs_with_keep_two_evict_oldest() {
    let staging = tempdir().unwrap();
    let dest = tempdir().unwrap();
    let config = demo_config(staging.path(), dest.path(), 2);
    let container = config.backup.docker[0].clone();
    let service_dir = dest.path().join("demo");

    let runner = BackupRunner::new(config, FakeEngine::new());
    let base = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);

    runner.run_container(&container).await.unwrap();
    set_mtime(&service_dir.join("data.0.tar"), base);

    runner.run_container(&container).await.unwrap();
    set_mtime(&service_dir.join("data.1.tar"), base + Duration::from_secs(60));

    runner.run_container(&container).await.unwrap();

    // 第三次运行触发清理，最旧的 data.0.tar 被删除，正好剩两份
    assert_eq!(dest_files(&service_dir), vec!["data.1.tar", "data.2.tar"]);
}

#[tokio::test(start_paused = true)]
async fn test_runs_do_not_reuse_existing_destination_names() {
    let staging = tempdir().unwrap();
    let dest = tempdir().unwrap();
    let config = demo_config(staging.path(), dest.path(), 0);
    let container = config.backup.docker[0].clone();
    let service_dir = dest.path().join("demo");

    let runner = BackupRunner::new(config, FakeEngine::new());
    for _ in 0..3 {
        runner.run_container(&container).await.unwrap();
    }

    // keep 为 0 不清理，三次运行的名字互不冲突
    assert_eq!(
        dest_files(&service_dir),
        vec!["data.0.tar", "data.1.tar", "data.2.tar"]
    );
}

#[tokio::test(start_paused = true)]
async fn test_sweep_continues_after_container_failure() {
    let staging = tempdir().unwrap();
    let dest = tempdir().unwrap();
    let mut config = demo_config(staging.path(), dest.path(), 2);

    // broken 排在前面，它的失败不能影响 demo 的备份
    let mut broken = config.backup.docker[0].clone();
    broken.name = "broken".to_string();
    config.backup.docker.insert(0, broken);

    let runner = BackupRunner::new(config, FakeEngine::with_broken_container("broken"));
    runner.run_sweep().await;

    assert!(dest.path().join("demo").join("data.0.tar").exists());
    assert!(!dest.path().join("broken").exists());
}

#[tokio::test(start_paused = true)]
async fn test_naming_exhausted_surfaces_as_run_failure() {
    let staging = tempdir().unwrap();
    let dest = tempdir().unwrap();
    let config = demo_config(staging.path(), dest.path(), 0);
    let container = config.backup.docker[0].clone();

    // 把全部候选名占住，侦察的重试预算必然耗尽
    let budget = backup_core::constants::naming::MAX_ATTEMPTS;
    let service_dir = dest.path().join("demo");
    fs::create_dir_all(&service_dir).unwrap();
    for attempt in 0..budget {
        fs::write(service_dir.join(format!("data.{attempt}.tar")), b"x").unwrap();
    }

    let runner = BackupRunner::new(config, FakeEngine::new());
    let err = runner.run_container(&container).await.unwrap_err();
    assert!(matches!(err, VolbackError::NamingExhausted(_)));

    // 侦察失败发生在任何破坏性动作之前，已有文件原样保留
    assert_eq!(dest_files(&service_dir).len(), budget as usize);
}
