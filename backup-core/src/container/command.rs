use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;

use super::types::{ContainerRuntime, ContainerStateDetail, DockerCli};
use crate::constants::{docker, naming};
use crate::error::{Result, VolbackError};

impl DockerCli {
    /// 创建适配器，确认 docker 命令可用
    pub fn new() -> Result<Self> {
        let binary = which::which(docker::BINARY)
            .map_err(|_| VolbackError::Docker("Docker 未安装或不在 PATH 中".to_string()))?;

        Ok(Self { binary })
    }

    /// 执行 docker 命令
    async fn run_docker_command(&self, args: &[&str]) -> Result<std::process::Output> {
        let output = Command::new(&self.binary)
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        Ok(output)
    }

    /// 执行 docker 命令，失败时把进程原始输出放进错误
    async fn run_checked(&self, args: &[&str]) -> Result<String> {
        let output = self.run_docker_command(args).await?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).to_string())
        } else {
            Err(VolbackError::Docker(raw_output(&output)))
        }
    }
}

/// 合并 stdout/stderr，保留进程的原始输出
fn raw_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    if stdout.trim().is_empty() {
        stderr.trim().to_string()
    } else if stderr.trim().is_empty() {
        stdout.trim().to_string()
    } else {
        format!("{}\n{}", stdout.trim(), stderr.trim())
    }
}

impl ContainerRuntime for DockerCli {
    async fn inspect(&self, name: &str) -> Result<String> {
        self.run_checked(&["container", "inspect", name]).await
    }

    async fn stop(&self, name: &str) -> Result<String> {
        self.run_checked(&["container", "stop", name]).await
    }

    async fn start(&self, name: &str) -> Result<String> {
        self.run_checked(&["container", "start", name]).await
    }

    async fn state(&self, name: &str) -> Result<ContainerStateDetail> {
        let output = self
            .run_checked(&["container", "inspect", "-f", "{{json .State}}", name])
            .await?;

        let detail: ContainerStateDetail = serde_json::from_str(output.trim())?;
        Ok(detail)
    }

    async fn snapshot(
        &self,
        name: &str,
        source_dir: &str,
        staging_dir: &Path,
        file_name: &str,
    ) -> Result<String> {
        // docker run --rm --volumes-from <name> -v <staging>:/backup-dir ubuntu \
        //     tar cvf /backup-dir/<file>.tar <source>
        let volume = format!("{}:{}", staging_dir.display(), docker::SNAPSHOT_MOUNT);
        let archive = format!(
            "{}/{}.{}",
            docker::SNAPSHOT_MOUNT,
            file_name,
            naming::EXTENSION
        );

        self.run_checked(&[
            "run",
            "--rm",
            "--volumes-from",
            name,
            "-v",
            &volume,
            docker::SNAPSHOT_IMAGE,
            "tar",
            "cvf",
            &archive,
            source_dir,
        ])
        .await
    }
}
