use std::path::Path;

use uuid::Uuid;

use crate::config::{AppConfig, ContainerConfig, LocalDestConfig};
use crate::constants::{naming, vars};
use crate::details::{BackupDetails, LocalDestDetails, RunDetails};
use crate::error::{Result, VolbackError};
use crate::vars::resolve_config_vars;

/// 命名侦察引擎
///
/// 在任何破坏性动作之前生成并验证暂存路径与目的地路径，
/// 侦察完成后后续阶段不再需要做命名校验。
#[derive(Debug, Clone)]
pub struct ReconEngine {
    config: AppConfig,
}

impl ReconEngine {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// 为单个容器生成完整的运行详情
    ///
    /// 暂存名与目的地名各自在 [`naming::MAX_ATTEMPTS`] 的预算内重试，
    /// 冲突时递增尝试计数，预算耗尽返回 NamingExhausted。
    pub fn scout(&self, container: &ContainerConfig) -> Result<RunDetails> {
        let mut details = RunDetails {
            container_name: container.name.clone(),
            ..Default::default()
        };

        let mut backup = None;
        for _ in 0..naming::MAX_ATTEMPTS {
            let candidate = self.new_backup_details(
                &container.directory,
                &container.name,
                &container.tar.directory,
            )?;

            match self.validate_backup_details(&candidate) {
                Ok(()) => {
                    backup = Some(candidate);
                    break;
                }
                Err(e) if e.is_path_exists() => continue,
                Err(e) => return Err(e),
            }
        }
        details.backup = backup.ok_or(VolbackError::NamingExhausted(naming::MAX_ATTEMPTS))?;

        // 配置了本地目的地才需要解析最终路径
        if !self.config.destination.local.path.is_empty() {
            details.dest.local = self.resolve_local_destination(
                container,
                &details.backup,
                &self.config.destination.local,
            )?;
        }

        Ok(details)
    }

    /// 生成暂存文件详情：UUID 作为全局唯一文件名
    pub fn new_backup_details(
        &self,
        source_dir: &str,
        service_name: &str,
        staging_dir: &str,
    ) -> Result<BackupDetails> {
        let file_name = Uuid::new_v4().to_string();
        let extension = naming::EXTENSION.to_string();
        let file_name_with_extension = format!("{file_name}.{extension}");

        let staging = Path::new(staging_dir).join(service_name);
        let staging = resolve_config_vars(&staging.to_string_lossy())?;
        let local_directory = Path::new(&staging).to_path_buf();
        let full_file_path = local_directory.join(&file_name_with_extension);

        Ok(BackupDetails {
            target_directory: source_dir.to_string(),
            local_directory,
            service_name: service_name.to_string(),
            file_name,
            extension,
            file_name_with_extension,
            full_file_path,
        })
    }

    /// 暂存路径必须尚不存在
    pub fn validate_backup_details(&self, details: &BackupDetails) -> Result<()> {
        if details.full_file_path.exists() {
            return Err(VolbackError::PathExists(details.full_file_path.clone()));
        }
        Ok(())
    }

    /// 在重试预算内解析出一个未被占用的目的地路径
    fn resolve_local_destination(
        &self,
        container: &ContainerConfig,
        backup: &BackupDetails,
        dest: &LocalDestConfig,
    ) -> Result<LocalDestDetails> {
        for attempt in 0..naming::MAX_ATTEMPTS {
            let candidate = self.local_dest_details(container, backup, dest, attempt)?;

            match self.validate_local_dest_details(&candidate) {
                Ok(()) => return Ok(candidate),
                Err(e) if e.is_path_exists() => continue,
                Err(e) => return Err(e),
            }
        }

        Err(VolbackError::NamingExhausted(naming::MAX_ATTEMPTS))
    }

    /// 根据配置的命名模式与尝试计数生成目的地详情
    pub fn local_dest_details(
        &self,
        container: &ContainerConfig,
        backup: &BackupDetails,
        dest: &LocalDestConfig,
        attempt: u32,
    ) -> Result<LocalDestDetails> {
        let dir = Path::new(&dest.path).join(&backup.service_name);
        let dir = resolve_config_vars(&dir.to_string_lossy())?;
        let directory = Path::new(&dir).to_path_buf();

        let mut pattern = container.tar.pattern.clone();
        if container.tar.use_date && !pattern.contains(vars::DATE) {
            pattern = format!("{}-{}", pattern, vars::DATE);
        }

        // 模式可能跨运行重复，追加尝试计数保证可区分
        let file_name = resolve_config_vars(&format!("{pattern}.{attempt}"))?;
        let file_name_with_extension = format!("{}.{}", file_name, backup.extension);
        let full_file_path = directory.join(&file_name_with_extension);

        Ok(LocalDestDetails {
            directory,
            file_name,
            extension: backup.extension.clone(),
            file_name_with_extension,
            full_file_path,
        })
    }

    /// 目的地路径必须尚不存在
    pub fn validate_local_dest_details(&self, details: &LocalDestDetails) -> Result<()> {
        if details.full_file_path.exists() {
            return Err(VolbackError::PathExists(details.full_file_path.clone()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DestinationConfig, LocalDestConfig, RetainConfig, TarConfig};
    use std::fs;
    use tempfile::tempdir;

    fn test_config(staging: &str, dest: &str) -> (AppConfig, ContainerConfig) {
        let container = ContainerConfig {
            name: "webdav".to_string(),
            directory: "/var/lib/dav".to_string(),
            tar: TarConfig {
                pattern: "data".to_string(),
                use_date: false,
                directory: staging.to_string(),
            },
            post: Default::default(),
        };
        let config = AppConfig {
            backup: crate::config::BackupConfig {
                docker: vec![container.clone()],
            },
            destination: DestinationConfig {
                retain: RetainConfig { keep: 10 },
                local: LocalDestConfig {
                    path: dest.to_string(),
                },
                sftp: None,
            },
            ..Default::default()
        };
        (config, container)
    }

    #[test]
    fn test_new_backup_details_generates_full_path() {
        let staging = tempdir().unwrap();
        let dest = tempdir().unwrap();
        let (config, container) = test_config(
            &staging.path().to_string_lossy(),
            &dest.path().to_string_lossy(),
        );

        let engine = ReconEngine::new(config);
        let backup = engine
            .new_backup_details(&container.directory, &container.name, &container.tar.directory)
            .unwrap();

        assert_eq!(backup.extension, "tar");
        assert!(backup.full_file_path.starts_with(staging.path().join("webdav")));
        assert!(backup.file_name_with_extension.ends_with(".tar"));
        assert!(engine.validate_backup_details(&backup).is_ok());
    }

    #[test]
    fn test_validate_backup_details_rejects_existing_path() {
        let staging = tempdir().unwrap();
        let dest = tempdir().unwrap();
        let (config, container) = test_config(
            &staging.path().to_string_lossy(),
            &dest.path().to_string_lossy(),
        );

        let engine = ReconEngine::new(config);
        let backup = engine
            .new_backup_details(&container.directory, &container.name, &container.tar.directory)
            .unwrap();

        fs::create_dir_all(&backup.local_directory).unwrap();
        fs::write(&backup.full_file_path, b"occupied").unwrap();

        let err = engine.validate_backup_details(&backup).unwrap_err();
        assert!(err.is_path_exists());
    }

    #[test]
    fn test_scout_skips_occupied_destination_names() {
        let staging = tempdir().unwrap();
        let dest = tempdir().unwrap();
        let (config, container) = test_config(
            &staging.path().to_string_lossy(),
            &dest.path().to_string_lossy(),
        );

        // data.0 和 data.1 已被之前的运行占用
        let service_dir = dest.path().join("webdav");
        fs::create_dir_all(&service_dir).unwrap();
        fs::write(service_dir.join("data.0.tar"), b"old").unwrap();
        fs::write(service_dir.join("data.1.tar"), b"old").unwrap();

        let engine = ReconEngine::new(config);
        let details = engine.scout(&container).unwrap();

        assert_eq!(details.dest.local.file_name_with_extension, "data.2.tar");
        assert!(!details.dest.local.full_file_path.exists());
    }

    #[test]
    fn test_scout_exhausts_naming_budget() {
        let staging = tempdir().unwrap();
        let dest = tempdir().unwrap();
        let (config, container) = test_config(
            &staging.path().to_string_lossy(),
            &dest.path().to_string_lossy(),
        );

        let service_dir = dest.path().join("webdav");
        fs::create_dir_all(&service_dir).unwrap();
        for attempt in 0..naming::MAX_ATTEMPTS {
            fs::write(service_dir.join(format!("data.{attempt}.tar")), b"old").unwrap();
        }

        let engine = ReconEngine::new(config);
        let err = engine.scout(&container).unwrap_err();
        assert!(matches!(err, VolbackError::NamingExhausted(_)));
    }

    #[test]
    fn test_use_date_appends_date_suffix() {
        let staging = tempdir().unwrap();
        let dest = tempdir().unwrap();
        let (config, mut container) = test_config(
            &staging.path().to_string_lossy(),
            &dest.path().to_string_lossy(),
        );
        container.tar.use_date = true;

        let engine = ReconEngine::new(config);
        let details = engine.scout(&container).unwrap();

        let today = chrono::Local::now()
            .format(crate::constants::vars::DATE_FORMAT)
            .to_string();
        assert_eq!(
            details.dest.local.file_name_with_extension,
            format!("data-{today}.0.tar")
        );
    }
}
