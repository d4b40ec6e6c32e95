use std::fs;
use std::path::Path;

use tracing::info;

use crate::details::RunDetails;
use crate::error::{Result, VolbackError};

/// 把暂存文件复制到最终目的地
///
/// 按字节复制而不是改名，暂存目录和目的地可能在不同文件系统上。
/// 暂存文件由调用方在移动成功之后删除。
pub fn move_to_destination(details: &RunDetails, dest_root: &Path) -> Result<()> {
    if !dest_root.exists() {
        return Err(VolbackError::Move(format!(
            "目的地根目录不存在: {}",
            dest_root.display()
        )));
    }

    if !details.backup.full_file_path.exists() {
        return Err(VolbackError::Move(format!(
            "暂存文件不存在: {}",
            details.backup.full_file_path.display()
        )));
    }

    let dest = &details.dest.local;
    if !dest.is_resolved() {
        return Err(VolbackError::Move(
            "目的地命名尚未解析，无法移动".to_string(),
        ));
    }

    // 按容器名建立目的地子目录
    if !dest.directory.exists() {
        create_dest_dir(&dest.directory)?;
    }

    // 目的地路径绝不允许覆盖
    if dest.full_file_path.exists() {
        return Err(VolbackError::PathExists(dest.full_file_path.clone()));
    }

    fs::copy(&details.backup.full_file_path, &dest.full_file_path)?;

    // 复制完成后确认文件确实存在
    if !dest.full_file_path.exists() {
        return Err(VolbackError::Move(format!(
            "复制后未找到目的地文件: {}",
            dest.full_file_path.display()
        )));
    }

    info!(
        from = %details.backup.full_file_path.display(),
        to = %dest.full_file_path.display(),
        "备份已移动"
    );
    Ok(())
}

#[cfg(unix)]
fn create_dest_dir(path: &Path) -> Result<()> {
    use std::os::unix::fs::DirBuilderExt;

    fs::DirBuilder::new()
        .recursive(true)
        .mode(0o755)
        .create(path)?;
    Ok(())
}

#[cfg(not(unix))]
fn create_dest_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path)?;
    Ok(())
}
