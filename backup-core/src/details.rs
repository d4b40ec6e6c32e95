use std::path::PathBuf;

/// 一次容器备份的过程数据
///
/// 每次运行新建一份，由侦察、编排、移动阶段依次补全，运行结束后丢弃。
#[derive(Debug, Clone, Default)]
pub struct RunDetails {
    pub container_name: String,
    pub backup: BackupDetails,
    pub dest: DestDetails,
}

/// 暂存文件的命名与位置
#[derive(Debug, Clone, Default)]
pub struct BackupDetails {
    /// 容器内被归档的数据目录
    pub target_directory: String,
    /// 宿主机上的暂存目录（已完成变量替换）
    pub local_directory: PathBuf,
    /// 所属容器/服务名
    pub service_name: String,
    /// 唯一文件名（不含扩展名），生成后需经文件系统验证
    pub file_name: String,
    /// 扩展名（不含点号）
    pub extension: String,
    /// 文件名 + 扩展名
    pub file_name_with_extension: String,
    /// 暂存文件的完整路径
    pub full_file_path: PathBuf,
}

/// 备份产物的最终归属地
#[derive(Debug, Clone, Default)]
pub struct DestDetails {
    pub local: LocalDestDetails,
}

/// 本地目的地的命名与位置
///
/// 命名模式人类可读且可能跨运行重复，因此单独做冲突检查。
#[derive(Debug, Clone, Default)]
pub struct LocalDestDetails {
    pub directory: PathBuf,
    pub file_name: String,
    pub extension: String,
    pub file_name_with_extension: String,
    pub full_file_path: PathBuf,
}

impl LocalDestDetails {
    /// 目的地是否已经解析
    pub fn is_resolved(&self) -> bool {
        !self.file_name_with_extension.is_empty()
    }
}
