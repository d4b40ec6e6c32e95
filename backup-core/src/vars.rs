use std::io;

use crate::constants::vars;
use crate::error::Result;

/// 替换字符串中的全部已知模板变量
///
/// 支持 {{PWD}}、{{DATE}}、{{USERDIR}} 三个变量，未识别的内容原样保留。
/// 工作目录或用户主目录解析失败时返回 IO 错误。
pub fn resolve_config_vars(value: &str) -> Result<String> {
    let mut resolved = value.to_string();

    if resolved.contains(vars::PWD) {
        let cwd = std::env::current_dir()?;
        resolved = resolved.replace(vars::PWD, &cwd.to_string_lossy());
    }

    if resolved.contains(vars::DATE) {
        let today = chrono::Local::now().format(vars::DATE_FORMAT).to_string();
        resolved = resolved.replace(vars::DATE, &today);
    }

    if resolved.contains(vars::USERDIR) {
        let base = directories::BaseDirs::new().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, "无法解析用户主目录")
        })?;
        resolved = resolved.replace(vars::USERDIR, &base.home_dir().to_string_lossy());
    }

    Ok(resolved)
}
