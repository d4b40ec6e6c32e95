use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Volback - Docker 卷备份工具
#[derive(Parser)]
#[command(name = "volback-cli")]
#[command(version)]
#[command(about = "备份 Docker 容器卷并按保留策略清理历史备份")]
pub struct Cli {
    /// 配置文件路径
    #[arg(short, long, default_value = "config.yaml")]
    pub config: PathBuf,

    /// 详细输出
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 生成默认配置文件
    Init {
        /// 覆盖已存在的配置文件
        #[arg(long)]
        force: bool,
    },
    /// 立即对配置中的全部容器执行一轮备份
    Backup,
    /// 按 cron 表达式定时执行备份，直到收到停止信号
    Daemon {
        /// 覆盖配置文件中的定时表达式
        #[arg(long, help = "cron 表达式，例如 '0 2 * * *' 表示每天凌晨2点")]
        cron: Option<String>,
    },
    /// 校验配置并显示备份计划
    Status,
}
