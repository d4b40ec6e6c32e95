use backup_core::VolbackError;
use clap::Parser;
use tracing::error;
use volback_cli::{Cli, CliApp, Commands, run_init, setup_logging};

#[tokio::main]
async fn main() {
    // 解析命令行参数
    let cli = Cli::parse();

    // 设置日志记录
    setup_logging(cli.verbose);

    // `init` 命令是特例，它不需要预先加载配置
    if let Commands::Init { force } = cli.command {
        if let Err(e) = run_init(&cli.config, force) {
            error!("❌ 初始化失败: {e}");
            std::process::exit(1);
        }
        return;
    }

    // 对于其他所有命令，先加载配置并初始化App
    let mut app = match CliApp::new(&cli.config) {
        Ok(app) => app,
        Err(e) => {
            let config_missing = matches!(
                &e,
                VolbackError::Io(io) if io.kind() == std::io::ErrorKind::NotFound
            );

            if config_missing {
                error!("❌ 配置文件 '{}' 未找到。", cli.config.display());
                error!("👉 请先运行 'volback-cli init' 命令来创建配置文件。");
            } else {
                error!("❌ 应用初始化失败: {e}");
            }
            std::process::exit(1);
        }
    };

    // 运行命令
    if let Err(e) = app.run(cli.command).await {
        error!("❌ 操作失败: {e}");
        std::process::exit(1);
    }
}
