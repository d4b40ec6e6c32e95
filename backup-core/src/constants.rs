/// Docker 相关常量
pub mod docker {
    /// docker 可执行文件名
    pub const BINARY: &str = "docker";

    /// 卷快照使用的一次性容器镜像
    pub const SNAPSHOT_IMAGE: &str = "ubuntu";

    /// 快照容器内的挂载点，tar 输出写到这里
    pub const SNAPSHOT_MOUNT: &str = "/backup-dir";

    /// `docker container inspect` 返回的状态字符串
    pub mod status {
        pub const RUNNING: &str = "running";
        pub const STOPPED: &str = "exited";
        pub const RESTARTING: &str = "restarting";
        pub const PAUSED: &str = "paused";
        pub const DEAD: &str = "dead";
    }
}

/// 容器状态轮询相关常量
pub mod polling {
    use std::time::Duration;

    /// 状态探测的最大次数
    pub const MAX_ATTEMPTS: u32 = 30;

    /// 两次探测之间的间隔
    pub const INTERVAL: Duration = Duration::from_secs(2);
}

/// 备份产物命名相关常量
pub mod naming {
    /// 备份文件扩展名（不含点号）
    pub const EXTENSION: &str = "tar";

    /// 命名冲突时的重试上限，超过即报 NamingExhausted
    pub const MAX_ATTEMPTS: u32 = 50;
}

/// 配置模板变量
pub mod vars {
    /// 工作目录
    pub const PWD: &str = "{{PWD}}";

    /// 当前日期
    pub const DATE: &str = "{{DATE}}";

    /// 用户主目录
    pub const USERDIR: &str = "{{USERDIR}}";

    /// {{DATE}} 的渲染格式
    pub const DATE_FORMAT: &str = "%Y%m%d";
}

/// Discord 告警相关常量
pub mod alert {
    /// 合法的 Discord Webhook 地址前缀
    pub const DISCORD_WEBHOOK_PREFIX: &str = "https://discord.com/api/webhooks/";

    /// embed 描述的最大长度
    pub const DISCORD_EMBED_LIMIT: usize = 4096;

    /// 失败告警的 embed 颜色（红）
    pub const DISCORD_ERROR_COLOR: i32 = 16_711_680;

    /// 成功告警的 embed 颜色（绿）
    pub const DISCORD_SUCCESS_COLOR: i32 = 65_290;
}

/// 定时调度相关常量
pub mod cron {
    /// 标准 crontab 表达式的字段数: 分 时 日 月 周
    pub const CRON_FIELDS_COUNT: usize = 5;

    /// 默认调度表达式（每天凌晨2点）
    pub const DEFAULT_EXPRESSION: &str = "0 2 * * *";
}
