// 模块声明
mod command;
mod poll;
mod types;

// 重新导出公共API
pub use poll::{poll_until_running, poll_until_stopped};
pub use types::{ContainerRuntime, ContainerState, ContainerStateDetail, DockerCli};
