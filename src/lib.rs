// 库文件，导出模块
pub mod catalog;
pub mod cli;
pub mod config;
pub mod dispatch;
pub mod probe;
pub mod scroll;
pub mod session;
pub mod ssh;
pub mod target;
pub mod threadpool;
pub mod utils;

use anyhow::{Context, Result};
use catalog::AggregateResult;
use config::Config;
use dispatch::Dispatcher;

pub async fn run_cast(config: Config) -> Result<AggregateResult> {
    // SSH 调用是阻塞的，放到阻塞线程池中执行
    tokio::task::spawn_blocking(move || Dispatcher::new(config).cast())
        .await
        .context("Dispatcher task failed")
}
