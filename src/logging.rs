use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// 安装全局 tracing 订阅者，日志写入 `<data_dir>/lumina.log`（终端被 TUI 占用）
pub fn init(data_dir: &Path, level: &str) -> io::Result<()> {
    let file = open_log_file(data_dir)?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|err| io::Error::other(format!("failed to install tracing subscriber: {err}")))
}

fn open_log_file(data_dir: &Path) -> io::Result<File> {
    std::fs::create_dir_all(data_dir)?;
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(data_dir.join("lumina.log"))
}
