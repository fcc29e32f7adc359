mod config;
mod generator;
mod logging;
mod models;
mod storage;
mod ui;

use std::io;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use thiserror::Error;
use tracing::info;

use crate::config::{CliArgs, ConfigError, Settings};
use crate::generator::{ContentGenerator, GeminiModel};
use crate::storage::{FileStorage, PostStore, StoreError};
use crate::ui::{App, Route, render};

/// 两次输入检查之间的间隔，用于轮询生成结果
const TICK: Duration = Duration::from_millis(100);

#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("terminal error: {0}")]
    Io(#[from] io::Error),
}

fn main() -> Result<(), AppError> {
    let cli = CliArgs::parse();
    let settings = Settings::load(&cli)?;
    logging::init(&settings.data_dir, &settings.log_level)?;

    // 加载文章仓库，首次启动写入示例文章
    let mut store = PostStore::new(FileStorage::open(&settings.data_dir)?);
    store.ensure_seeded()?;

    let generator = ContentGenerator::new(
        settings.api_key.clone(),
        GeminiModel::new(&settings.endpoint, &settings.model),
    );
    info!(
        data_dir = %settings.data_dir.display(),
        ai = generator.is_configured(),
        "starting lumina"
    );

    // 生成任务运行在后台运行时上，UI 循环保持同步
    let runtime = tokio::runtime::Runtime::new()?;
    let _guard = runtime.enter();

    let mut app = App::new(&mut store, &generator, Route::parse(&cli.route))?;

    // 设置终端
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // 主循环
    let result = run_app(&mut terminal, &mut app);

    // 恢复终端
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    drop(app);
    info!("exiting");
    println!("Posts are stored in {}", settings.data_dir.display());

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), AppError> {
    loop {
        app.poll_generation();
        terminal.draw(|f| render(f, app))?;

        if !event::poll(TICK)? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press && ui::handle_key_event(app, key)? {
                break;
            }
        }
    }
    Ok(())
}
