//! # 剪贴板联系号码转换工具 — 应用入口
//!
//! 本文件只负责装配：读配置、建引擎、接通知、起监控、等退出信号。
//! 业务逻辑分布在各子模块中，详见 `lib.rs` 架构文档。

use std::path::PathBuf;
use std::sync::Arc;

use clipboard_converter::clipboard::{ClipboardPort, SystemClipboard};
use clipboard_converter::converter::ConverterDispatch;
use clipboard_converter::engine;
use clipboard_converter::error::AppError;
use clipboard_converter::notify::NotificationLog;
use clipboard_converter::pipeline::ConvertPipeline;
use clipboard_converter::settings::{self, Settings};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // 配置路径：第一个命令行参数优先，默认落在系统配置目录
    let settings_path = match std::env::args().nth(1) {
        Some(path) => PathBuf::from(path),
        None => settings::default_settings_path()?,
    };
    let settings = Settings::load_or_init(&settings_path)?;

    let engine = engine::build_engine(&settings.engine)?;
    let dispatch = Arc::new(ConverterDispatch::new(
        engine,
        Some(settings.engine_timeout_ms),
    ));
    dispatch.set_separators(settings.separators.clone());
    dispatch.set_rules(settings.converters.clone());

    let port: Arc<dyn ClipboardPort> = Arc::new(SystemClipboard::new());
    let notifications = Arc::new(NotificationLog::new());

    // 订阅通知流：每次变更打一行累计日志
    let _subscription = notifications.subscribe(|entries| {
        if let Some(newest) = entries.first() {
            log::info!("📣 累计 {} 条通知，最新: {}", entries.len(), newest.message);
        }
    });

    if !port.initialize() {
        log::warn!("剪贴板基线初始化失败，首轮检测可能包含启动前的内容");
    }

    let pipeline = Arc::new(ConvertPipeline::new(
        Arc::clone(&port),
        Arc::clone(&dispatch),
        Arc::clone(&notifications),
        &settings.listen_type,
    ));
    pipeline.start(settings.poll_interval_ms);

    log::info!("已就绪，监听类型: {}，Ctrl-C 退出", settings.listen_type);
    tokio::signal::ctrl_c().await?;

    pipeline.stop();
    log::info!("退出 - 本次会话共记录 {} 条转换通知", notifications.count());

    Ok(())
}
