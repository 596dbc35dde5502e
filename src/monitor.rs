//! 剪贴板轮询监控模块
//!
//! # 设计思路
//!
//! 定时读取剪贴板，与基线比较，发现"变了且非空白"的内容就推进基线
//! 并调用回调。回调做什么（校验、转换）监控不关心，比较门槛只有
//! "changed and non-blank"这一条，检测与校验策略解耦。
//!
//! # 实现思路
//!
//! - 单个 tokio 任务跑 `interval` 循环，`select!` 同时等停止信号。
//!   停止信号是每次启动新建的 `Notify`，`notify_one` 带存续许可，
//!   tick 执行中发出的停止也不会丢。
//! - 活动标志用 `SeqCst` 原子量，每个 tick 轮询前复查；`stop()`
//!   翻标志、发信号、再 `abort`，三重保障之下回调在 `stop()` 返回后
//!   不会再有新触发。`stop()` 可以在回调内部调用。
//! - 重复 `start()` 是受控空操作，不会出现第二个定时器。
//! - 基线只在首次启动前播种一次，之后全靠检测与写回推进。
//! - 单次读失败返回空串，空串过不了比较门槛，轮询继续，状态机
//!   不存在失败态。

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::clipboard::ClipboardPort;

/// 默认轮询间隔（毫秒）
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 500;

/// 轮询间隔下限，再小就是空转
const MIN_POLL_INTERVAL_MS: u64 = 50;

/// 轮询间隔上限
const MAX_POLL_INTERVAL_MS: u64 = 60_000;

/// 把轮询间隔收敛到允许范围内
pub fn normalize_poll_interval_ms(requested: u64) -> u64 {
    requested.clamp(MIN_POLL_INTERVAL_MS, MAX_POLL_INTERVAL_MS)
}

/// 比较门槛：变了、且不是空白，才值得分发
fn should_dispatch(current: &str, last_known: &str) -> bool {
    current != last_known && !current.trim().is_empty()
}

struct MonitorShared {
    port: Arc<dyn ClipboardPort>,
    active: AtomicBool,
    seeded: AtomicBool,
}

struct MonitorTask {
    handle: JoinHandle<()>,
    shutdown: Arc<Notify>,
}

/// 剪贴板轮询监控
pub struct ClipboardMonitor {
    shared: Arc<MonitorShared>,
    task: Mutex<Option<MonitorTask>>,
}

impl ClipboardMonitor {
    pub fn new(port: Arc<dyn ClipboardPort>) -> Self {
        Self {
            shared: Arc::new(MonitorShared {
                port,
                active: AtomicBool::new(false),
                seeded: AtomicBool::new(false),
            }),
            task: Mutex::new(None),
        }
    }

    fn lock_task(&self) -> MutexGuard<'_, Option<MonitorTask>> {
        match self.task.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                log::warn!("监控任务槽位锁中毒，继续使用恢复数据");
                poisoned.into_inner()
            }
        }
    }

    /// 启动监控
    ///
    /// 已在运行时是空操作。首次启动会先从剪贴板播种基线，
    /// 避免启动前就存在的内容被当作新变化。
    ///
    /// # 参数
    /// * `interval_ms` - 轮询间隔，超出范围会被收敛并告警
    /// * `callback` - 检测到新内容时的回调，入参为检测值
    pub fn start<F>(&self, interval_ms: u64, callback: F)
    where
        F: Fn(String) + Send + Sync + 'static,
    {
        if self.shared.active.swap(true, Ordering::SeqCst) {
            log::info!("⏭️ 剪贴板监控已在运行，忽略重复启动");
            return;
        }

        let normalized = normalize_poll_interval_ms(interval_ms);
        if normalized != interval_ms {
            log::warn!("轮询间隔 {}ms 超出范围，已调整为 {}ms", interval_ms, normalized);
        }

        if !self.shared.seeded.swap(true, Ordering::SeqCst) {
            let initial = self.shared.port.read();
            log::debug!("基线播种 - {} 字符", initial.chars().count());
            self.shared.port.set_last_known(&initial);
        }

        let shared = Arc::clone(&self.shared);
        let shutdown = Arc::new(Notify::new());
        let task_shutdown = Arc::clone(&shutdown);

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(Duration::from_millis(normalized));
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // interval 的首个 tick 立即完成，先消费掉，让第一次轮询
            // 落在一个完整周期之后
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = task_shutdown.notified() => {
                        log::debug!("监控任务收到停止信号");
                        break;
                    }
                    _ = ticker.tick() => {
                        if !shared.active.load(Ordering::SeqCst) {
                            break;
                        }

                        let current = shared.port.read();
                        let baseline = shared.port.last_known();
                        if should_dispatch(&current, &baseline) {
                            log::info!("📋 检测到剪贴板变化 - {} 字符", current.chars().count());
                            shared.port.set_last_known(&current);
                            callback(current);
                        }
                    }
                }
            }
        });

        {
            let mut slot = self.lock_task();
            *slot = Some(MonitorTask { handle, shutdown });
        }

        log::info!("▶️ 剪贴板监控已启动 - 轮询间隔: {}ms", normalized);
    }

    /// 停止监控
    ///
    /// 幂等；可以在监控回调内部调用。返回后不会再有新的回调触发。
    pub fn stop(&self) {
        if !self.shared.active.swap(false, Ordering::SeqCst) {
            log::debug!("剪贴板监控已处于停止状态");
            return;
        }

        let task = self.lock_task().take();
        if let Some(task) = task {
            task.shutdown.notify_one();
            task.handle.abort();
        }

        log::info!("🛑 剪贴板监控已停止");
    }

    pub fn is_active(&self) -> bool {
        self.shared.active.load(Ordering::SeqCst)
    }
}

impl Drop for ClipboardMonitor {
    fn drop(&mut self) {
        self.stop();
    }
}
