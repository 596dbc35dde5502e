//! 转换管线模块
//!
//! # 设计思路
//!
//! 把监控、校验、调度、写回、通知串成一条完整链路：监控发现新内容，
//! 管线校验其结构，命中后交给调度转换，结果写回剪贴板并留下通知。
//! 校验不通过不算错误，基线已被监控推进，同样的内容不会反复处理。
//!
//! # 实现思路
//!
//! - 监控回调里先抢在途标志（`compare_exchange`），抢不到说明上一次
//!   转换还没结束，本次检测值直接丢弃。丢弃而不是排队：基线已经
//!   推进，不会出现两个过期结果乱序写回。
//! - 抢到标志后把实际工作甩给独立任务执行，监控循环不被转换耗时
//!   拖住。标志由 RAII 守卫持有，任务结束（含 panic）自动归还。
//! - 转换失败与写回失败都让错误上抛到回调统一记日志，既不写回
//!   也不留通知。

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::clipboard::ClipboardPort;
use crate::converter::ConverterDispatch;
use crate::error::AppError;
use crate::monitor::ClipboardMonitor;
use crate::notify::NotificationLog;
use crate::validator;

/// 单次处理的结局
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// 未通过结构校验，正常忽略
    Rejected,
    /// 没有配置对应监听类型的转换规则
    NoRule,
    /// 转换完成并已写回，携带写回的内容
    Converted(String),
}

/// 在途转换守卫，析构时归还标志
struct BusyGuard {
    flag: Arc<AtomicBool>,
}

impl BusyGuard {
    /// 尝试占用在途标志，已被占用时返回 `None`
    fn try_acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        if flag
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
        {
            Some(Self {
                flag: Arc::clone(flag),
            })
        } else {
            None
        }
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// 端到端转换管线
pub struct ConvertPipeline {
    port: Arc<dyn ClipboardPort>,
    dispatch: Arc<ConverterDispatch>,
    notifications: Arc<NotificationLog>,
    monitor: ClipboardMonitor,
    listen_type: String,
    in_flight: Arc<AtomicBool>,
}

impl ConvertPipeline {
    pub fn new(
        port: Arc<dyn ClipboardPort>,
        dispatch: Arc<ConverterDispatch>,
        notifications: Arc<NotificationLog>,
        listen_type: &str,
    ) -> Self {
        let monitor = ClipboardMonitor::new(Arc::clone(&port));
        Self {
            port,
            dispatch,
            notifications,
            monitor,
            listen_type: listen_type.to_string(),
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    /// 处理一次检测到的剪贴板内容
    ///
    /// 校验 → 查规则 → 转换 → 写回 → 通知。转换失败或写回失败时
    /// 错误原样上抛：不写回、不留通知，基线保持检测值，重试面对的
    /// 仍是同一份输入。
    pub async fn handle_clipboard_change(
        &self,
        content: &str,
    ) -> Result<PipelineOutcome, AppError> {
        let separators = self.dispatch.separators();

        let Some(separator) = validator::matching_separator(content, &separators) else {
            log::debug!("⏭️ 内容未通过结构校验，忽略");
            return Ok(PipelineOutcome::Rejected);
        };
        log::debug!("✅ 校验通过 - 命中分隔符 {:?}", separator);

        let Some(rule) = self.dispatch.find_by_listen_type(&self.listen_type) else {
            log::warn!("🚫 监听类型 {} 没有对应的转换规则", self.listen_type);
            return Ok(PipelineOutcome::NoRule);
        };

        let converted = self.dispatch.convert(content, &rule).await?;

        self.port.write(&converted)?;

        self.notifications
            .add(&format!("{}：{} → {}", rule.label, content, converted));

        Ok(PipelineOutcome::Converted(converted))
    }

    /// 启动监控并接好回调
    ///
    /// 回调内先抢在途标志，抢不到直接丢弃本次检测值；抢到后在
    /// 独立任务里走完整链路。
    pub fn start(self: &Arc<Self>, interval_ms: u64) {
        let pipeline = Arc::clone(self);

        self.monitor.start(interval_ms, move |content| {
            let Some(guard) = BusyGuard::try_acquire(&pipeline.in_flight) else {
                log::debug!("⏳ 上一次转换仍在进行，丢弃本次检测值");
                return;
            };

            let worker = Arc::clone(&pipeline);
            tokio::spawn(async move {
                let _guard = guard;
                if let Err(e) = worker.handle_clipboard_change(&content).await {
                    log::error!("❌ 处理剪贴板变化失败: {}", e);
                }
            });
        });
    }

    /// 停止监控，幂等
    pub fn stop(&self) {
        self.monitor.stop();
    }

    pub fn is_active(&self) -> bool {
        self.monitor.is_active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn busy_guard_is_exclusive_until_dropped() {
        let flag = Arc::new(AtomicBool::new(false));

        let first = BusyGuard::try_acquire(&flag);
        assert!(first.is_some());
        assert!(BusyGuard::try_acquire(&flag).is_none());

        drop(first);
        assert!(BusyGuard::try_acquire(&flag).is_some());
    }

    #[test]
    fn busy_guard_releases_on_panic_unwind() {
        let flag = Arc::new(AtomicBool::new(false));

        let flag_in_panic = Arc::clone(&flag);
        let result = std::panic::catch_unwind(move || {
            let _guard = BusyGuard::try_acquire(&flag_in_panic).unwrap();
            panic!("模拟任务崩溃");
        });

        assert!(result.is_err());
        assert!(BusyGuard::try_acquire(&flag).is_some());
    }
}
