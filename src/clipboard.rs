//! 剪贴板端口模块
//!
//! # 设计思路
//!
//! 监控与管线只面对 [`ClipboardPort`] 这个窄接口：读、写、基线三件事。
//! 系统实现 [`SystemClipboard`] 背后是 `arboard`，测试里可以换成
//! 内存实现，整条链路不需要真实剪贴板。
//!
//! "基线"（上次已知内容）归端口所有：监控检测到新内容、写回成功，
//! 都只通过 `set_last_known` 推进它。写入失败时基线保持原值，
//! 下一轮重试仍然面对同一个检测值。
//!
//! # 实现思路
//!
//! - 每次操作新建 `arboard::Clipboard` 句柄，用完即弃，不持有长连接。
//! - 进程级操作锁串行化所有剪贴板访问：监控读与管线写跑在不同的
//!   tokio 线程上，平台剪贴板不接受并发打开。
//! - 读失败从不上抛：空剪贴板 / 非文本内容是常态，返回空串并记
//!   debug 日志；其余错误返回空串并记 warn 日志。写失败才上抛。

use std::sync::{Mutex, MutexGuard};

use once_cell::sync::Lazy;

use crate::error::AppError;

/// 进程级剪贴板操作锁
static CLIPBOARD_OP_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

fn op_guard() -> MutexGuard<'static, ()> {
    match CLIPBOARD_OP_LOCK.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            log::warn!("剪贴板操作锁中毒，继续使用恢复数据");
            poisoned.into_inner()
        }
    }
}

/// 剪贴板访问端口
pub trait ClipboardPort: Send + Sync {
    /// 用当前剪贴板内容初始化基线
    ///
    /// 启动时已有的内容只作基线、不触发转换。空剪贴板按空串基线
    /// 处理，同样算成功；只有真实错误才返回 `false`，且只记日志。
    fn initialize(&self) -> bool;

    /// 读取当前文本内容，失败时返回空串
    fn read(&self) -> String;

    /// 写入文本内容，成功后推进基线
    fn write(&self, content: &str) -> Result<(), AppError>;

    /// 上次已知内容
    fn last_known(&self) -> String;

    /// 推进基线（唯一的基线写入口）
    fn set_last_known(&self, content: &str);
}

/// 系统剪贴板实现
pub struct SystemClipboard {
    last_known: Mutex<String>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self {
            last_known: Mutex::new(String::new()),
        }
    }

    fn lock_baseline(&self) -> MutexGuard<'_, String> {
        match self.last_known.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                log::warn!("剪贴板基线锁中毒，继续使用恢复数据");
                poisoned.into_inner()
            }
        }
    }

    fn read_text() -> Result<String, arboard::Error> {
        let _op = op_guard();
        let mut clipboard = arboard::Clipboard::new()?;
        clipboard.get_text()
    }
}

impl Default for SystemClipboard {
    fn default() -> Self {
        Self::new()
    }
}

impl ClipboardPort for SystemClipboard {
    fn initialize(&self) -> bool {
        match Self::read_text() {
            Ok(content) => {
                log::info!("📋 剪贴板基线已初始化 - {} 字符", content.chars().count());
                self.set_last_known(&content);
                true
            }
            Err(arboard::Error::ContentNotAvailable) => {
                log::info!("📋 剪贴板为空，基线按空串初始化");
                self.set_last_known("");
                true
            }
            Err(e) => {
                log::error!("❌ 剪贴板基线初始化失败: {}", e);
                false
            }
        }
    }

    fn read(&self) -> String {
        match Self::read_text() {
            Ok(content) => content,
            Err(arboard::Error::ContentNotAvailable) => {
                log::debug!("剪贴板无文本内容");
                String::new()
            }
            Err(e) => {
                log::warn!("读取剪贴板失败: {}", e);
                String::new()
            }
        }
    }

    fn write(&self, content: &str) -> Result<(), AppError> {
        {
            let _op = op_guard();
            let mut clipboard = arboard::Clipboard::new()
                .map_err(|e| AppError::Clipboard(format!("无法访问剪贴板: {}", e)))?;
            clipboard
                .set_text(content)
                .map_err(|e| AppError::Clipboard(format!("写入剪贴板失败: {}", e)))?;
        }

        // 写入成功才推进基线，失败时旧基线保持原值
        self.set_last_known(content);
        log::debug!("📋 已写回剪贴板 - {} 字符", content.chars().count());
        Ok(())
    }

    fn last_known(&self) -> String {
        self.lock_baseline().clone()
    }

    fn set_last_known(&self, content: &str) {
        let mut baseline = self.lock_baseline();
        *baseline = content.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn baseline_starts_empty_and_tracks_updates() {
        let clipboard = SystemClipboard::new();
        assert_eq!(clipboard.last_known(), "");

        clipboard.set_last_known("12345678901,6789");
        assert_eq!(clipboard.last_known(), "12345678901,6789");

        clipboard.set_last_known("");
        assert_eq!(clipboard.last_known(), "");
    }

    #[test]
    fn port_is_usable_as_trait_object() {
        let port: Arc<dyn ClipboardPort> = Arc::new(SystemClipboard::new());
        port.set_last_known("基线");
        assert_eq!(port.last_known(), "基线");
    }
}
