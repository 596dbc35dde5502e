//! 通知记录模块
//!
//! # 设计思路
//!
//! 每次成功转换都会留下一条通知，供外部观察者（日志、界面）消费。
//! 记录只存内存，进程退出即清空；最新的通知排在最前面。
//!
//! # 实现思路
//!
//! - 条目与观察者表放在同一把锁里，快照后立刻释放；观察者回调在
//!   锁外执行，回调里再进来查数、订阅、退订都不会死锁。
//! - 订阅凭据 [`Subscription`] 析构即退订，持有的是弱引用，
//!   不会把记录本体拖着不放。
//! - 订阅本身不触发回调，只有 `add` / `clear` 这类变更才触发。

use std::sync::{Arc, Mutex, MutexGuard, Weak};

use chrono::{DateTime, Local};
use serde::Serialize;

/// 一条转换通知，创建后不可变
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub message: String,
    pub created_at: DateTime<Local>,
}

type Observer = Arc<dyn Fn(&[Notification]) + Send + Sync>;

struct LogState {
    entries: Vec<Notification>,
    observers: Vec<(u64, Observer)>,
    next_observer_id: u64,
}

/// 内存通知记录，最新在前
pub struct NotificationLog {
    state: Mutex<LogState>,
}

impl NotificationLog {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(LogState {
                entries: Vec::new(),
                observers: Vec::new(),
                next_observer_id: 0,
            }),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, LogState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                log::warn!("通知记录锁中毒，继续使用恢复数据");
                poisoned.into_inner()
            }
        }
    }

    /// 追加一条通知（插入头部）并触发所有观察者
    pub fn add(&self, message: &str) {
        let (snapshot, observers) = {
            let mut state = self.lock_state();
            state.entries.insert(
                0,
                Notification {
                    message: message.to_string(),
                    created_at: Local::now(),
                },
            );
            (state.entries.clone(), Self::observer_snapshot(&state))
        };

        log::info!("🔔 新通知 - {}", message);
        for observer in observers {
            observer(&snapshot);
        }
    }

    /// 清空所有通知并触发所有观察者
    pub fn clear(&self) {
        let observers = {
            let mut state = self.lock_state();
            state.entries.clear();
            Self::observer_snapshot(&state)
        };

        log::debug!("🧹 通知记录已清空");
        for observer in observers {
            observer(&[]);
        }
    }

    /// 当前全部通知的快照，最新在前
    pub fn all(&self) -> Vec<Notification> {
        self.lock_state().entries.clone()
    }

    pub fn count(&self) -> usize {
        self.lock_state().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock_state().entries.is_empty()
    }

    /// 订阅变更：每次 `add` / `clear` 之后收到完整的最新快照
    ///
    /// 订阅时不回放已有内容。返回的凭据析构即退订，也可以调用
    /// [`Subscription::unsubscribe`] 显式退订。
    pub fn subscribe<F>(self: &Arc<Self>, callback: F) -> Subscription
    where
        F: Fn(&[Notification]) + Send + Sync + 'static,
    {
        let id = {
            let mut state = self.lock_state();
            let id = state.next_observer_id;
            state.next_observer_id += 1;
            state.observers.push((id, Arc::new(callback)));
            id
        };

        Subscription {
            log: Arc::downgrade(self),
            id,
        }
    }

    fn observer_snapshot(state: &LogState) -> Vec<Observer> {
        state
            .observers
            .iter()
            .map(|(_, observer)| Arc::clone(observer))
            .collect()
    }

    fn remove_observer(&self, id: u64) {
        self.lock_state()
            .observers
            .retain(|(observer_id, _)| *observer_id != id);
    }
}

impl Default for NotificationLog {
    fn default() -> Self {
        Self::new()
    }
}

/// 订阅凭据，析构即退订
pub struct Subscription {
    log: Weak<NotificationLog>,
    id: u64,
}

impl Subscription {
    /// 显式退订（等价于直接丢弃凭据）
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(log) = self.log.upgrade() {
            log.remove_observer(self.id);
        }
    }
}
