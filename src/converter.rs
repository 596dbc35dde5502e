//! 转换调度模块
//!
//! # 设计思路
//!
//! 调度器持有当前生效的分隔符表与转换规则表，负责把一次剪贴板命中
//! 组装成 [`ConvertRequest`] 并交给引擎执行。引擎是注入的
//! `Arc<dyn ConvertEngine>`，调度器不关心它是内置实现还是远程服务。
//!
//! # 实现思路
//!
//! - 分隔符表与规则表放在同一把 `Mutex` 里：读方要么看到旧表、
//!   要么看到新表，不会读到换表换到一半的状态。替换只支持整表换入。
//! - 锁内只做快照拷贝，`await` 之前一定先释放锁。
//! - 引擎调用外面套一层 `tokio::time::timeout`，远程引擎自身的
//!   客户端超时之外再加一道总闸。
//! - 转换失败记日志后原样上抛，由调用方决定收尾。

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::engine::{ConvertEngine, ConvertError, ConvertRequest};

/// 引擎调用总闸的默认值（毫秒）
pub const DEFAULT_ENGINE_TIMEOUT_MS: u64 = 10_000;

/// 转换规则
///
/// `listen_type` 是查找键；`prefix` / `suffix` 缺省时按空串参与转换。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConverterRule {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
    pub listen_type: String,
}

struct DispatchState {
    separators: Vec<String>,
    rules: Vec<ConverterRule>,
}

/// 转换调度器
pub struct ConverterDispatch {
    state: Mutex<DispatchState>,
    engine: Arc<dyn ConvertEngine>,
    timeout_ms: Option<u64>,
}

impl ConverterDispatch {
    /// 创建空表调度器，分隔符与规则随后整表换入
    ///
    /// # 参数
    /// * `engine` - 转换引擎
    /// * `timeout_ms` - 引擎调用总闸，`None` 表示不限时
    pub fn new(engine: Arc<dyn ConvertEngine>, timeout_ms: Option<u64>) -> Self {
        Self {
            state: Mutex::new(DispatchState {
                separators: Vec::new(),
                rules: Vec::new(),
            }),
            engine,
            timeout_ms,
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, DispatchState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                log::warn!("转换调度状态锁中毒，继续使用恢复数据");
                poisoned.into_inner()
            }
        }
    }

    /// 执行一次转换
    ///
    /// 组装请求（分隔符取当前快照，前后缀缺省为空串）后调用引擎。
    /// 失败会先记日志再上抛，永不吞错。
    ///
    /// # 参数
    /// * `value` - 命中的剪贴板文本
    /// * `rule` - 本次使用的转换规则
    pub async fn convert(&self, value: &str, rule: &ConverterRule) -> Result<String, ConvertError> {
        let separators = self.separators();

        let request = ConvertRequest {
            value: value.to_string(),
            separators,
            prefix: rule.prefix.clone().unwrap_or_default(),
            suffix: rule.suffix.clone().unwrap_or_default(),
        };

        log::debug!("🔁 开始转换 - 规则: {}", rule.label);

        let result = match self.timeout_ms {
            Some(ms) => {
                match tokio::time::timeout(Duration::from_millis(ms), self.engine.convert(&request))
                    .await
                {
                    Ok(inner) => inner,
                    Err(_) => Err(ConvertError::Timeout(ms)),
                }
            }
            None => self.engine.convert(&request).await,
        };

        match &result {
            Ok(converted) => log::debug!("✅ 转换完成 - {} → {}", value, converted),
            Err(e) => log::error!("❌ 转换失败 - 规则: {}, 错误: {}", rule.label, e),
        }

        result
    }

    /// 当前规则表快照（保持换入顺序）
    pub fn rules(&self) -> Vec<ConverterRule> {
        self.lock_state().rules.clone()
    }

    /// 按监听类型查找规则，取第一个命中者
    ///
    /// 查不到不是错误，返回 `None` 由调用方决定如何处理。
    pub fn find_by_listen_type(&self, listen_type: &str) -> Option<ConverterRule> {
        self.lock_state()
            .rules
            .iter()
            .find(|rule| rule.listen_type == listen_type)
            .cloned()
    }

    /// 当前分隔符表快照
    pub fn separators(&self) -> Vec<String> {
        self.lock_state().separators.clone()
    }

    /// 整表换入分隔符
    pub fn set_separators(&self, separators: Vec<String>) {
        log::debug!("📝 更新分隔符表 - {} 项", separators.len());
        self.lock_state().separators = separators;
    }

    /// 整表换入转换规则
    pub fn set_rules(&self, rules: Vec<ConverterRule>) {
        log::debug!("📝 更新转换规则表 - {} 项", rules.len());
        self.lock_state().rules = rules;
    }
}
