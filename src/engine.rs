//! 转换引擎模块
//!
//! # 设计思路
//!
//! 调度层把"转换"看作一次不透明的外部调用：给出候选文本、分隔符表、
//! 前后缀，拿回转换结果。引擎本身可插拔，通过 [`ConvertEngine`]
//! trait 解耦，调度与管线只依赖 trait。
//!
//! 内置引擎 [`ChineseNumeralEngine`] 把号码与分机号各混淆一位数字为
//! 中文数字（如 `12345678901,6789` → `12345六78901,67八9`），直接粘贴
//! 不再是可拨打的号码，但人眼仍能还原。[`HttpEngine`] 则把同一份
//! 请求以 JSON POST 给远程服务，适合规则需要集中维护的场景。
//!
//! # 实现思路
//!
//! - 混淆位置从段中心向两侧挑选，优先避开 `0`/`1`（零、一笔画太少，
//!   肉眼辨识成本高），整段只有 `0`/`1` 时退回到中心位。
//! - 分隔符只参与切分，不参与混淆；多字符 token 不参与切分扫描。
//! - HTTP 引擎的超时挂在 `reqwest` 客户端上，错误按超时 / 连接 /
//!   其他分类映射到 [`ConvertError`]。

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

// ============================================================================
// Request & Error Types
// ============================================================================

/// 一次转换调用的完整入参
///
/// 序列化形状即 HTTP 引擎的请求体。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConvertRequest {
    pub value: String,
    pub separators: Vec<String>,
    pub prefix: String,
    pub suffix: String,
}

/// 转换链路的失败分类
///
/// 管线对这一类错误不做吞没处理：记日志并原样上抛。
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// 引擎构造失败（如 HTTP 客户端无法创建）
    #[error("转换引擎初始化失败: {0}")]
    Init(String),

    /// 请求发送失败或远程返回非 2xx
    #[error("转换请求失败: {0}")]
    Request(String),

    /// 远程响应无法解析
    #[error("转换响应无效: {0}")]
    InvalidResponse(String),

    /// 引擎在限定时间内没有给出结果
    #[error("转换超时（{0}ms 无响应）")]
    Timeout(u64),
}

// ============================================================================
// Engine Abstraction
// ============================================================================

/// 可插拔的转换引擎
#[async_trait]
pub trait ConvertEngine: Send + Sync {
    async fn convert(&self, request: &ConvertRequest) -> Result<String, ConvertError>;
}

// ============================================================================
// Builtin Engine: Chinese Numeral Masking
// ============================================================================

/// 内置引擎：每段混淆一位数字为中文数字
///
/// 纯内存计算，不会失败。
pub struct ChineseNumeralEngine;

#[async_trait]
impl ConvertEngine for ChineseNumeralEngine {
    async fn convert(&self, request: &ConvertRequest) -> Result<String, ConvertError> {
        Ok(mask_value(request))
    }
}

fn digit_to_numeral(digit: char) -> char {
    match digit {
        '0' => '零',
        '1' => '一',
        '2' => '二',
        '3' => '三',
        '4' => '四',
        '5' => '五',
        '6' => '六',
        '7' => '七',
        '8' => '八',
        '9' => '九',
        _ => digit,
    }
}

/// 段内下标按"离中心距离"升序排列，距离相同时靠左的在前
fn center_out_order(len: usize) -> Vec<usize> {
    let center = len / 2;
    let mut order: Vec<usize> = (0..len).collect();
    // sort_by_key 是稳定排序，等距时保持左侧优先
    order.sort_by_key(|&i| i.abs_diff(center));
    order
}

/// 挑选要混淆的下标：中心向外第一个非 0/1 数字，退而求其次任意数字
fn pick_mask_index(chars: &[char]) -> Option<usize> {
    let order = center_out_order(chars.len());
    order
        .iter()
        .copied()
        .find(|&i| chars[i].is_ascii_digit() && chars[i] != '0' && chars[i] != '1')
        .or_else(|| order.iter().copied().find(|&i| chars[i].is_ascii_digit()))
}

/// 把段内一位数字替换为中文数字；没有数字则原样返回
fn mask_segment(segment: &str) -> String {
    if segment.is_empty() {
        return String::new();
    }

    let mut chars: Vec<char> = segment.chars().collect();
    match pick_mask_index(&chars) {
        Some(i) => {
            chars[i] = digit_to_numeral(chars[i]);
            chars.into_iter().collect()
        }
        None => segment.to_string(),
    }
}

/// 整体转换：按第一个命中的单字符分隔符切成两段，各自混淆后拼回
///
/// 扫描方向是候选文本自身的字符顺序，不是分隔符表顺序。
fn mask_value(request: &ConvertRequest) -> String {
    let tokens: Vec<char> = request
        .separators
        .iter()
        .filter_map(|token| single_char(token))
        .collect();

    if let Some(sep) = request.value.chars().find(|c| tokens.contains(c)) {
        if let Some((contact, extension)) = request.value.split_once(sep) {
            return format!(
                "{}{}{}{}{}",
                request.prefix,
                mask_segment(contact),
                sep,
                mask_segment(extension),
                request.suffix
            );
        }
    }

    format!(
        "{}{}{}",
        request.prefix,
        mask_segment(&request.value),
        request.suffix
    )
}

fn single_char(token: &str) -> Option<char> {
    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

// ============================================================================
// HTTP Engine
// ============================================================================

/// 远程转换引擎：把 [`ConvertRequest`] POST 给配置的服务地址
///
/// 期望响应体形如 `{"result": "..."}`。
pub struct HttpEngine {
    client: reqwest::Client,
    url: String,
    timeout_ms: u64,
}

#[derive(Debug, Deserialize)]
struct ConvertResponse {
    result: String,
}

impl HttpEngine {
    pub fn new(url: &str, timeout_ms: u64) -> Result<Self, ConvertError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| ConvertError::Init(format!("无法创建 HTTP 客户端：{}", e)))?;

        Ok(Self {
            client,
            url: url.to_string(),
            timeout_ms,
        })
    }

    fn map_reqwest_error(&self, e: reqwest::Error) -> ConvertError {
        if e.is_timeout() {
            ConvertError::Timeout(self.timeout_ms)
        } else if e.is_connect() {
            ConvertError::Request(format!("无法连接转换服务：{}", e))
        } else {
            ConvertError::Request(format!("{}", e))
        }
    }
}

#[async_trait]
impl ConvertEngine for HttpEngine {
    async fn convert(&self, request: &ConvertRequest) -> Result<String, ConvertError> {
        log::debug!("📡 调用远程转换服务 - {}", self.url);

        let response = self
            .client
            .post(&self.url)
            .json(request)
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(e))?;

        if !response.status().is_success() {
            return Err(ConvertError::Request(format!(
                "转换服务返回 HTTP {}",
                response.status().as_u16()
            )));
        }

        let body: ConvertResponse = response
            .json()
            .await
            .map_err(|e| ConvertError::InvalidResponse(format!("{}", e)))?;

        Ok(body.result)
    }
}

// ============================================================================
// Engine Settings & Construction
// ============================================================================

/// 配置文件中的 `engine` 区段
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EngineSettings {
    Builtin,
    #[serde(rename_all = "camelCase")]
    Http {
        url: String,
        #[serde(default = "default_http_timeout_ms")]
        timeout_ms: u64,
    },
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self::Builtin
    }
}

fn default_http_timeout_ms() -> u64 {
    5_000
}

/// 按配置构造引擎实例
pub fn build_engine(settings: &EngineSettings) -> Result<Arc<dyn ConvertEngine>, ConvertError> {
    match settings {
        EngineSettings::Builtin => Ok(Arc::new(ChineseNumeralEngine)),
        EngineSettings::Http { url, timeout_ms } => {
            Ok(Arc::new(HttpEngine::new(url, *timeout_ms)?))
        }
    }
}
