//! 统一错误类型模块
//!
//! # 设计思路
//!
//! 定义全局统一的 `AppError` 枚举，替代各模块中分散的
//! `.map_err(|e| e.to_string())`、`format!(...)` 等不一致模式。
//!
//! 转换链路自带独立的 `ConvertError`（见 [`crate::engine`]），
//! 在管线层通过 `From` 上转为 `AppError`，调用侧可按分支匹配。
//!
//! # 实现思路
//!
//! - 使用 `thiserror` 派生可读错误消息。
//! - 为 `ConvertError` / `std::io::Error` 提供 `From` 转换，无需手动 map。
//! - 后台轮询中的瞬时失败不会出现在这里：按约定它们只记日志、不上抛。

use crate::engine::ConvertError;

/// 应用级统一错误类型
///
/// 管线入口与 `main` 均返回此类型，保证错误格式一致。
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 剪贴板写入失败（读取失败按约定被吞掉，不走此分支）
    #[error("剪贴板操作失败: {0}")]
    Clipboard(String),

    /// 转换引擎调用失败（超时 / 请求错误 / 响应无效）
    #[error("{0}")]
    Convert(#[from] ConvertError),

    /// 配置文件读取或解析失败
    #[error("配置错误: {0}")]
    Config(String),

    /// 文件系统 I/O 错误
    #[error("文件系统错误: {0}")]
    Io(#[from] std::io::Error),
}
