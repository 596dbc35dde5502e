//! # 剪贴板联系号码转换工具 — 库入口
//!
//! ## 架构总览
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │                     main (tokio)                       │
//! │   加载配置 ── 选择引擎 ── 订阅通知 ── Ctrl-C 收尾       │
//! └────────┬───────────────────────────────────────────────┘
//!          ↕
//! ┌────────┼───────────────────────────────────────────────┐
//! │        ↕                后台链路                        │
//! │                                                        │
//! │  ┌─ monitor ──── 定时轮询（interval + Notify 停机）     │
//! │  │      │  变了且非空白                                │
//! │  ├─ pipeline ─── 在途守卫 → 校验 → 转换 → 写回 → 通知  │
//! │  │      ├─ validator   11+分隔符+4 结构校验（纯函数）   │
//! │  │      ├─ converter   规则查找 + 引擎调度 + 超时总闸   │
//! │  │      │      └─ engine   内置中文数字 / HTTP 远程    │
//! │  │      ├─ clipboard   arboard 端口 + 基线所有权        │
//! │  │      └─ notify      内存通知记录（最新在前）         │
//! │  │                                                     │
//! │  ├─ settings ─── settings.json（serde camelCase）       │
//! │  └─ error ────── AppError / ConvertError 两级错误       │
//! └────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`error`] | 统一错误类型 `AppError`，管线与入口的返回类型 |
//! | [`clipboard`] | 剪贴板端口抽象、arboard 实现、基线维护 |
//! | [`validator`] | 联系号码结构校验（11 位 + 分隔符 + 4 位） |
//! | [`engine`] | 转换引擎 trait、内置中文数字引擎、HTTP 远程引擎 |
//! | [`converter`] | 分隔符表 / 规则表持有与引擎调度 |
//! | [`monitor`] | 剪贴板轮询、变化检测、启停控制 |
//! | [`pipeline`] | 端到端链路组装与在途转换守卫 |
//! | [`notify`] | 内存通知记录与订阅分发 |
//! | [`settings`] | JSON 配置的加载、默认值与保存 |

pub mod error;

pub mod clipboard;
pub mod converter;
pub mod engine;
pub mod monitor;
pub mod notify;
pub mod pipeline;
pub mod settings;
pub mod validator;
