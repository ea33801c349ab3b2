//! codesplit - 按行数拆分超大源文件、跟踪分片、提供合并视图并重新合并
//!
//! 模块结构：
//! - kernel::split: 元数据表、拆分、合并
//! - kernel::virtual_doc: 合并视图与分片变更通知
//! - kernel::runner: 按扩展名运行合并结果
//! - kernel::services: 配置契约（ports）与 IO 适配（adapters）

pub mod kernel;
