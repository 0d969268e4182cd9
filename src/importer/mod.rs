// ==========================================
// 设备状态监测系统 - 导入层
// ==========================================
// 职责: 外部巡检日志 → 已校验的 Reading 序列
// 支持: CSV 文件, 内存读数, 多源组合
// ==========================================

// 模块声明
pub mod dq_validator;
pub mod error;
pub mod file_parser;
pub mod reading_mapper;
pub mod source;

// 重导出核心类型
pub use dq_validator::{DqLevel, DqViolation, PhysicalRangeValidator};
pub use error::{ImportError, ImportResult};
pub use file_parser::{CsvParser, RawRow};
pub use reading_mapper::{ImportOutcome, ReadingMapper};

// 重导出 Trait 接口
pub use source::{CombinedSource, CsvFileSource, ReadingSource, StaticSource};
