// ==========================================
// 设备状态监测系统 - API 层
// ==========================================
// 职责: 提供报表/看板查询接口与报表导出,供命令行及上层界面调用
// ==========================================

pub mod error;
pub mod export;
pub mod report_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use export::{write_deviation_csv, VIOLATED_CHANNELS_COLUMN};
pub use report_api::{ReportApi, ReportResponse};
