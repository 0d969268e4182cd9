// ==========================================
// 设备状态监测系统 - 引擎层
// ==========================================
// 职责: 阈值偏差判定 / 建议生成 / 报表汇总
// 红线: 引擎无 I/O、无共享可变状态,同一输入必得同一输出
// ==========================================

pub mod error;
pub mod evaluator;
pub mod kpi;
pub mod recommendation;
pub mod report;
pub mod selection;

// 重导出核心引擎
pub use error::{EngineError, EngineResult};
pub use evaluator::DeviationEvaluator;
pub use kpi::{AreaRunningShare, KpiCalculator, KpiSummary};
pub use recommendation::{channel_label, RecommendationGenerator, LOW_OIL_MESSAGE};
pub use report::{
    build_report, DeviationReport, ReportBuilder, ReportSummary, UnknownEquipmentRecord,
};
pub use selection::{equipment_history, select_high_priority, DateWindow};
