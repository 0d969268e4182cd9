// ==========================================
// 设备状态监测系统 - 核心库
// ==========================================
// 职责: 旋转设备巡检读数 → 阈值偏差评估 → 维护建议
// 技术栈: Rust + tokio + CSV
// 系统定位: 决策支持系统 (建议仅供维护人员参考)
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 偏差判定与汇总
pub mod engine;

// 导入层 - 外部数据
pub mod importer;

// 配置层 - 阈值目录与运行配置
pub mod config;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{ChannelKind, EquipmentId, FlagLevel, Severity};

// 领域实体
pub use domain::{
    ChannelThreshold, DataQualityWarning, Deviation, Reading, Recommendation, ThresholdCatalog,
};

// 引擎
pub use engine::{
    build_report, DeviationEvaluator, DeviationReport, KpiCalculator, RecommendationGenerator,
    ReportBuilder,
};

// 导入
pub use importer::{CsvFileSource, ReadingSource};

// API
pub use api::{ReportApi, ReportResponse};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "设备状态监测系统";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
