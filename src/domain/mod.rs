// ==========================================
// 设备状态监测系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含 I/O,不含判定逻辑
// ==========================================

pub mod deviation;
pub mod error;
pub mod reading;
pub mod threshold;
pub mod types;

// 重导出核心类型
pub use deviation::{
    ChannelViolation, DataQualityKind, DataQualityWarning, Deviation, Recommendation,
};
pub use error::{CatalogError, CatalogResult};
pub use reading::Reading;
pub use threshold::{ChannelSet, ChannelThreshold, ThresholdCatalog, ThresholdCatalogBuilder};
pub use types::{ChannelKind, EquipmentId, FlagLevel, Severity};
