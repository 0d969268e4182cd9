// ==========================================
// 设备状态监测系统 - 内置阈值目录
// ==========================================
// 职责: 随程序发布的阈值标定版本
// 说明: 阈值数据放在 thresholds/*.json,重新标定只改数据文件
// ==========================================

use crate::config::catalog_loader::parse_catalog;
use crate::domain::error::CatalogResult;
use crate::domain::threshold::ThresholdCatalog;

/// 2024.1 标定: 全部设备为 3 通道简易模型
pub const LEGACY_CATALOG_JSON: &str = include_str!("../../thresholds/legacy-2024.1.json");

/// 2025.1 标定: 1670-PA-02A/02B 升级为 16 通道（泵+电机,DE/NDE,三轴 RMS）
pub const PLANT_CATALOG_JSON: &str = include_str!("../../thresholds/plant-2025.1.json");

/// 旧版标定目录
pub fn legacy_catalog() -> CatalogResult<ThresholdCatalog> {
    parse_catalog(LEGACY_CATALOG_JSON)
}

/// 当前标定目录（默认）
pub fn plant_catalog() -> CatalogResult<ThresholdCatalog> {
    parse_catalog(PLANT_CATALOG_JSON)
}
