// ==========================================
// 设备状态监测系统 - 配置层
// ==========================================
// 职责: 阈值目录加载（可替换、带版本） + 运行配置
// 红线: 目录只在启动时加载一次,运行期只读
// ==========================================

pub mod catalog_loader;
pub mod default_catalog;
pub mod settings;

// 重导出
pub use catalog_loader::{catalog_to_json, load_catalog_file, parse_catalog, CatalogFile};
pub use default_catalog::{legacy_catalog, plant_catalog};
pub use settings::{default_catalog_path, load_catalog, LogFormat, MonitorSettings};
