// ==========================================
// 设备状态监测系统 - 阈值目录错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 阈值目录构建/加载错误
#[derive(Error, Debug)]
pub enum CatalogError {
    // ===== 阈值定义错误 =====
    #[error("阈值区间倒置 (设备 {equipment}, 通道 {channel}): min={min} > max={max}")]
    InvertedBand {
        equipment: String,
        channel: String,
        min: f64,
        max: f64,
    },

    #[error("阈值不是有限数值 (设备 {equipment}, 通道 {channel})")]
    NonFiniteBound { equipment: String, channel: String },

    #[error("无法推断通道类型 (设备 {equipment}, 通道 {channel})，请显式指定 kind")]
    UnknownChannelKind { equipment: String, channel: String },

    // ===== 唯一性错误 =====
    #[error("设备重复定义: {0}")]
    DuplicateEquipment(String),

    #[error("通道重复定义 (设备 {equipment}): {channel}")]
    DuplicateChannel { equipment: String, channel: String },

    #[error("设备标识为空")]
    EmptyEquipmentId,

    // ===== 文件错误 =====
    #[error("目录文件读取失败 ({path}): {message}")]
    FileReadError { path: String, message: String },

    #[error("目录文件格式错误: {0}")]
    FormatError(#[from] serde_json::Error),
}

/// Result 类型别名
pub type CatalogResult<T> = Result<T, CatalogError>;
