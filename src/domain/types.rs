// ==========================================
// 设备状态监测系统 - 领域类型定义
// ==========================================
// 职责: 通道类型 / 定性标志等级 / 建议严重度
// 红线: 枚举即口径,不做隐式单位换算
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 设备标识（阈值目录与读数共用的主键）
pub type EquipmentId = String;

// ==========================================
// 测量通道类型 (Channel Kind)
// ==========================================
// 序列化格式: SCREAMING_SNAKE_CASE (与目录文件一致)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChannelKind {
    Temperature, // 轴承温度
    Vibration,   // RMS 振动速度
}

impl ChannelKind {
    /// 显示单位
    pub fn unit(&self) -> &'static str {
        match self {
            ChannelKind::Temperature => "°C",
            ChannelKind::Vibration => "mm/s",
        }
    }

    /// 物理可信区间（仅用于导入边界校验,不参与阈值判定）
    ///
    /// 与现场录入表单的上下限一致: 温度 0~200 °C, 振动 0~100 mm/s
    pub fn physical_limits(&self) -> (f64, f64) {
        match self {
            ChannelKind::Temperature => (0.0, 200.0),
            ChannelKind::Vibration => (0.0, 100.0),
        }
    }

    /// 根据通道名称推断类型
    ///
    /// # 返回
    /// - Some(kind): 名称包含 `Temp` / `RMS` / `Velocity`
    /// - None: 无法推断,由调用方决定如何处理
    pub fn infer(channel_name: &str) -> Option<Self> {
        if channel_name.contains("Temp") {
            Some(ChannelKind::Temperature)
        } else if channel_name.contains("RMS") || channel_name.contains("Velocity") {
            Some(ChannelKind::Vibration)
        } else {
            None
        }
    }
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelKind::Temperature => write!(f, "TEMPERATURE"),
            ChannelKind::Vibration => write!(f, "VIBRATION"),
        }
    }
}

// ==========================================
// 定性标志等级 (Flag Level)
// ==========================================
// 用于油位等非数值巡检项
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlagLevel {
    Normal,
    Low,
    High,
}

impl fmt::Display for FlagLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlagLevel::Normal => write!(f, "Normal"),
            FlagLevel::Low => write!(f, "Low"),
            FlagLevel::High => write!(f, "High"),
        }
    }
}

impl FromStr for FlagLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "normal" => Ok(FlagLevel::Normal),
            "low" => Ok(FlagLevel::Low),
            "high" => Ok(FlagLevel::High),
            other => Err(format!("未知的标志等级: {}", other)),
        }
    }
}

// ==========================================
// 建议严重度分类 (Severity)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Temperature,
    Vibration,
    Oil,
}

impl From<ChannelKind> for Severity {
    fn from(kind: ChannelKind) -> Self {
        match kind {
            ChannelKind::Temperature => Severity::Temperature,
            ChannelKind::Vibration => Severity::Vibration,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Temperature => write!(f, "temperature"),
            Severity::Vibration => write!(f, "vibration"),
            Severity::Oil => write!(f, "oil"),
        }
    }
}
