// ==========================================
// 设备状态监测系统 - 偏差与建议
// ==========================================
// 职责: 派生结果对象（每次查询重新计算,不落库）
// ==========================================

use crate::domain::reading::Reading;
use crate::domain::types::{ChannelKind, EquipmentId, Severity};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// ChannelViolation - 单通道越限明细
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelViolation {
    pub channel: String,
    pub observed: f64,
    pub min: f64,
    pub max: f64,
    pub kind: ChannelKind,
}

impl ChannelViolation {
    /// 是否高于上限（否则低于下限）
    pub fn is_above(&self) -> bool {
        self.observed > self.max
    }
}

// ==========================================
// DataQualityWarning - 数据质量告警
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataQualityKind {
    MissingChannelData, // 目录定义了通道,读数缺失
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataQualityWarning {
    pub equipment: EquipmentId,
    pub date: NaiveDate,
    pub channel: String,
    pub kind: DataQualityKind,
}

impl fmt::Display for DataQualityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            DataQualityKind::MissingChannelData => write!(
                f,
                "{} ({}): {} has no recorded value",
                self.equipment, self.date, self.channel
            ),
        }
    }
}

// ==========================================
// Deviation - 单条读数的评估结果
// ==========================================
// violated_channels 按目录定义顺序排列
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deviation {
    pub reading: Reading,
    pub violated_channels: Vec<ChannelViolation>,
    #[serde(default)]
    pub warnings: Vec<DataQualityWarning>,
}

impl Deviation {
    pub fn has_violations(&self) -> bool {
        !self.violated_channels.is_empty()
    }

    pub fn violated_channel_names(&self) -> Vec<&str> {
        self.violated_channels
            .iter()
            .map(|v| v.channel.as_str())
            .collect()
    }
}

// ==========================================
// Recommendation - 维护建议
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub equipment: EquipmentId,
    pub subject: String, // 触发建议的通道或标志名
    pub message: String,
    pub severity: Severity,
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.equipment, self.message)
    }
}
