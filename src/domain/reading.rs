// ==========================================
// 设备状态监测系统 - 巡检读数
// ==========================================
// 职责: 单台设备单次巡检的规范化表示
// 红线: 读数创建后不可变,历史只追加
// ==========================================

use crate::domain::types::{EquipmentId, FlagLevel};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// Reading - 巡检读数
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub timestamp: NaiveDate,                          // 巡检日期
    pub area: String,                                  // 区域
    pub equipment: EquipmentId,                        // 设备标识
    pub is_running: bool,                              // 是否运行
    #[serde(default)]
    pub high_priority: bool,                           // 重点关注（仅展示用,不影响判定）
    #[serde(default)]
    pub channel_values: BTreeMap<String, f64>,         // 通道名 → 数值
    #[serde(default)]
    pub qualitative_flags: BTreeMap<String, FlagLevel>, // 标志名 → 等级 (如 "DE Oil Level")
    #[serde(default)]
    pub notes: BTreeMap<String, String>,               // 自由文本列 (Observation / Leakage ...)
}

impl Reading {
    /// 创建读数（无通道值）
    pub fn new(
        timestamp: NaiveDate,
        area: impl Into<String>,
        equipment: impl Into<String>,
        is_running: bool,
    ) -> Self {
        Self {
            timestamp,
            area: area.into(),
            equipment: equipment.into(),
            is_running,
            high_priority: false,
            channel_values: BTreeMap::new(),
            qualitative_flags: BTreeMap::new(),
            notes: BTreeMap::new(),
        }
    }

    pub fn with_channel(mut self, channel: impl Into<String>, value: f64) -> Self {
        self.channel_values.insert(channel.into(), value);
        self
    }

    pub fn with_flag(mut self, flag: impl Into<String>, level: FlagLevel) -> Self {
        self.qualitative_flags.insert(flag.into(), level);
        self
    }

    pub fn with_note(mut self, column: impl Into<String>, text: impl Into<String>) -> Self {
        self.notes.insert(column.into(), text.into());
        self
    }

    pub fn with_high_priority(mut self, high_priority: bool) -> Self {
        self.high_priority = high_priority;
        self
    }

    pub fn channel_value(&self, channel: &str) -> Option<f64> {
        self.channel_values.get(channel).copied()
    }

    /// 处于 Low 等级的定性标志（按标志名排序）
    pub fn low_flags(&self) -> impl Iterator<Item = &str> {
        self.qualitative_flags
            .iter()
            .filter(|(_, level)| **level == FlagLevel::Low)
            .map(|(name, _)| name.as_str())
    }
}
