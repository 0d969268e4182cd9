// ==========================================
// 设备状态监测系统 - 数据质量校验器
// ==========================================
// 职责: 在读数进入评估引擎前拦截物理上不可能的数值
// 说明: 评估引擎假定输入已清洗,这里是唯一的拦截点
// ==========================================

use crate::domain::reading::Reading;
use crate::domain::threshold::ThresholdCatalog;
use crate::domain::types::ChannelKind;
use crate::importer::error::ImportError;
use serde::{Deserialize, Serialize};

// ==========================================
// DqLevel - 数据质量级别
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DqLevel {
    Error,   // 错误（拒收该行）
    Warning, // 警告（接收,仅记录）
}

// ==========================================
// DqViolation - 数据质量问题明细
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DqViolation {
    pub row_number: usize,
    pub equipment: Option<String>,
    pub level: DqLevel,
    pub field: String,
    pub message: String,
}

pub struct PhysicalRangeValidator {}

impl PhysicalRangeValidator {
    pub fn new() -> Self {
        Self {}
    }

    /// 校验单条读数
    ///
    /// 仅校验运行中的读数;停机读数为占位值,不进入评估
    pub fn validate(
        &self,
        row_number: usize,
        reading: &Reading,
        catalog: &ThresholdCatalog,
    ) -> Vec<DqViolation> {
        let mut violations = Vec::new();
        if !reading.is_running {
            return violations;
        }

        for (channel, value) in &reading.channel_values {
            let kind = match catalog
                .channel_kind(channel)
                .or_else(|| ChannelKind::infer(channel))
            {
                Some(kind) => kind,
                None => continue,
            };

            let (min, max) = kind.physical_limits();
            if *value < min || *value > max {
                let err = ImportError::ValueRangeError {
                    row: row_number,
                    field: channel.clone(),
                    value: *value,
                    min,
                    max,
                };
                violations.push(DqViolation {
                    row_number,
                    equipment: Some(reading.equipment.clone()),
                    level: DqLevel::Error,
                    field: channel.clone(),
                    message: format!("{} {}", err, kind.unit()),
                });
            }
        }

        // 运行中但全部通道为 0,疑似按停机录入
        let all_zero = reading.channel_values.values().all(|v| *v == 0.0);
        if !reading.channel_values.is_empty() && all_zero {
            violations.push(DqViolation {
                row_number,
                equipment: Some(reading.equipment.clone()),
                level: DqLevel::Warning,
                field: "Is Running".to_string(),
                message: "设备标记为运行,但所有通道读数为 0".to_string(),
            });
        }

        violations
    }
}

impl Default for PhysicalRangeValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::threshold::ChannelThreshold;
    use chrono::NaiveDate;

    fn catalog() -> ThresholdCatalog {
        ThresholdCatalog::builder("test")
            .equipment(
                "P-1",
                None,
                vec![ChannelThreshold::new(
                    "P-1",
                    "Driving End Temp",
                    ChannelKind::Temperature,
                    0.0,
                    70.0,
                )
                .unwrap()],
            )
            .unwrap()
            .build()
    }

    fn reading(running: bool) -> Reading {
        let day = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        Reading::new(day, "1670", "P-1", running)
    }

    #[test]
    fn test_negative_temperature_rejected() {
        let r = reading(true).with_channel("Driving End Temp", -5.0);
        let violations = PhysicalRangeValidator::new().validate(3, &r, &catalog());

        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].level, DqLevel::Error);
        assert_eq!(violations[0].row_number, 3);
        assert_eq!(violations[0].field, "Driving End Temp");
        assert_eq!(
            violations[0].message,
            "数值超出物理范围 (行 3, 字段 Driving End Temp): 值 -5 超出范围 [0, 200] °C"
        );
    }

    #[test]
    fn test_vibration_limit_by_name() {
        let r = reading(true)
            .with_channel("Driving End Temp", 40.0)
            .with_channel("Gearbox RMS Velocity (mm/s)", 150.0);
        let violations = PhysicalRangeValidator::new().validate(1, &r, &catalog());

        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "Gearbox RMS Velocity (mm/s)");
    }

    #[test]
    fn test_unknown_kind_not_checked() {
        let r = reading(true)
            .with_channel("Driving End Temp", 40.0)
            .with_channel("Displacement (µm)", 5000.0);
        assert!(PhysicalRangeValidator::new().validate(1, &r, &catalog()).is_empty());
    }

    #[test]
    fn test_stopped_reading_not_checked() {
        let r = reading(false).with_channel("Driving End Temp", -5.0);
        assert!(PhysicalRangeValidator::new().validate(1, &r, &catalog()).is_empty());
    }

    #[test]
    fn test_running_all_zero_warning() {
        let r = reading(true).with_channel("Driving End Temp", 0.0);
        let violations = PhysicalRangeValidator::new().validate(1, &r, &catalog());

        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].level, DqLevel::Warning);
    }
}
