// ==========================================
// 设备状态监测系统 - 维护建议生成
// ==========================================
// 职责: Deviation → 可读的维护建议
// 输出顺序: 越限通道（目录顺序） → Low 标志（标志名顺序）
// ==========================================

use crate::domain::deviation::{ChannelViolation, Deviation, Recommendation};
use crate::domain::types::Severity;

/// 油位低提示语
pub const LOW_OIL_MESSAGE: &str = "Oil level is low. Consider refilling.";

// ==========================================
// RecommendationGenerator - 建议生成器
// ==========================================
pub struct RecommendationGenerator {}

impl RecommendationGenerator {
    pub fn new() -> Self {
        Self {}
    }

    /// 生成维护建议
    ///
    /// 每个越限通道一条;每个等级为 Low 的定性标志一条（与数值是否越限无关）。
    /// 无越限且无 Low 标志时返回空列表,由调用方展示为"无异常"。
    pub fn recommend(&self, deviation: &Deviation) -> Vec<Recommendation> {
        let equipment = &deviation.reading.equipment;

        let numeric = deviation
            .violated_channels
            .iter()
            .map(|violation| Recommendation {
                equipment: equipment.clone(),
                subject: violation.channel.clone(),
                message: Self::out_of_range_message(violation),
                severity: Severity::from(violation.kind),
            });

        let flags = deviation.reading.low_flags().map(|flag| Recommendation {
            equipment: equipment.clone(),
            subject: flag.to_string(),
            message: LOW_OIL_MESSAGE.to_string(),
            severity: Severity::Oil,
        });

        numeric.chain(flags).collect()
    }

    /// "{通道} is outside the range {min} - {max} {单位}."
    fn out_of_range_message(violation: &ChannelViolation) -> String {
        format!(
            "{} is outside the range {} - {} {}.",
            channel_label(&violation.channel),
            violation.min,
            violation.max,
            violation.kind.unit()
        )
    }
}

impl Default for RecommendationGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// 去掉通道名末尾的括号单位: "RMS Velocity (mm/s)" → "RMS Velocity"
pub fn channel_label(channel: &str) -> &str {
    let trimmed = channel.trim_end();
    if trimmed.ends_with(')') {
        if let Some(idx) = trimmed.rfind(" (") {
            return &trimmed[..idx];
        }
    }
    trimmed
}
