// ==========================================
// 设备状态监测系统 - 偏差评估引擎
// ==========================================
// 职责: 单条读数 × 设备阈值集合 → 越限通道列表
// 输入: Reading + ThresholdCatalog
// 输出: Deviation (越限明细 + 数据质量告警)
// ==========================================
// 红线: 停机设备不评估
// 红线: 目录有而读数缺失的通道不得视为合格
// 红线: 各通道独立判定,只用本通道自己的阈值
// ==========================================

use crate::domain::deviation::{
    ChannelViolation, DataQualityKind, DataQualityWarning, Deviation,
};
use crate::domain::reading::Reading;
use crate::domain::threshold::ThresholdCatalog;
use crate::engine::error::{EngineError, EngineResult};
use tracing::{debug, instrument};

// ==========================================
// DeviationEvaluator - 偏差评估引擎
// ==========================================
pub struct DeviationEvaluator {
    // 无状态引擎,目录由调用方按引用传入
}

impl DeviationEvaluator {
    pub fn new() -> Self {
        Self {}
    }

    /// 评估单条读数
    ///
    /// # 参数
    /// - `reading`: 巡检读数（必须为运行状态）
    /// - `catalog`: 阈值目录
    ///
    /// # 返回
    /// - Ok(Deviation): 越限通道按目录定义顺序排列;可能为空
    /// - Err(NotRunning): 读数为停机占位值
    /// - Err(UnknownEquipment): 设备不在目录中
    #[instrument(
        skip(self, reading, catalog),
        fields(equipment = %reading.equipment, date = %reading.timestamp)
    )]
    pub fn evaluate(
        &self,
        reading: &Reading,
        catalog: &ThresholdCatalog,
    ) -> EngineResult<Deviation> {
        if !reading.is_running {
            return Err(EngineError::NotRunning {
                equipment: reading.equipment.clone(),
                date: reading.timestamp,
            });
        }

        let channel_set = catalog
            .lookup(&reading.equipment)
            .ok_or_else(|| EngineError::UnknownEquipment {
                equipment: reading.equipment.clone(),
            })?;

        let mut violated_channels = Vec::new();
        let mut warnings = Vec::new();

        for threshold in channel_set.channels() {
            match reading.channel_value(threshold.name()) {
                Some(observed) if threshold.contains(observed) => {}
                Some(observed) => violated_channels.push(ChannelViolation {
                    channel: threshold.name().to_string(),
                    observed,
                    min: threshold.min(),
                    max: threshold.max(),
                    kind: threshold.kind(),
                }),
                None => warnings.push(DataQualityWarning {
                    equipment: reading.equipment.clone(),
                    date: reading.timestamp,
                    channel: threshold.name().to_string(),
                    kind: DataQualityKind::MissingChannelData,
                }),
            }
        }

        // 目录未定义的通道不参与判定
        for channel in reading.channel_values.keys() {
            if channel_set.get(channel).is_none() {
                debug!(channel = %channel, "通道不在阈值目录中,忽略");
            }
        }

        debug!(
            violations = violated_channels.len(),
            missing = warnings.len(),
            "读数评估完成"
        );

        Ok(Deviation {
            reading: reading.clone(),
            violated_channels,
            warnings,
        })
    }
}

impl Default for DeviationEvaluator {
    fn default() -> Self {
        Self::new()
    }
}
