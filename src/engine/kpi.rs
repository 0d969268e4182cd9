// ==========================================
// 设备状态监测系统 - 看板指标
// ==========================================
// 职责: 运行率 / 合规率 / 平均温度 / 各区域运行率
// 红线: 停机读数不参与温度与合规统计（占位值为 0）
// ==========================================

use crate::domain::reading::Reading;
use crate::domain::threshold::ThresholdCatalog;
use crate::domain::types::ChannelKind;
use crate::engine::evaluator::DeviationEvaluator;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 区域运行率
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaRunningShare {
    pub area: String,
    pub total: usize,
    pub running: usize,
    pub running_percentage: f64,
}

/// 看板指标汇总
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiSummary {
    pub total_readings: usize,
    pub running_percentage: f64,
    /// 参与评估的运行读数中无越限且无缺失通道的比例;无可评估读数时为 None
    pub compliance_rate: Option<f64>,
    /// 运行读数温度通道均值;无温度数据时为 None
    pub average_temperature: Option<f64>,
    pub running_by_area: Vec<AreaRunningShare>,
}

// ==========================================
// KpiCalculator - 看板指标计算
// ==========================================
pub struct KpiCalculator {
    evaluator: DeviationEvaluator,
}

impl KpiCalculator {
    pub fn new() -> Self {
        Self {
            evaluator: DeviationEvaluator::new(),
        }
    }

    /// 计算看板指标
    ///
    /// # 返回
    /// - None: 读数为空（看板显示"No Data"）
    pub fn calculate(
        &self,
        readings: &[Reading],
        catalog: &ThresholdCatalog,
    ) -> Option<KpiSummary> {
        if readings.is_empty() {
            return None;
        }

        let total = readings.len();
        let running: Vec<&Reading> = readings.iter().filter(|r| r.is_running).collect();

        Some(KpiSummary {
            total_readings: total,
            running_percentage: percentage(running.len(), total),
            compliance_rate: self.compliance_rate(&running, catalog),
            average_temperature: average_temperature(&running, catalog),
            running_by_area: running_by_area(readings),
        })
    }

    fn compliance_rate(&self, running: &[&Reading], catalog: &ThresholdCatalog) -> Option<f64> {
        let mut evaluated = 0usize;
        let mut compliant = 0usize;

        for reading in running {
            if let Ok(deviation) = self.evaluator.evaluate(reading, catalog) {
                evaluated += 1;
                // 缺失通道不能视为在限内
                if !deviation.has_violations() && deviation.warnings.is_empty() {
                    compliant += 1;
                }
            }
        }

        if evaluated == 0 {
            None
        } else {
            Some(percentage(compliant, evaluated))
        }
    }
}

impl Default for KpiCalculator {
    fn default() -> Self {
        Self::new()
    }
}

fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// 温度通道判定: 优先取目录定义,目录未收录时按名称推断
fn is_temperature_channel(channel: &str, catalog: &ThresholdCatalog) -> bool {
    catalog
        .channel_kind(channel)
        .or_else(|| ChannelKind::infer(channel))
        == Some(ChannelKind::Temperature)
}

fn average_temperature(running: &[&Reading], catalog: &ThresholdCatalog) -> Option<f64> {
    let values: Vec<f64> = running
        .iter()
        .flat_map(|r| r.channel_values.iter())
        .filter(|(channel, _)| is_temperature_channel(channel, catalog))
        .map(|(_, value)| *value)
        .collect();

    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

fn running_by_area(readings: &[Reading]) -> Vec<AreaRunningShare> {
    let mut buckets: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
    for reading in readings {
        let entry = buckets.entry(reading.area.as_str()).or_insert((0, 0));
        entry.0 += 1;
        if reading.is_running {
            entry.1 += 1;
        }
    }

    buckets
        .into_iter()
        .map(|(area, (total, running))| AreaRunningShare {
            area: area.to_string(),
            total,
            running,
            running_percentage: percentage(running, total),
        })
        .collect()
}
