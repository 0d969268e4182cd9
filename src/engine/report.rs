// ==========================================
// 设备状态监测系统 - 偏差报表
// ==========================================
// 职责: 读数集合 → 日期窗口 → 运行中 → 目录已知 → 逐条评估 → 汇总
// 输入: Vec<Reading> + 日期区间 + ThresholdCatalog
// 输出: DeviationReport
// ==========================================
// 红线: 筛选顺序固定: (1) 日期 (2) 运行状态 (3) 目录已知
// 红线: 输出保持读数输入顺序;单条读数内保持目录顺序
// 红线: 空结果是合法的"无异常",不是错误
// ==========================================

use crate::domain::deviation::{DataQualityWarning, Deviation, Recommendation};
use crate::domain::reading::Reading;
use crate::domain::threshold::ThresholdCatalog;
use crate::domain::types::EquipmentId;
use crate::engine::error::EngineResult;
use crate::engine::evaluator::DeviationEvaluator;
use crate::engine::recommendation::RecommendationGenerator;
use crate::engine::selection::DateWindow;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

// ==========================================
// 报表结构
// ==========================================

/// 未知设备记录（仅用于展示,不计入合格/不合格）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnknownEquipmentRecord {
    pub equipment: EquipmentId,
    pub area: String,
    pub date: NaiveDate,
}

/// 报表汇总统计
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total_readings: usize, // 输入读数总数
    pub in_window: usize,      // 日期窗口内
    pub running: usize,        // 窗口内且运行中
    pub evaluated: usize,      // 实际参与评估（目录已知）
    pub deviating: usize,      // 存在越限通道
    pub unknown: usize,        // 未知设备
}

/// 偏差报表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviationReport {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub deviations: Vec<Deviation>,
    pub recommendations: Vec<Recommendation>,
    pub data_quality: Vec<DataQualityWarning>,
    pub unknown_equipment: Vec<UnknownEquipmentRecord>,
    pub summary: ReportSummary,
}

impl DeviationReport {
    /// 无越限且无建议
    pub fn is_clean(&self) -> bool {
        self.deviations.is_empty() && self.recommendations.is_empty()
    }

    /// 纯文本建议列表
    pub fn advisories(&self) -> Vec<String> {
        self.recommendations.iter().map(|r| r.to_string()).collect()
    }
}

// ==========================================
// ReportBuilder - 报表构建器
// ==========================================
pub struct ReportBuilder {
    evaluator: DeviationEvaluator,
    generator: RecommendationGenerator,
}

impl ReportBuilder {
    pub fn new() -> Self {
        Self {
            evaluator: DeviationEvaluator::new(),
            generator: RecommendationGenerator::new(),
        }
    }

    /// 构建偏差报表
    ///
    /// # 参数
    /// - `readings`: 读数快照（按输入顺序）
    /// - `start_date` / `end_date`: 闭区间
    /// - `catalog`: 阈值目录
    ///
    /// # 返回
    /// - Err(InvertedDateRange): start_date > end_date,在筛选前拒绝
    pub fn build_report(
        &self,
        readings: &[Reading],
        start_date: NaiveDate,
        end_date: NaiveDate,
        catalog: &ThresholdCatalog,
    ) -> EngineResult<DeviationReport> {
        let window = DateWindow::new(start_date, end_date)?;
        Ok(self.build_for_window(readings, &window, catalog))
    }

    /// 在已校验的窗口上构建报表
    #[instrument(
        skip(self, readings, catalog),
        fields(
            start = %window.start(),
            end = %window.end(),
            catalog_version = %catalog.version()
        )
    )]
    pub fn build_for_window(
        &self,
        readings: &[Reading],
        window: &DateWindow,
        catalog: &ThresholdCatalog,
    ) -> DeviationReport {
        let mut summary = ReportSummary {
            total_readings: readings.len(),
            ..ReportSummary::default()
        };
        let mut deviations = Vec::new();
        let mut recommendations = Vec::new();
        let mut data_quality = Vec::new();
        let mut unknown_equipment = Vec::new();

        for reading in readings {
            // 1. 日期窗口
            if !window.contains(reading.timestamp) {
                continue;
            }
            summary.in_window += 1;

            // 2. 运行状态
            if !reading.is_running {
                continue;
            }
            summary.running += 1;

            // 3. 目录已知
            if !catalog.contains(&reading.equipment) {
                warn!(
                    equipment = %reading.equipment,
                    date = %reading.timestamp,
                    "未知设备,排除出评估"
                );
                unknown_equipment.push(UnknownEquipmentRecord {
                    equipment: reading.equipment.clone(),
                    area: reading.area.clone(),
                    date: reading.timestamp,
                });
                continue;
            }

            // 前置条件已在上面保证,这里的错误分支只做兜底记录
            let deviation = match self.evaluator.evaluate(reading, catalog) {
                Ok(d) => d,
                Err(e) => {
                    warn!("读数评估失败: {}", e);
                    continue;
                }
            };
            summary.evaluated += 1;

            recommendations.extend(self.generator.recommend(&deviation));
            data_quality.extend(deviation.warnings.iter().cloned());

            if deviation.has_violations() {
                summary.deviating += 1;
                deviations.push(deviation);
            }
        }
        summary.unknown = unknown_equipment.len();

        info!(
            total = summary.total_readings,
            evaluated = summary.evaluated,
            deviating = summary.deviating,
            recommendations = recommendations.len(),
            unknown = summary.unknown,
            "偏差报表生成完成"
        );

        DeviationReport {
            start_date: window.start(),
            end_date: window.end(),
            deviations,
            recommendations,
            data_quality,
            unknown_equipment,
            summary,
        }
    }
}

impl Default for ReportBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// 便捷函数: 使用默认构建器生成报表
pub fn build_report(
    readings: &[Reading],
    start_date: NaiveDate,
    end_date: NaiveDate,
    catalog: &ThresholdCatalog,
) -> EngineResult<DeviationReport> {
    ReportBuilder::new().build_report(readings, start_date, end_date, catalog)
}
