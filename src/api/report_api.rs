// ==========================================
// 设备状态监测系统 - 报表 API
// ==========================================
// 职责: 数据源 + 阈值目录 → 偏差报表 / 看板指标 / 重点设备 / 单设备历史
// 架构: API 层 → ReadingSource（异步拉取） → Engine 层（纯计算）
// 红线: 日期区间在拉取数据之前校验;目录在构造时注入,运行期只读
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::settings::MonitorSettings;
use crate::domain::reading::Reading;
use crate::domain::threshold::ThresholdCatalog;
use crate::engine::error::EngineError;
use crate::engine::kpi::{KpiCalculator, KpiSummary};
use crate::engine::report::{DeviationReport, ReportBuilder};
use crate::engine::selection::{equipment_history, select_high_priority, DateWindow};
use crate::importer::dq_validator::DqViolation;
use crate::importer::reading_mapper::ImportOutcome;
use crate::importer::source::ReadingSource;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

// ==========================================
// ReportResponse - 报表响应
// ==========================================
/// 报表响应（报表本身不含时间戳,保持引擎输出确定性）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportResponse {
    pub report_id: String,
    pub generated_at: DateTime<Utc>,
    pub catalog_version: String,
    pub report: DeviationReport,
    /// 导入阶段的数据质量问题（拒收行 + 警告）
    pub rejections: Vec<DqViolation>,
}

// ==========================================
// ReportApi - 报表 API
// ==========================================
pub struct ReportApi {
    catalog: Arc<ThresholdCatalog>,
    source: Arc<dyn ReadingSource>,
    settings: MonitorSettings,
    builder: ReportBuilder,
    kpi: KpiCalculator,
}

impl ReportApi {
    /// 创建新的 ReportApi 实例
    ///
    /// # 参数
    /// - catalog: 阈值目录（启动时加载）
    /// - source: 读数数据源
    /// - settings: 运行配置（报表窗口、拉取超时）
    pub fn new(
        catalog: Arc<ThresholdCatalog>,
        source: Arc<dyn ReadingSource>,
        settings: MonitorSettings,
    ) -> Self {
        Self {
            catalog,
            source,
            settings,
            builder: ReportBuilder::new(),
            kpi: KpiCalculator::new(),
        }
    }

    pub fn catalog(&self) -> &ThresholdCatalog {
        &self.catalog
    }

    // ==========================================
    // 偏差报表
    // ==========================================

    /// 生成指定日期区间的偏差报表
    ///
    /// # 参数
    /// - start_date / end_date: 闭区间
    ///
    /// # 返回
    /// - Ok(ReportResponse): 报表（可能为空,空报表表示无异常）
    /// - Err(ApiError::Engine(InvertedDateRange)): 区间倒置
    /// - Err(ApiError::FetchTimeout / Import): 数据源不可用
    #[instrument(skip(self), fields(source = %self.source.name()))]
    pub async fn generate_report(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> ApiResult<ReportResponse> {
        let window = DateWindow::new(start_date, end_date)?;
        self.report_for_window(window).await
    }

    /// 周报: 以 today 为终点的配置窗口（默认 7 天）
    ///
    /// # 返回
    /// - Err(ApiError::Engine(WindowOutOfRange)): 窗口起点超出日期范围
    pub async fn weekly_report(&self, today: NaiveDate) -> ApiResult<ReportResponse> {
        let window = DateWindow::trailing(today, self.settings.report_window_days)?;
        self.report_for_window(window).await
    }

    async fn report_for_window(&self, window: DateWindow) -> ApiResult<ReportResponse> {
        let outcome = self.fetch().await?;
        let report = self
            .builder
            .build_for_window(&outcome.readings, &window, &self.catalog);

        info!(
            deviating = report.summary.deviating,
            recommendations = report.recommendations.len(),
            rejected_rows = outcome.rejected_count(),
            "偏差报表生成完成"
        );

        Ok(ReportResponse {
            report_id: Uuid::new_v4().to_string(),
            generated_at: Utc::now(),
            catalog_version: self.catalog.version().to_string(),
            report,
            rejections: outcome.violations,
        })
    }

    // ==========================================
    // 看板查询
    // ==========================================

    /// 看板指标（全部读数）
    ///
    /// # 返回
    /// - Ok(None): 数据源无读数
    pub async fn kpis(&self) -> ApiResult<Option<KpiSummary>> {
        let outcome = self.fetch().await?;
        Ok(self.kpi.calculate(&outcome.readings, &self.catalog))
    }

    /// 区间内标记为重点关注的读数
    pub async fn high_priority(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> ApiResult<Vec<Reading>> {
        let window = DateWindow::new(start_date, end_date)?;
        let outcome = self.fetch().await?;
        Ok(select_high_priority(&outcome.readings, &window)
            .into_iter()
            .cloned()
            .collect())
    }

    /// 单台设备区间历史（含停机记录）
    ///
    /// # 返回
    /// - Err(ApiError::Engine(UnknownEquipment)): 设备不在阈值目录中
    pub async fn equipment_history(
        &self,
        equipment: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> ApiResult<Vec<Reading>> {
        if equipment.trim().is_empty() {
            return Err(ApiError::InvalidInput("设备标识不能为空".to_string()));
        }
        let window = DateWindow::new(start_date, end_date)?;
        if !self.catalog.contains(equipment) {
            return Err(EngineError::UnknownEquipment {
                equipment: equipment.to_string(),
            }
            .into());
        }

        let outcome = self.fetch().await?;
        Ok(equipment_history(&outcome.readings, equipment, &window)
            .into_iter()
            .cloned()
            .collect())
    }

    /// 带超时的数据源拉取
    async fn fetch(&self) -> ApiResult<ImportOutcome> {
        let timeout = self.settings.fetch_timeout;
        match tokio::time::timeout(timeout, self.source.fetch(&self.catalog)).await {
            Ok(result) => Ok(result?),
            Err(_) => {
                warn!(source = %self.source.name(), ?timeout, "读数拉取超时");
                Err(ApiError::FetchTimeout {
                    source_name: self.source.name(),
                    timeout,
                })
            }
        }
    }
}
