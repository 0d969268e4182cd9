// ==========================================
// 设备状态监测系统 - 读数数据源
// ==========================================
// 职责: 定义读数获取接口,屏蔽数据来源（CSV 文件 / 内存 / 多源组合）
// 红线: 多源组合时保持源的登记顺序,不因并发改变读数顺序
// ==========================================

use crate::domain::reading::Reading;
use crate::domain::threshold::ThresholdCatalog;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::CsvParser;
use crate::importer::reading_mapper::{ImportOutcome, ReadingMapper};
use async_trait::async_trait;
use futures::future::try_join_all;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, instrument};

// ==========================================
// ReadingSource Trait
// ==========================================
// 实现者: CsvFileSource, StaticSource, CombinedSource
#[async_trait]
pub trait ReadingSource: Send + Sync {
    /// 数据源名称（用于日志与错误信息）
    fn name(&self) -> String;

    /// 获取读数
    ///
    /// # 参数
    /// - catalog: 阈值目录（决定哪些列按数值通道严格解析）
    ///
    /// # 返回
    /// - Ok(ImportOutcome): 接收的读数 + 拒收明细
    /// - Err: 数据源整体不可用（文件缺失、格式不支持等）
    async fn fetch(&self, catalog: &ThresholdCatalog) -> ImportResult<ImportOutcome>;
}

// ==========================================
// CsvFileSource - CSV 巡检日志
// ==========================================
pub struct CsvFileSource {
    path: PathBuf,
}

impl CsvFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ReadingSource for CsvFileSource {
    fn name(&self) -> String {
        self.path.display().to_string()
    }

    #[instrument(skip(self, catalog), fields(path = %self.path.display()))]
    async fn fetch(&self, catalog: &ThresholdCatalog) -> ImportResult<ImportOutcome> {
        if self.path.extension().map_or(true, |ext| ext != "csv") {
            let ext = self
                .path
                .extension()
                .map(|e| e.to_string_lossy().to_string())
                .unwrap_or_default();
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => ImportError::FileNotFound(self.name()),
                _ => ImportError::SourceError {
                    source_name: self.name(),
                    message: e.to_string(),
                },
            })?;

        let rows = CsvParser.parse_reader(content.as_bytes())?;
        let total_rows = rows.len();
        let outcome = ReadingMapper::new(catalog).map_rows(rows);

        info!(
            total_rows,
            accepted = outcome.readings.len(),
            rejected = outcome.rejected_count(),
            "CSV 读数导入完成"
        );
        Ok(outcome)
    }
}

// ==========================================
// StaticSource - 内存读数（测试 / 上游已解析）
// ==========================================
pub struct StaticSource {
    name: String,
    readings: Vec<Reading>,
}

impl StaticSource {
    pub fn new(name: impl Into<String>, readings: Vec<Reading>) -> Self {
        Self {
            name: name.into(),
            readings,
        }
    }
}

#[async_trait]
impl ReadingSource for StaticSource {
    fn name(&self) -> String {
        self.name.clone()
    }

    async fn fetch(&self, _catalog: &ThresholdCatalog) -> ImportResult<ImportOutcome> {
        Ok(ImportOutcome {
            readings: self.readings.clone(),
            violations: Vec::new(),
        })
    }
}

// ==========================================
// CombinedSource - 多源组合
// ==========================================
// 并发获取,结果按登记顺序拼接;任一源失败则整体失败
pub struct CombinedSource {
    sources: Vec<Arc<dyn ReadingSource>>,
}

impl CombinedSource {
    pub fn new(sources: Vec<Arc<dyn ReadingSource>>) -> Self {
        Self { sources }
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

#[async_trait]
impl ReadingSource for CombinedSource {
    fn name(&self) -> String {
        let names: Vec<String> = self.sources.iter().map(|s| s.name()).collect();
        format!("combined[{}]", names.join(", "))
    }

    #[instrument(skip(self, catalog), fields(sources = self.sources.len()))]
    async fn fetch(&self, catalog: &ThresholdCatalog) -> ImportResult<ImportOutcome> {
        let outcomes = try_join_all(self.sources.iter().map(|s| s.fetch(catalog))).await?;

        let mut combined = ImportOutcome::default();
        for outcome in outcomes {
            combined.extend(outcome);
        }
        Ok(combined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::threshold::ChannelThreshold;
    use crate::domain::types::ChannelKind;
    use chrono::NaiveDate;
    use std::io::Write;
    use tempfile::Builder;

    fn catalog() -> ThresholdCatalog {
        ThresholdCatalog::builder("test")
            .equipment(
                "P-1",
                Some("1670"),
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

    fn reading(day: u32) -> Reading {
        Reading::new(NaiveDate::from_ymd_opt(2025, 3, day).unwrap(), "1670", "P-1", true)
            .with_channel("Driving End Temp", 50.0)
    }

    #[tokio::test]
    async fn test_csv_file_source() {
        let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "Date,Area,Equipment,Is Running,Driving End Temp").unwrap();
        writeln!(file, "2025-03-01,1670,P-1,True,55").unwrap();
        writeln!(file, "2025-03-02,1670,P-1,True,bad").unwrap();

        let outcome = CsvFileSource::new(file.path()).fetch(&catalog()).await.unwrap();
        assert_eq!(outcome.readings.len(), 1);
        assert_eq!(outcome.rejected_count(), 1);
        assert_eq!(outcome.violations[0].row_number, 2);
    }

    #[tokio::test]
    async fn test_csv_file_source_missing() {
        let result = CsvFileSource::new("/nonexistent/condition_data.csv")
            .fetch(&catalog())
            .await;
        assert!(matches!(result, Err(ImportError::FileNotFound(_))));
    }

    #[tokio::test]
    async fn test_combined_preserves_order() {
        let first: Arc<dyn ReadingSource> =
            Arc::new(StaticSource::new("a", vec![reading(1), reading(2)]));
        let second: Arc<dyn ReadingSource> = Arc::new(StaticSource::new("b", vec![reading(3)]));
        let combined = CombinedSource::new(vec![first, second]);

        let outcome = combined.fetch(&catalog()).await.unwrap();
        let days: Vec<NaiveDate> = outcome.readings.iter().map(|r| r.timestamp).collect();
        assert_eq!(
            days,
            vec![
                NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
                NaiveDate::from_ymd_opt(2025, 3, 2).unwrap(),
                NaiveDate::from_ymd_opt(2025, 3, 3).unwrap(),
            ]
        );
        assert_eq!(combined.name(), "combined[a, b]");
    }

    #[tokio::test]
    async fn test_combined_fails_when_any_source_fails() {
        let ok: Arc<dyn ReadingSource> = Arc::new(StaticSource::new("a", vec![reading(1)]));
        let missing: Arc<dyn ReadingSource> = Arc::new(CsvFileSource::new("/nonexistent/x.csv"));
        let result = CombinedSource::new(vec![ok, missing]).fetch(&catalog()).await;
        assert!(result.is_err());
    }
}
