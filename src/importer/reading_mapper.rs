// ==========================================
// 设备状态监测系统 - 读数字段映射
// ==========================================
// 职责: 原始行 → Reading（类型转换 + 边界校验）
// 列口径: Date / Area / Equipment / Is Running / High Priority
//        *Oil Level → 定性标志;目录通道 → 数值;其余数值列 → 通道;其余文本列 → 备注
// 红线: 坏行进入拒收列表,不中断整批
// ==========================================

use crate::domain::reading::Reading;
use crate::domain::threshold::ThresholdCatalog;
use crate::domain::types::FlagLevel;
use crate::importer::dq_validator::{DqLevel, DqViolation, PhysicalRangeValidator};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::RawRow;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// 固定列名
pub mod columns {
    pub const DATE: &str = "Date";
    pub const AREA: &str = "Area";
    pub const EQUIPMENT: &str = "Equipment";
    pub const IS_RUNNING: &str = "Is Running";
    pub const HIGH_PRIORITY: &str = "High Priority";
    pub const OIL_LEVEL_SUFFIX: &str = "Oil Level";
}

/// 占位值（停机记录中的文本列）
const NOT_APPLICABLE: &str = "N/A";

/// 导入结果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportOutcome {
    pub readings: Vec<Reading>,
    pub violations: Vec<DqViolation>,
}

impl ImportOutcome {
    /// 被拒收的行数
    pub fn rejected_count(&self) -> usize {
        self.violations
            .iter()
            .filter(|v| v.level == DqLevel::Error)
            .map(|v| v.row_number)
            .collect::<HashSet<_>>()
            .len()
    }

    /// 合并另一批次（保持先后顺序）
    pub fn extend(&mut self, other: ImportOutcome) {
        self.readings.extend(other.readings);
        self.violations.extend(other.violations);
    }
}

// ==========================================
// ReadingMapper - 字段映射器
// ==========================================
pub struct ReadingMapper<'a> {
    catalog: &'a ThresholdCatalog,
    catalog_channels: HashSet<&'a str>,
    validator: PhysicalRangeValidator,
}

impl<'a> ReadingMapper<'a> {
    pub fn new(catalog: &'a ThresholdCatalog) -> Self {
        Self {
            catalog,
            catalog_channels: catalog.channel_names(),
            validator: PhysicalRangeValidator::new(),
        }
    }

    /// 批量映射
    ///
    /// 映射失败或物理范围校验失败的行记入 violations 并跳过
    pub fn map_rows(&self, rows: Vec<RawRow>) -> ImportOutcome {
        let mut outcome = ImportOutcome::default();

        for (row_number, row) in rows {
            let reading = match self.map_row(row_number, &row) {
                Ok(reading) => reading,
                Err(e) => {
                    warn!("读数行拒收: {}", e);
                    outcome.violations.push(DqViolation {
                        row_number,
                        equipment: row
                            .get(columns::EQUIPMENT)
                            .cloned()
                            .filter(|v| !v.is_empty()),
                        level: DqLevel::Error,
                        field: error_field(&e),
                        message: e.to_string(),
                    });
                    continue;
                }
            };

            let violations = self.validator.validate(row_number, &reading, self.catalog);
            let rejected = violations.iter().any(|v| v.level == DqLevel::Error);
            outcome.violations.extend(violations);

            if rejected {
                warn!(
                    row = row_number,
                    equipment = %reading.equipment,
                    "读数超出物理范围,拒收"
                );
                continue;
            }
            outcome.readings.push(reading);
        }

        debug!(
            accepted = outcome.readings.len(),
            rejected = outcome.rejected_count(),
            "读数映射完成"
        );
        outcome
    }

    /// 映射单行
    pub fn map_row(
        &self,
        row_number: usize,
        row: &HashMap<String, String>,
    ) -> ImportResult<Reading> {
        let timestamp = parse_date(row_number, required(row_number, row, columns::DATE)?)?;
        let area = required(row_number, row, columns::AREA)?;
        let equipment = required(row_number, row, columns::EQUIPMENT)?;
        let is_running = parse_bool(
            row_number,
            columns::IS_RUNNING,
            required(row_number, row, columns::IS_RUNNING)?,
        )?;

        let mut reading = Reading::new(timestamp, area, equipment, is_running);

        if let Some(raw) = row.get(columns::HIGH_PRIORITY).filter(|v| !v.is_empty()) {
            reading.high_priority = parse_bool(row_number, columns::HIGH_PRIORITY, raw)?;
        }

        // 列名排序,保证多列出错时报告的首个错误稳定
        let mut names: Vec<&String> = row.keys().filter(|k| !is_fixed_column(k)).collect();
        names.sort();

        for name in names {
            let raw = row[name].as_str();
            if raw.is_empty() {
                continue;
            }

            if name.ends_with(columns::OIL_LEVEL_SUFFIX) {
                if raw.eq_ignore_ascii_case(NOT_APPLICABLE) {
                    continue;
                }
                let level = raw.parse::<FlagLevel>().map_err(|message| {
                    ImportError::TypeConversionError {
                        row: row_number,
                        field: name.clone(),
                        message,
                    }
                })?;
                reading.qualitative_flags.insert(name.clone(), level);
                continue;
            }

            if self.catalog_channels.contains(name.as_str()) {
                match parse_number(raw) {
                    Some(value) => {
                        reading.channel_values.insert(name.clone(), value);
                    }
                    // 停机行为占位值,不参与评估,按缺失处理
                    None if !is_running => {
                        debug!(
                            row = row_number,
                            field = %name,
                            value = raw,
                            "停机行占位值已忽略"
                        );
                    }
                    None => {
                        return Err(ImportError::MalformedValue {
                            row: row_number,
                            field: name.clone(),
                            value: raw.to_string(),
                        });
                    }
                }
                continue;
            }

            match parse_number(raw) {
                Some(value) => {
                    reading.channel_values.insert(name.clone(), value);
                }
                None => {
                    reading.notes.insert(name.clone(), raw.to_string());
                }
            }
        }

        Ok(reading)
    }
}

fn is_fixed_column(name: &str) -> bool {
    matches!(
        name,
        columns::DATE
            | columns::AREA
            | columns::EQUIPMENT
            | columns::IS_RUNNING
            | columns::HIGH_PRIORITY
    )
}

fn required<'r>(
    row_number: usize,
    row: &'r HashMap<String, String>,
    field: &str,
) -> ImportResult<&'r str> {
    row.get(field)
        .map(|v| v.as_str())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ImportError::MissingField {
            row: row_number,
            field: field.to_string(),
        })
}

/// 日期: YYYY-MM-DD,允许带时间后缀（"2025-03-01 08:30:00" / "2025-03-01T08:30:00"）
fn parse_date(row_number: usize, raw: &str) -> ImportResult<NaiveDate> {
    let date_part = raw
        .split(|c: char| c == ' ' || c == 'T')
        .next()
        .unwrap_or(raw);

    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").map_err(|_| ImportError::DateFormatError {
        row: row_number,
        value: raw.to_string(),
    })
}

fn parse_bool(row_number: usize, field: &str, raw: &str) -> ImportResult<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "y" => Ok(true),
        "false" | "0" | "no" | "n" => Ok(false),
        other => Err(ImportError::TypeConversionError {
            row: row_number,
            field: field.to_string(),
            message: format!("无法解析为布尔值: {}", other),
        }),
    }
}

/// 有限浮点数;NaN / inf 视为非法
fn parse_number(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn error_field(err: &ImportError) -> String {
    match err {
        ImportError::MissingField { field, .. }
        | ImportError::TypeConversionError { field, .. }
        | ImportError::MalformedValue { field, .. }
        | ImportError::ValueRangeError { field, .. } => field.clone(),
        ImportError::DateFormatError { .. } => columns::DATE.to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::threshold::ChannelThreshold;
    use crate::domain::types::ChannelKind;

    fn catalog() -> ThresholdCatalog {
        ThresholdCatalog::builder("test")
            .equipment(
                "1670-PA-02A",
                Some("1670"),
                vec![
                    ChannelThreshold::new(
                        "1670-PA-02A",
                        "Driving End Temp",
                        ChannelKind::Temperature,
                        0.0,
                        70.0,
                    )
                    .unwrap(),
                    ChannelThreshold::new(
                        "1670-PA-02A",
                        "RMS Velocity (mm/s)",
                        ChannelKind::Vibration,
                        0.0,
                        4.5,
                    )
                    .unwrap(),
                ],
            )
            .unwrap()
            .build()
    }

    fn row(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn base_row() -> Vec<(&'static str, &'static str)> {
        vec![
            ("Date", "2025-03-01"),
            ("Area", "1670"),
            ("Equipment", "1670-PA-02A"),
            ("Is Running", "True"),
        ]
    }

    #[test]
    fn test_map_full_row() {
        let mut pairs = base_row();
        pairs.extend([
            ("High Priority", "False"),
            ("Driving End Temp", "55.5"),
            ("RMS Velocity (mm/s)", "2.1"),
            ("Peak Acceleration (g)", "0.4"),
            ("Oil Level", "Low"),
            ("Gearbox Oil Level", "N/A"),
            ("Leakage", "No"),
            ("Observation", "slight noise"),
        ]);

        let c = catalog();
        let reading = ReadingMapper::new(&c).map_row(1, &row(&pairs)).unwrap();

        assert_eq!(reading.timestamp, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        assert!(reading.is_running);
        assert!(!reading.high_priority);
        assert_eq!(reading.channel_value("Driving End Temp"), Some(55.5));
        assert_eq!(reading.channel_value("Peak Acceleration (g)"), Some(0.4));
        assert_eq!(reading.qualitative_flags.get("Oil Level"), Some(&FlagLevel::Low));
        assert!(!reading.qualitative_flags.contains_key("Gearbox Oil Level"));
        assert_eq!(reading.notes.get("Leakage").map(String::as_str), Some("No"));
        assert_eq!(
            reading.notes.get("Observation").map(String::as_str),
            Some("slight noise")
        );
    }

    #[test]
    fn test_date_with_time_suffix() {
        let mut pairs = base_row();
        pairs[0] = ("Date", "2025-03-01 00:00:00");

        let c = catalog();
        let reading = ReadingMapper::new(&c).map_row(1, &row(&pairs)).unwrap();
        assert_eq!(reading.timestamp, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
    }

    #[test]
    fn test_malformed_catalog_channel() {
        let mut pairs = base_row();
        pairs.push(("Driving End Temp", "hot"));

        let c = catalog();
        let result = ReadingMapper::new(&c).map_row(4, &row(&pairs));
        assert!(matches!(
            result,
            Err(ImportError::MalformedValue { row: 4, ref field, .. })
                if field == "Driving End Temp"
        ));
    }

    #[test]
    fn test_stopped_row_placeholder_ignored() {
        let mut pairs = base_row();
        pairs[3] = ("Is Running", "False");
        pairs.push(("Driving End Temp", "N/A"));
        pairs.push(("RMS Velocity (mm/s)", "0"));

        let c = catalog();
        let mapper = ReadingMapper::new(&c);
        let reading = mapper.map_row(2, &row(&pairs)).unwrap();
        assert!(!reading.is_running);
        assert_eq!(reading.channel_value("Driving End Temp"), None);
        assert_eq!(reading.channel_value("RMS Velocity (mm/s)"), Some(0.0));

        let outcome = mapper.map_rows(vec![(2, row(&pairs))]);
        assert_eq!(outcome.readings.len(), 1);
        assert!(outcome.violations.is_empty());
    }

    #[test]
    fn test_nan_rejected() {
        let mut pairs = base_row();
        pairs.push(("Driving End Temp", "NaN"));

        let c = catalog();
        assert!(ReadingMapper::new(&c).map_row(1, &row(&pairs)).is_err());
    }

    #[test]
    fn test_missing_and_bad_fields() {
        let c = catalog();
        let mapper = ReadingMapper::new(&c);

        let mut no_equipment = base_row();
        no_equipment[2] = ("Equipment", "");
        assert!(matches!(
            mapper.map_row(1, &row(&no_equipment)),
            Err(ImportError::MissingField { .. })
        ));

        let mut bad_date = base_row();
        bad_date[0] = ("Date", "01/03/2025");
        assert!(matches!(
            mapper.map_row(1, &row(&bad_date)),
            Err(ImportError::DateFormatError { .. })
        ));

        let mut bad_bool = base_row();
        bad_bool[3] = ("Is Running", "maybe");
        assert!(matches!(
            mapper.map_row(1, &row(&bad_bool)),
            Err(ImportError::TypeConversionError { .. })
        ));

        let mut bad_flag = base_row();
        bad_flag.push(("DE Oil Level", "Empty"));
        assert!(matches!(
            mapper.map_row(1, &row(&bad_flag)),
            Err(ImportError::TypeConversionError { .. })
        ));
    }

    #[test]
    fn test_map_rows_rejects_without_aborting() {
        let mut bad = base_row();
        bad.push(("Driving End Temp", "abc"));
        let mut negative = base_row();
        negative.push(("Driving End Temp", "-12"));
        let mut good = base_row();
        good.push(("Driving End Temp", "40"));

        let c = catalog();
        let outcome = ReadingMapper::new(&c).map_rows(vec![
            (1, row(&bad)),
            (2, row(&negative)),
            (3, row(&good)),
        ]);

        assert_eq!(outcome.readings.len(), 1);
        assert_eq!(outcome.rejected_count(), 2);
        assert_eq!(outcome.violations[0].row_number, 1);
        assert_eq!(outcome.violations[0].field, "Driving End Temp");
        assert_eq!(outcome.violations[1].row_number, 2);
        assert!(outcome.violations[1].message.starts_with("数值超出物理范围 (行 2"));
        assert_eq!(outcome.violations[0].equipment.as_deref(), Some("1670-PA-02A"));
    }
}
