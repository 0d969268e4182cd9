// ==========================================
// 设备状态监测系统 - 偏差报表导出
// ==========================================
// 职责: DeviationReport → CSV（每条越限读数一行,列覆盖读数全部字段）
// 列顺序: Date, Area, Equipment, Is Running, High Priority,
//         数值通道（排序）, 定性标志（排序）, 备注列（排序）, Violated Channels
// ==========================================

use crate::api::error::ApiResult;
use crate::engine::report::DeviationReport;
use crate::importer::reading_mapper::columns;
use csv::Writer;
use std::collections::BTreeSet;
use std::io::Write;

pub const VIOLATED_CHANNELS_COLUMN: &str = "Violated Channels";

/// 写出偏差报表
///
/// 某条读数缺失的列留空;无越限读数时仅写表头
pub fn write_deviation_csv<W: Write>(report: &DeviationReport, writer: W) -> ApiResult<()> {
    let mut channels = BTreeSet::new();
    let mut flags = BTreeSet::new();
    let mut notes = BTreeSet::new();
    for deviation in &report.deviations {
        channels.extend(deviation.reading.channel_values.keys().map(String::as_str));
        flags.extend(deviation.reading.qualitative_flags.keys().map(String::as_str));
        notes.extend(deviation.reading.notes.keys().map(String::as_str));
    }

    let mut header: Vec<&str> = vec![
        columns::DATE,
        columns::AREA,
        columns::EQUIPMENT,
        columns::IS_RUNNING,
        columns::HIGH_PRIORITY,
    ];
    header.extend(channels.iter().copied());
    header.extend(flags.iter().copied());
    header.extend(notes.iter().copied());
    header.push(VIOLATED_CHANNELS_COLUMN);

    let mut csv = Writer::from_writer(writer);
    csv.write_record(&header)?;

    for deviation in &report.deviations {
        let reading = &deviation.reading;
        let mut record: Vec<String> = vec![
            reading.timestamp.format("%Y-%m-%d").to_string(),
            reading.area.clone(),
            reading.equipment.clone(),
            bool_cell(reading.is_running),
            bool_cell(reading.high_priority),
        ];
        record.extend(channels.iter().map(|c| {
            reading
                .channel_values
                .get(*c)
                .map(|v| v.to_string())
                .unwrap_or_default()
        }));
        record.extend(flags.iter().map(|f| {
            reading
                .qualitative_flags
                .get(*f)
                .map(|l| l.to_string())
                .unwrap_or_default()
        }));
        record.extend(notes.iter().map(|n| reading.notes.get(*n).cloned().unwrap_or_default()));
        record.push(deviation.violated_channel_names().join("; "));

        csv.write_record(&record)?;
    }

    csv.flush().map_err(csv::Error::from)?;
    Ok(())
}

fn bool_cell(value: bool) -> String {
    if value { "True" } else { "False" }.to_string()
}
