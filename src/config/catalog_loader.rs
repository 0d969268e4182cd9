// ==========================================
// 设备状态监测系统 - 阈值目录加载器
// ==========================================
// 职责: JSON 目录文件 ⇄ ThresholdCatalog
// 格式: { "version", "equipment": [ { "id", "area", "channels": [ ... ] } ] }
//       channels: [ { "name", "kind"?, "min", "max" } ]
// ==========================================

use crate::domain::error::{CatalogError, CatalogResult};
use crate::domain::threshold::{ChannelThreshold, ThresholdCatalog};
use crate::domain::types::ChannelKind;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// 目录文件（持久化对象）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogFile {
    pub version: String,
    pub equipment: Vec<EquipmentEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentEntry {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
    pub channels: Vec<ChannelEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelEntry {
    pub name: String,
    /// 缺省时按通道名称推断
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ChannelKind>,
    pub min: f64,
    pub max: f64,
}

impl CatalogFile {
    /// 校验并构建只读目录
    pub fn into_catalog(self) -> CatalogResult<ThresholdCatalog> {
        let mut builder = ThresholdCatalog::builder(self.version);

        for entry in self.equipment {
            let mut channels = Vec::with_capacity(entry.channels.len());
            for channel in entry.channels {
                let kind = match channel.kind.or_else(|| ChannelKind::infer(&channel.name)) {
                    Some(kind) => kind,
                    None => {
                        return Err(CatalogError::UnknownChannelKind {
                            equipment: entry.id,
                            channel: channel.name,
                        })
                    }
                };
                channels.push(ChannelThreshold::new(
                    &entry.id,
                    channel.name,
                    kind,
                    channel.min,
                    channel.max,
                )?);
            }
            builder = builder.equipment(entry.id, entry.area.as_deref(), channels)?;
        }

        Ok(builder.build())
    }

    /// 从目录导出（设备按标识排序,通道保持定义顺序）
    pub fn from_catalog(catalog: &ThresholdCatalog) -> Self {
        let equipment = catalog
            .equipment_ids()
            .into_iter()
            .filter_map(|id| catalog.lookup(id).map(|set| (id, set)))
            .map(|(id, set)| EquipmentEntry {
                id: id.to_string(),
                area: set.area().map(|a| a.to_string()),
                channels: set
                    .channels()
                    .iter()
                    .map(|c| ChannelEntry {
                        name: c.name().to_string(),
                        kind: Some(c.kind()),
                        min: c.min(),
                        max: c.max(),
                    })
                    .collect(),
            })
            .collect();

        Self {
            version: catalog.version().to_string(),
            equipment,
        }
    }
}

/// 解析 JSON 目录文本
pub fn parse_catalog(json: &str) -> CatalogResult<ThresholdCatalog> {
    let file: CatalogFile = serde_json::from_str(json)?;
    file.into_catalog()
}

/// 从文件加载目录
pub fn load_catalog_file(path: &Path) -> CatalogResult<ThresholdCatalog> {
    let raw = std::fs::read_to_string(path).map_err(|e| CatalogError::FileReadError {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    let catalog = parse_catalog(&raw)?;
    info!(
        path = %path.display(),
        version = catalog.version(),
        equipment = catalog.len(),
        "阈值目录加载完成"
    );
    Ok(catalog)
}

/// 目录序列化为 JSON 文本
pub fn catalog_to_json(catalog: &ThresholdCatalog) -> CatalogResult<String> {
    Ok(serde_json::to_string_pretty(&CatalogFile::from_catalog(catalog))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_inferred_when_omitted() {
        let json = r#"{
            "version": "t1",
            "equipment": [
                { "id": "P-1", "area": "1670", "channels": [
                    { "name": "Driving End Temp", "min": 0, "max": 70 },
                    { "name": "RMS Velocity (mm/s)", "min": 0, "max": 4.5 }
                ] }
            ]
        }"#;

        let catalog = parse_catalog(json).unwrap();
        let set = catalog.lookup("P-1").unwrap();
        assert_eq!(set.channels()[0].kind(), ChannelKind::Temperature);
        assert_eq!(set.channels()[1].kind(), ChannelKind::Vibration);
        assert_eq!(set.area(), Some("1670"));
    }

    #[test]
    fn test_unresolvable_kind_rejected() {
        let json = r#"{ "version": "t1", "equipment": [
            { "id": "P-1", "channels": [ { "name": "Peak Acceleration (g)", "min": 0, "max": 10 } ] }
        ] }"#;

        assert!(matches!(
            parse_catalog(json),
            Err(CatalogError::UnknownChannelKind { .. })
        ));
    }

    #[test]
    fn test_inverted_band_rejected() {
        let json = r#"{ "version": "t1", "equipment": [
            { "id": "P-1", "channels": [ { "name": "Driving End Temp", "kind": "TEMPERATURE", "min": 60, "max": 50 } ] }
        ] }"#;

        assert!(matches!(
            parse_catalog(json),
            Err(CatalogError::InvertedBand { .. })
        ));
    }

    #[test]
    fn test_malformed_json_rejected() {
        assert!(matches!(
            parse_catalog("{ not json"),
            Err(CatalogError::FormatError(_))
        ));
    }

    #[test]
    fn test_json_export_reloads_to_same_catalog() {
        let json = r#"{ "version": "t2", "equipment": [
            { "id": "B", "channels": [ { "name": "Driven End Temp", "kind": "TEMPERATURE", "min": 10, "max": 60 } ] },
            { "id": "A", "area": "1600", "channels": [ { "name": "DE Axial RMS", "kind": "VIBRATION", "min": 0, "max": 2.8 } ] }
        ] }"#;
        let catalog = parse_catalog(json).unwrap();

        let exported = catalog_to_json(&catalog).unwrap();
        assert_eq!(parse_catalog(&exported).unwrap(), catalog);
    }

    #[test]
    fn test_missing_file() {
        let result = load_catalog_file(Path::new("/nonexistent/thresholds.json"));
        assert!(matches!(result, Err(CatalogError::FileReadError { .. })));
    }
}
