// ==========================================
// 设备状态监测系统 - 阈值目录
// ==========================================
// 职责: 设备 → 有序通道阈值集合 的只读映射
// 红线: 目录在进程启动时构建一次,运行期不可变
// 红线: 未知设备返回 None,既不视为合格也不视为违规
// ==========================================

use crate::domain::error::{CatalogError, CatalogResult};
use crate::domain::types::{ChannelKind, EquipmentId};
use std::collections::{HashMap, HashSet};

// ==========================================
// ChannelThreshold - 单通道可接受区间
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelThreshold {
    name: String,
    kind: ChannelKind,
    min: f64,
    max: f64,
}

impl ChannelThreshold {
    /// 创建通道阈值
    ///
    /// # 参数
    /// - `equipment`: 所属设备（仅用于错误信息）
    /// - `name`: 通道名称（名称即口径,须与读数列名逐字一致）
    /// - `kind`: 通道类型
    /// - `min` / `max`: 闭区间上下限
    ///
    /// # 返回
    /// - Err(InvertedBand): min > max
    /// - Err(NonFiniteBound): 上下限含 NaN / 无穷
    pub fn new(
        equipment: &str,
        name: impl Into<String>,
        kind: ChannelKind,
        min: f64,
        max: f64,
    ) -> CatalogResult<Self> {
        let name = name.into();

        if !min.is_finite() || !max.is_finite() {
            return Err(CatalogError::NonFiniteBound {
                equipment: equipment.to_string(),
                channel: name,
            });
        }

        if min > max {
            return Err(CatalogError::InvertedBand {
                equipment: equipment.to_string(),
                channel: name,
                min,
                max,
            });
        }

        Ok(Self {
            name,
            kind,
            min,
            max,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ChannelKind {
        self.kind
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// 闭区间判定: min <= value <= max
    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }
}

// ==========================================
// ChannelSet - 单台设备的通道阈值集合
// ==========================================
// 通道顺序即目录定义顺序,偏差输出按此顺序
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelSet {
    area: Option<String>,
    channels: Vec<ChannelThreshold>,
}

impl ChannelSet {
    pub fn area(&self) -> Option<&str> {
        self.area.as_deref()
    }

    pub fn channels(&self) -> &[ChannelThreshold] {
        &self.channels
    }

    pub fn get(&self, channel_name: &str) -> Option<&ChannelThreshold> {
        self.channels.iter().find(|c| c.name == channel_name)
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}

// ==========================================
// ThresholdCatalog - 阈值目录
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdCatalog {
    version: String,
    equipment: HashMap<EquipmentId, ChannelSet>,
}

impl ThresholdCatalog {
    /// 创建目录构建器
    pub fn builder(version: impl Into<String>) -> ThresholdCatalogBuilder {
        ThresholdCatalogBuilder {
            version: version.into(),
            equipment: HashMap::new(),
        }
    }

    /// 目录版本（阈值重新标定时递增）
    pub fn version(&self) -> &str {
        &self.version
    }

    /// 查找设备的通道阈值集合
    ///
    /// 全函数: 未知设备返回 None,不报错
    pub fn lookup(&self, equipment_id: &str) -> Option<&ChannelSet> {
        self.equipment.get(equipment_id)
    }

    pub fn contains(&self, equipment_id: &str) -> bool {
        self.equipment.contains_key(equipment_id)
    }

    /// 所有设备标识（排序后返回）
    pub fn equipment_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.equipment.keys().map(|k| k.as_str()).collect();
        ids.sort_unstable();
        ids
    }

    /// 指定区域下的设备（排序后返回）
    pub fn equipment_in_area(&self, area: &str) -> Vec<&str> {
        let mut ids: Vec<&str> = self
            .equipment
            .iter()
            .filter(|(_, set)| set.area() == Some(area))
            .map(|(id, _)| id.as_str())
            .collect();
        ids.sort_unstable();
        ids
    }

    /// 目录中出现过的全部通道名称
    pub fn channel_names(&self) -> HashSet<&str> {
        self.equipment
            .values()
            .flat_map(|set| set.channels.iter().map(|c| c.name.as_str()))
            .collect()
    }

    /// 查询通道类型（同名通道在目录内类型一致,取任一定义）
    pub fn channel_kind(&self, channel_name: &str) -> Option<ChannelKind> {
        self.equipment
            .values()
            .find_map(|set| set.get(channel_name))
            .map(|c| c.kind)
    }

    pub fn len(&self) -> usize {
        self.equipment.len()
    }

    pub fn is_empty(&self) -> bool {
        self.equipment.is_empty()
    }
}

// ==========================================
// ThresholdCatalogBuilder - 目录构建器
// ==========================================
pub struct ThresholdCatalogBuilder {
    version: String,
    equipment: HashMap<EquipmentId, ChannelSet>,
}

impl ThresholdCatalogBuilder {
    /// 登记一台设备
    ///
    /// # 参数
    /// - `equipment_id`: 设备标识
    /// - `area`: 所属区域（可选）
    /// - `channels`: 按定义顺序排列的通道阈值
    pub fn equipment(
        mut self,
        equipment_id: impl Into<String>,
        area: Option<&str>,
        channels: Vec<ChannelThreshold>,
    ) -> CatalogResult<Self> {
        let equipment_id = equipment_id.into();
        if equipment_id.trim().is_empty() {
            return Err(CatalogError::EmptyEquipmentId);
        }
        if self.equipment.contains_key(&equipment_id) {
            return Err(CatalogError::DuplicateEquipment(equipment_id));
        }

        let mut seen = HashSet::new();
        for channel in &channels {
            if !seen.insert(channel.name.as_str()) {
                return Err(CatalogError::DuplicateChannel {
                    equipment: equipment_id,
                    channel: channel.name.clone(),
                });
            }
        }

        self.equipment.insert(
            equipment_id,
            ChannelSet {
                area: area.map(|a| a.to_string()),
                channels,
            },
        );
        Ok(self)
    }

    pub fn build(self) -> ThresholdCatalog {
        ThresholdCatalog {
            version: self.version,
            equipment: self.equipment,
        }
    }
}
