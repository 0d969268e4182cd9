// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

use chrono::NaiveDate;
use condition_monitor::config::plant_catalog;
use condition_monitor::domain::{FlagLevel, Reading, ThresholdCatalog};

/// 2025-03-dd
pub fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, day).unwrap()
}

/// 内置的当前标定目录
pub fn plant() -> ThresholdCatalog {
    plant_catalog().expect("内置目录必须合法")
}

/// 所有目录通道取区间中点的运行读数
pub fn all_in_band(catalog: &ThresholdCatalog, equipment: &str, day: NaiveDate) -> Reading {
    let set = catalog.lookup(equipment).expect("设备必须在目录中");
    let mut reading = Reading::new(day, set.area().unwrap_or(""), equipment, true);
    for threshold in set.channels() {
        reading = reading.with_channel(threshold.name(), (threshold.min() + threshold.max()) / 2.0);
    }
    reading
}

// ==========================================
// Reading 构建器
// ==========================================

pub struct ReadingBuilder {
    equipment: String,
    area: String,
    date: NaiveDate,
    is_running: bool,
    high_priority: bool,
    channels: Vec<(String, f64)>,
    flags: Vec<(String, FlagLevel)>,
}

impl ReadingBuilder {
    pub fn new(equipment: &str) -> Self {
        Self {
            equipment: equipment.to_string(),
            area: equipment.split('-').next().unwrap_or("").to_string(),
            date: date(1),
            is_running: true,
            high_priority: false,
            channels: Vec::new(),
            flags: Vec::new(),
        }
    }

    pub fn on(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }

    pub fn area(mut self, area: &str) -> Self {
        self.area = area.to_string();
        self
    }

    pub fn stopped(mut self) -> Self {
        self.is_running = false;
        self
    }

    pub fn high_priority(mut self) -> Self {
        self.high_priority = true;
        self
    }

    pub fn channel(mut self, name: &str, value: f64) -> Self {
        self.channels.push((name.to_string(), value));
        self
    }

    pub fn flag(mut self, name: &str, level: FlagLevel) -> Self {
        self.flags.push((name.to_string(), level));
        self
    }

    pub fn build(self) -> Reading {
        let mut reading = Reading::new(self.date, self.area, self.equipment, self.is_running)
            .with_high_priority(self.high_priority);
        for (name, value) in self.channels {
            reading = reading.with_channel(name, value);
        }
        for (name, level) in self.flags {
            reading = reading.with_flag(name, level);
        }
        reading
    }
}
