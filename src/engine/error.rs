// ==========================================
// 设备状态监测系统 - 引擎层错误类型
// ==========================================
// 红线: 所有错误均可恢复,引擎没有致命中止路径
// ==========================================

use chrono::NaiveDate;
use thiserror::Error;

/// 引擎层错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// 读数引用了目录中不存在的设备
    #[error("未知设备: {equipment}（不在阈值目录中，不参与评估）")]
    UnknownEquipment { equipment: String },

    /// 停机设备的读数为占位值,禁止评估
    #[error("设备未运行: equipment={equipment}, date={date}")]
    NotRunning { equipment: String, date: NaiveDate },

    /// 报表日期区间倒置
    #[error("日期区间倒置: start={start} > end={end}")]
    InvertedDateRange { start: NaiveDate, end: NaiveDate },

    /// 回溯窗口超出可表示的日期范围
    #[error("日期窗口越界: end={end}, days={days}")]
    WindowOutOfRange { end: NaiveDate, days: i64 },
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, EngineError>;
