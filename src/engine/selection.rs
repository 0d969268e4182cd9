// ==========================================
// 设备状态监测系统 - 读数筛选
// ==========================================
// 职责: 日期窗口 / 重点设备 / 单设备历史 筛选
// 红线: 筛选结果保持输入顺序
// ==========================================

use crate::domain::reading::Reading;
use crate::engine::error::{EngineError, EngineResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// DateWindow - 闭区间日期窗口
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateWindow {
    /// 创建日期窗口
    ///
    /// # 返回
    /// - Err(InvertedDateRange): start > end（不允许静默返回空结果掩盖输入错误）
    pub fn new(start: NaiveDate, end: NaiveDate) -> EngineResult<Self> {
        if start > end {
            return Err(EngineError::InvertedDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// 以 end 为终点、向前包含 days 天的窗口（days=7 → 8 个自然日,与原看板口径一致）
    ///
    /// # 返回
    /// - Err(WindowOutOfRange): 起点早于可表示的最小日期
    pub fn trailing(end: NaiveDate, days: i64) -> EngineResult<Self> {
        let start = chrono::Duration::try_days(days.max(0))
            .and_then(|span| end.checked_sub_signed(span))
            .ok_or(EngineError::WindowOutOfRange { end, days })?;
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// start <= date <= end
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// 筛选重点关注设备的读数
pub fn select_high_priority<'a>(readings: &'a [Reading], window: &DateWindow) -> Vec<&'a Reading> {
    readings
        .iter()
        .filter(|r| r.high_priority && window.contains(r.timestamp))
        .collect()
}

/// 单台设备在窗口内的历史读数（含停机记录）
pub fn equipment_history<'a>(
    readings: &'a [Reading],
    equipment: &str,
    window: &DateWindow,
) -> Vec<&'a Reading> {
    readings
        .iter()
        .filter(|r| r.equipment == equipment && window.contains(r.timestamp))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    #[test]
    fn test_inverted_window_rejected() {
        let result = DateWindow::new(date(10), date(1));
        assert_eq!(
            result,
            Err(EngineError::InvertedDateRange {
                start: date(10),
                end: date(1)
            })
        );
    }

    #[test]
    fn test_window_inclusive_both_ends() {
        let window = DateWindow::new(date(1), date(7)).unwrap();
        assert!(window.contains(date(1)));
        assert!(window.contains(date(7)));
        assert!(!window.contains(date(8)));
        assert!(!window.contains(NaiveDate::from_ymd_opt(2025, 2, 28).unwrap()));
    }

    #[test]
    fn test_trailing_window() {
        let window = DateWindow::trailing(date(8), 7).unwrap();
        assert_eq!(window.start(), date(1));
        assert_eq!(window.end(), date(8));

        // 负天数按 0 处理
        let today = DateWindow::trailing(date(8), -2).unwrap();
        assert_eq!(today.start(), date(8));
    }

    #[test]
    fn test_trailing_window_out_of_range() {
        assert_eq!(
            DateWindow::trailing(date(1), 100_000_000),
            Err(EngineError::WindowOutOfRange {
                end: date(1),
                days: 100_000_000
            })
        );
        assert!(DateWindow::trailing(date(1), i64::MAX).is_err());
    }

    #[test]
    fn test_high_priority_and_history_keep_order() {
        let readings = vec![
            Reading::new(date(3), "1670", "A", true).with_high_priority(true),
            Reading::new(date(2), "1670", "B", false).with_high_priority(true),
            Reading::new(date(4), "1670", "A", false),
            Reading::new(date(20), "1670", "A", true).with_high_priority(true),
        ];
        let window = DateWindow::new(date(1), date(10)).unwrap();

        let high: Vec<&str> = select_high_priority(&readings, &window)
            .iter()
            .map(|r| r.equipment.as_str())
            .collect();
        assert_eq!(high, vec!["A", "B"]);

        let history = equipment_history(&readings, "A", &window);
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].timestamp, date(3));
        assert_eq!(history[1].timestamp, date(4));
    }
}
