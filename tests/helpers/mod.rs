// ==========================================
// 集成测试辅助工具
// ==========================================
#![allow(dead_code)]

pub mod test_data_builder;

pub use test_data_builder::{all_in_band, date, plant, ReadingBuilder};
