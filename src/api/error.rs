// ==========================================
// 设备状态监测系统 - API层错误类型
// ==========================================
// 职责: 汇总引擎/导入/目录错误,转换为调用方可读的错误消息
// 红线: 所有错误信息必须包含显式原因
// ==========================================

use crate::domain::error::CatalogError;
use crate::engine::error::EngineError;
use crate::importer::error::ImportError;
use std::time::Duration;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 请求错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    // ==========================================
    // 分层错误
    // ==========================================
    #[error("评估失败: {0}")]
    Engine(#[from] EngineError),

    #[error("读数导入失败: {0}")]
    Import(#[from] ImportError),

    #[error("阈值目录错误: {0}")]
    Catalog(#[from] CatalogError),

    // ==========================================
    // 数据源错误
    // ==========================================
    #[error("读数拉取超时: source={source_name}, timeout={timeout:?}")]
    FetchTimeout {
        source_name: String,
        timeout: Duration,
    },

    #[error("报表导出失败: {0}")]
    ExportError(String),
}

impl ApiError {
    /// 是否为调用方输入错误（可修正后重试）
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ApiError::InvalidInput(_) | ApiError::Engine(EngineError::InvertedDateRange { .. })
        )
    }
}

impl From<csv::Error> for ApiError {
    fn from(err: csv::Error) -> Self {
        ApiError::ExportError(err.to_string())
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
