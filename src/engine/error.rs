// ==========================================
// 饼干生产线 - 引擎层错误类型
// ==========================================
// 说明: "没有待生产订单" 不是错误，不在此列
// ==========================================

use crate::repository::error::RepositoryError;
use thiserror::Error;

/// 生产调度错误类型
#[derive(Error, Debug)]
pub enum ProductionError {
    // ===== 配置错误 =====
    #[error("配置无效: {0}")]
    InvalidConfig(String),

    // ===== 协作方错误 (原样向上传递，不重试) =====
    #[error("Model 调用失败: {0}")]
    Model(#[from] RepositoryError),

    // ===== 并发控制错误 =====
    #[error("调度器状态锁获取失败: {0}")]
    LockError(String),

    // ===== 生命周期错误 =====
    #[error("生产控制器已在运行")]
    AlreadyRunning,

    #[error("生产控制器未运行")]
    NotRunning,

    #[error("生产任务异常退出: {0}")]
    TaskJoin(String),
}

/// Result 类型别名
pub type ProductionResult<T> = Result<T, ProductionError>;
