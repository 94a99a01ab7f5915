// ==========================================
// 饼干生产线 - 调度器协作方接口
// ==========================================
// 职责: 定义调度器依赖的 Model / View trait，实现依赖倒置
// 说明: Engine 层定义 trait，Repository 层与 View 层实现
// ==========================================

use crate::domain::Pallet;
use crate::repository::error::RepositoryResult;

// ==========================================
// Model - 托盘提供与入库
// ==========================================

/// 生产数据模型 Trait
///
/// # 实现说明
/// - `SqlitePalletRepository`: 基于 production_queue / pallet 表
/// - `InMemoryPalletRepository`: 基于内存队列（测试、演示）
pub trait ProductionModel: Send + Sync {
    /// 取出下一个待生产托盘
    ///
    /// # 返回
    /// - `Ok(Some(pallet))`: 托盘所有权转交给调度器
    /// - `Ok(None)`: 当前没有待生产订单（正常情况，不是错误）
    fn next_pallet_to_produce(&self) -> RepositoryResult<Option<Pallet>>;

    /// 提交已完成码垛的托盘
    ///
    /// 托盘所有权交回 Model
    fn create_pallet(&self, pallet: Pallet) -> RepositoryResult<()>;
}

// ==========================================
// View - 生产进度输出
// ==========================================

/// 生产进度视图 Trait
///
/// 每次调用写入一行进度消息，调用顺序即 tick 顺序
pub trait ProductionView: Send + Sync {
    fn insert_to_production_box(&self, message: &str);
}

/// 空操作视图
///
/// 用于不关心进度输出的场景（如单元测试）
#[derive(Debug, Clone, Default)]
pub struct NoOpProductionView;

impl ProductionView for NoOpProductionView {
    fn insert_to_production_box(&self, message: &str) {
        tracing::trace!("NoOpProductionView: 丢弃进度消息 - {}", message);
    }
}
