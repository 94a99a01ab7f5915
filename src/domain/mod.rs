// ==========================================
// 饼干生产线 - 领域模型层
// ==========================================
// 职责: 定义托盘、订单行、工序等领域类型
// 红线: 不含数据访问逻辑,不含调度逻辑
// ==========================================

pub mod pallet;
pub mod types;

// 重导出核心类型
pub use pallet::{Pallet, ProducedPallet, ProductionOrder};
pub use types::{ProductionStage, QueueStatus};
