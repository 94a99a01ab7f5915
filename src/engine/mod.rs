// ==========================================
// 饼干生产线 - 引擎层
// ==========================================
// 职责: 工序推进调度与生产节拍控制
// 红线: Engine 不拼 SQL，只通过 ProductionModel 访问数据
// ==========================================

pub mod collaborators;
pub mod controller;
pub mod error;
pub mod stage_scheduler;

// 重导出核心引擎
pub use collaborators::{NoOpProductionView, ProductionModel, ProductionView};
pub use controller::{tick_interval_for, ProductionController};
pub use error::{ProductionError, ProductionResult};
pub use stage_scheduler::{
    format_idle_message, format_stage_message, StageScheduler, TickOutcome, TickReport,
    TIMESTAMP_FORMAT,
};
