// ==========================================
// 饼干生产线 - 视图层
// ==========================================
// 职责: 接收调度器的进度消息（被动输出，不含业务逻辑）
// ==========================================

pub mod console;
pub mod fan_out;
pub mod production_box;

pub use console::ConsoleProductionView;
pub use fan_out::FanOutProductionView;
pub use production_box::ProductionBox;
