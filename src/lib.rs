// ==========================================
// 饼干生产线仿真 - 核心库
// ==========================================
// 流水线: 生产 → 冷冻 → 装袋 → 装箱 → 码垛
// 技术栈: Rust + tokio + SQLite
// 系统定位: 单托盘串行推进，按固定节拍输出进度
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 托盘与工序
pub mod domain;

// 数据仓储层 - 待生产队列与入库托盘
pub mod repository;

// 引擎层 - 工序推进调度
pub mod engine;

// 视图层 - 进度输出
pub mod view;

// 配置层 - 生产节拍配置
pub mod config;

// 数据库基础设施（连接初始化/建表）
pub mod db;

// 日志系统
pub mod logging;

// 应用层 - 组件装配
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

pub use domain::{Pallet, ProductionOrder, ProductionStage};
pub use engine::{
    ProductionController, ProductionError, ProductionModel, ProductionView, StageScheduler,
    TickOutcome, TickReport,
};
pub use repository::{InMemoryPalletRepository, SqlitePalletRepository};
pub use view::{ConsoleProductionView, ProductionBox};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "Krusty Kookies 生产线";
