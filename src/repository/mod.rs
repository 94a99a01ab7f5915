// ==========================================
// 饼干生产线 - 数据仓储层
// ==========================================
// 红线: Repository 不含调度逻辑
// ==========================================
// 职责: 提供待生产队列与已入库托盘的数据访问
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod error;
pub mod memory_repo;
pub mod pallet_repo;

// 重导出核心仓储
pub use error::{RepositoryError, RepositoryResult};
pub use memory_repo::InMemoryPalletRepository;
pub use pallet_repo::SqlitePalletRepository;
