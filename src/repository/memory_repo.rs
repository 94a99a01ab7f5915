// ==========================================
// 饼干生产线 - 内存托盘仓储
// ==========================================
// 用途: 测试与演示，语义与 SqlitePalletRepository 一致 (FIFO)
// ==========================================

use crate::domain::{Pallet, ProductionOrder};
use crate::engine::collaborators::ProductionModel;
use crate::repository::error::{RepositoryError, RepositoryResult};
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
struct Queues {
    pending: VecDeque<Pallet>,
    completed: Vec<Pallet>,
}

/// 内存托盘仓储
#[derive(Debug, Default)]
pub struct InMemoryPalletRepository {
    queues: Mutex<Queues>,
}

impl InMemoryPalletRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以给定的待生产托盘创建（按顺序出队）
    pub fn with_pending(pallets: impl IntoIterator<Item = Pallet>) -> Self {
        Self {
            queues: Mutex::new(Queues {
                pending: pallets.into_iter().collect(),
                completed: Vec::new(),
            }),
        }
    }

    /// 追加单个待生产托盘
    pub fn push_pending(&self, pallet: Pallet) -> RepositoryResult<()> {
        self.lock()?.pending.push_back(pallet);
        Ok(())
    }

    /// 订单行入队
    pub fn enqueue_order(&self, order: &ProductionOrder) -> RepositoryResult<usize> {
        let mut queues = self.lock()?;
        queues.pending.extend(order.pallets());
        Ok(order.pallet_count as usize)
    }

    pub fn pending_count(&self) -> usize {
        self.lock().map(|q| q.pending.len()).unwrap_or(0)
    }

    pub fn completed_count(&self) -> usize {
        self.lock().map(|q| q.completed.len()).unwrap_or(0)
    }

    /// 已入库托盘快照（按入库顺序）
    pub fn completed(&self) -> Vec<Pallet> {
        self.lock().map(|q| q.completed.clone()).unwrap_or_default()
    }

    fn lock(&self) -> RepositoryResult<MutexGuard<'_, Queues>> {
        self.queues
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }
}

impl ProductionModel for InMemoryPalletRepository {
    fn next_pallet_to_produce(&self) -> RepositoryResult<Option<Pallet>> {
        Ok(self.lock()?.pending.pop_front())
    }

    fn create_pallet(&self, pallet: Pallet) -> RepositoryResult<()> {
        self.lock()?.completed.push(pallet);
        Ok(())
    }
}
