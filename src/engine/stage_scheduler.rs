// ==========================================
// 饼干生产线 - 工序推进调度器
// ==========================================
// 职责: 每个 tick 将在制托盘推进一道工序，或从 Model 取新托盘
// 输出: 每个 tick 向 View 写入一行进度消息
// 红线: 同一时刻只有一个托盘在制；工序逐个推进，不跳过不重复
// ==========================================

use crate::domain::{Pallet, ProductionStage};
use crate::engine::collaborators::{ProductionModel, ProductionView};
use crate::engine::error::{ProductionError, ProductionResult};
use chrono::{Local, NaiveDateTime};
use std::sync::{Arc, Mutex, MutexGuard};

/// 进度消息时间戳格式
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ==========================================
// 调度器状态
// ==========================================
// 空闲时没有工序可言：空闲即意味着下一个托盘从 Production 开始
#[derive(Debug, Clone, PartialEq, Eq)]
enum SchedulerState {
    Idle,
    Producing {
        pallet: Pallet,
        stage: ProductionStage, // 下一个 tick 要执行的工序
    },
}

/// 单个 tick 的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// 空闲且 Model 没有待生产托盘
    NoOrders,
    /// 托盘完成了 `stage` 工序，并推进到下一道
    Advanced { order_id: i64, stage: ProductionStage },
    /// 托盘完成码垛并已交回 Model
    Completed { order_id: i64 },
}

/// 单个 tick 的报告：写入 View 的消息 + 结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickReport {
    pub message: String,
    pub outcome: TickOutcome,
}

// ==========================================
// StageScheduler - 工序推进调度器
// ==========================================
pub struct StageScheduler {
    model: Arc<dyn ProductionModel>,
    view: Arc<dyn ProductionView>,
    state: Mutex<SchedulerState>,
}

impl StageScheduler {
    /// 创建调度器（初始为空闲）
    pub fn new(model: Arc<dyn ProductionModel>, view: Arc<dyn ProductionView>) -> Self {
        Self {
            model,
            view,
            state: Mutex::new(SchedulerState::Idle),
        }
    }

    /// 以当前本地时间执行一个 tick
    pub fn tick(&self) -> ProductionResult<TickReport> {
        self.tick_at(Local::now().naive_local())
    }

    /// 以指定时间执行一个 tick
    ///
    /// 整个 tick 持有状态锁：读取托盘、调用 Model、写 View 作为一个原子单元，
    /// 保证工序与托盘同步更新、消息顺序与 tick 顺序一致。
    ///
    /// # 错误
    /// - Model 取托盘失败：状态保持空闲，不写 View
    /// - Model 入库失败：托盘仍停留在码垛工序，不写 View
    pub fn tick_at(&self, now: NaiveDateTime) -> ProductionResult<TickReport> {
        let mut state = self.lock_state()?;
        let timestamp = now.format(TIMESTAMP_FORMAT).to_string();

        let (pallet, stage) = match std::mem::replace(&mut *state, SchedulerState::Idle) {
            SchedulerState::Producing { pallet, stage } => (pallet, stage),
            SchedulerState::Idle => match self.model.next_pallet_to_produce()? {
                Some(pallet) => {
                    tracing::debug!(
                        order_id = pallet.order_id,
                        recipe = %pallet.recipe_name,
                        "接收新托盘"
                    );
                    (pallet, ProductionStage::first())
                }
                None => {
                    let message = format_idle_message(&timestamp);
                    tracing::debug!("没有待生产订单");
                    self.view.insert_to_production_box(&message);
                    return Ok(TickReport {
                        message,
                        outcome: TickOutcome::NoOrders,
                    });
                }
            },
        };

        let message = format_stage_message(&timestamp, &pallet, stage);
        let order_id = pallet.order_id;

        let outcome = if stage.is_final() {
            if let Err(err) = self.model.create_pallet(pallet.clone()) {
                *state = SchedulerState::Producing { pallet, stage };
                return Err(err.into());
            }
            tracing::info!(order_id, recipe = %pallet.recipe_name, "托盘码垛完成，已入库");
            TickOutcome::Completed { order_id }
        } else {
            tracing::debug!(order_id, stage = %stage, "工序推进");
            *state = SchedulerState::Producing {
                pallet,
                stage: stage.next(),
            };
            TickOutcome::Advanced { order_id, stage }
        };

        self.view.insert_to_production_box(&message);
        Ok(TickReport { message, outcome })
    }

    /// 下一个 tick 要执行的工序（空闲时恒为 Production）
    pub fn current_stage(&self) -> ProductionResult<ProductionStage> {
        let state = self.lock_state()?;
        Ok(match &*state {
            SchedulerState::Idle => ProductionStage::first(),
            SchedulerState::Producing { stage, .. } => *stage,
        })
    }

    /// 当前在制托盘的副本
    pub fn current_pallet(&self) -> ProductionResult<Option<Pallet>> {
        let state = self.lock_state()?;
        Ok(match &*state {
            SchedulerState::Idle => None,
            SchedulerState::Producing { pallet, .. } => Some(pallet.clone()),
        })
    }

    pub fn is_idle(&self) -> ProductionResult<bool> {
        Ok(*self.lock_state()? == SchedulerState::Idle)
    }

    fn lock_state(&self) -> ProductionResult<MutexGuard<'_, SchedulerState>> {
        self.state
            .lock()
            .map_err(|e| ProductionError::LockError(e.to_string()))
    }
}

/// 空闲消息: "<ts> - No orders to produce"
pub fn format_idle_message(timestamp: &str) -> String {
    format!("{} - No orders to produce", timestamp)
}

/// 工序消息: "<ts> - Order number <id>, <recipe> <activity>"
pub fn format_stage_message(timestamp: &str, pallet: &Pallet, stage: ProductionStage) -> String {
    format!(
        "{} - Order number {}, {} {}",
        timestamp,
        pallet.order_id,
        pallet.recipe_name,
        stage.activity()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::collaborators::NoOpProductionView;
    use crate::repository::error::{RepositoryError, RepositoryResult};
    use crate::repository::InMemoryPalletRepository;
    use crate::view::ProductionBox;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicUsize, Ordering};

    // ==========================================
    // 测试辅助函数
    // ==========================================

    fn ts() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 2)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap()
    }

    fn setup(
        pallets: Vec<Pallet>,
    ) -> (StageScheduler, Arc<InMemoryPalletRepository>, Arc<ProductionBox>) {
        let model = Arc::new(InMemoryPalletRepository::with_pending(pallets));
        let view = Arc::new(ProductionBox::default());
        let scheduler = StageScheduler::new(model.clone(), view.clone());
        (scheduler, model, view)
    }

    /// 入库总是失败的 Model
    struct FailingCommitModel {
        handed_out: AtomicUsize,
    }

    impl ProductionModel for FailingCommitModel {
        fn next_pallet_to_produce(&self) -> RepositoryResult<Option<Pallet>> {
            self.handed_out.fetch_add(1, Ordering::SeqCst);
            Ok(Some(Pallet::new(7, "Oat")))
        }

        fn create_pallet(&self, _pallet: Pallet) -> RepositoryResult<()> {
            Err(RepositoryError::DatabaseQueryError("disk full".to_string()))
        }
    }

    // ==========================================
    // 测试用例
    // ==========================================

    #[test]
    fn test_idle_tick_without_orders() {
        let (scheduler, model, view) = setup(vec![]);

        let report = scheduler.tick_at(ts()).unwrap();

        assert_eq!(report.outcome, TickOutcome::NoOrders);
        assert_eq!(report.message, "2026-03-02 08:30:00 - No orders to produce");
        assert_eq!(view.lines(), vec![report.message.clone()]);
        assert!(scheduler.is_idle().unwrap());
        assert_eq!(scheduler.current_stage().unwrap(), ProductionStage::Production);
        assert_eq!(model.completed_count(), 0);
    }

    #[test]
    fn test_freezing_message_format() {
        let (scheduler, _model, _view) = setup(vec![Pallet::new(42, "Choco Chip")]);

        scheduler.tick_at(ts()).unwrap();
        let report = scheduler.tick_at(ts()).unwrap();

        assert_eq!(
            report.message,
            "2026-03-02 08:30:00 - Order number 42, Choco Chip in freezing"
        );
        assert_eq!(
            report.outcome,
            TickOutcome::Advanced {
                order_id: 42,
                stage: ProductionStage::Freezing
            }
        );
    }

    #[test]
    fn test_full_cycle_takes_five_ticks() {
        let (scheduler, model, view) = setup(vec![Pallet::new(1, "Nut Ring")]);

        for expected in ProductionStage::ALL {
            assert_eq!(scheduler.current_stage().unwrap(), expected);
            scheduler.tick_at(ts()).unwrap();
        }

        assert_eq!(model.completed_count(), 1);
        assert!(scheduler.is_idle().unwrap());
        assert_eq!(scheduler.current_stage().unwrap(), ProductionStage::Production);

        let lines = view.lines();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].ends_with("Order number 1, Nut Ring in production"));
        assert!(lines[1].ends_with("Nut Ring in freezing"));
        assert!(lines[2].ends_with("Nut Ring in packaging in bags"));
        assert!(lines[3].ends_with("Nut Ring in packaging in cartons"));
        assert!(lines[4].ends_with("Nut Ring in loading on pallets"));
    }

    #[test]
    fn test_noop_view_still_advances() {
        let model = Arc::new(InMemoryPalletRepository::with_pending(vec![Pallet::new(3, "Oat")]));
        let scheduler = StageScheduler::new(model.clone(), Arc::new(NoOpProductionView));

        for _ in 0..5 {
            scheduler.tick_at(ts()).unwrap();
        }

        assert_eq!(model.completed(), vec![Pallet::new(3, "Oat")]);
    }

    #[test]
    fn test_commit_failure_keeps_pallet_at_final_stage() {
        let model = Arc::new(FailingCommitModel {
            handed_out: AtomicUsize::new(0),
        });
        let view = Arc::new(ProductionBox::default());
        let scheduler = StageScheduler::new(model.clone(), view.clone());

        for _ in 0..4 {
            scheduler.tick_at(ts()).unwrap();
        }
        let err = scheduler.tick_at(ts()).unwrap_err();

        assert!(matches!(err, ProductionError::Model(_)));
        assert_eq!(scheduler.current_stage().unwrap(), ProductionStage::PalletLoading);
        assert_eq!(scheduler.current_pallet().unwrap(), Some(Pallet::new(7, "Oat")));
        assert_eq!(view.len(), 4);
        assert_eq!(model.handed_out.load(Ordering::SeqCst), 1);
    }
}
