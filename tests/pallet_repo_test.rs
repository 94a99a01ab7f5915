// ==========================================
// 托盘仓储集成测试
// ==========================================
// 测试目标: 验证 入队 → 出队 → 入库 的队列状态流转
// ==========================================

mod test_helpers;

use krusty_kookies::db::{read_schema_version, CURRENT_SCHEMA_VERSION};
use krusty_kookies::domain::{Pallet, ProductionOrder, QueueStatus};
use krusty_kookies::engine::{ProductionModel, StageScheduler, TickOutcome};
use krusty_kookies::repository::{RepositoryError, SqlitePalletRepository};
use krusty_kookies::view::ProductionBox;
use std::sync::Arc;

use test_helpers::{create_test_db, fixed_ts, open_test_connection};

#[test]
fn test_schema_version_recorded_once() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let conn = open_test_connection(&db_path).unwrap();

    krusty_kookies::db::ensure_schema(&conn).unwrap();

    assert_eq!(read_schema_version(&conn).unwrap(), Some(CURRENT_SCHEMA_VERSION));
}

#[test]
fn test_enqueue_expands_pallet_count() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let repo = SqlitePalletRepository::new(&db_path).unwrap();

    let enqueued = repo
        .enqueue_order(&ProductionOrder::new(100, "Tango", 3))
        .unwrap();

    assert_eq!(enqueued, 3);
    assert_eq!(repo.count_pending().unwrap(), 3);
}

#[test]
fn test_enqueue_rejects_blank_recipe() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let repo = SqlitePalletRepository::new(&db_path).unwrap();

    let err = repo
        .enqueue_order(&ProductionOrder::new(1, "  ", 1))
        .unwrap_err();

    assert!(matches!(err, RepositoryError::ValidationError(_)));
    assert_eq!(repo.count_pending().unwrap(), 0);
}

#[test]
fn test_next_pallet_is_fifo_and_marks_in_production() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let repo = SqlitePalletRepository::new(&db_path).unwrap();
    repo.enqueue_order(&ProductionOrder::new(1, "Tango", 1)).unwrap();
    repo.enqueue_order(&ProductionOrder::new(2, "Amneris", 1)).unwrap();

    let first = repo.next_pallet_to_produce().unwrap();

    assert_eq!(first, Some(Pallet::new(1, "Tango")));
    assert_eq!(repo.count_pending().unwrap(), 1);
    assert_eq!(repo.count_by_status(QueueStatus::InProduction).unwrap(), 1);

    let second = repo.next_pallet_to_produce().unwrap();
    assert_eq!(second, Some(Pallet::new(2, "Amneris")));
    assert_eq!(repo.next_pallet_to_produce().unwrap(), None);
}

#[test]
fn test_create_pallet_commits_and_marks_done() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let repo = SqlitePalletRepository::new(&db_path).unwrap();
    repo.enqueue_order(&ProductionOrder::new(7, "Berliner", 2)).unwrap();

    let pallet = repo.next_pallet_to_produce().unwrap().unwrap();
    repo.create_pallet(pallet).unwrap();

    let produced = repo.list_pallets_for_order(7).unwrap();
    assert_eq!(produced.len(), 1);
    assert_eq!(produced[0].order_id, 7);
    assert_eq!(repo.count_by_status(QueueStatus::Done).unwrap(), 1);
    assert_eq!(repo.count_by_status(QueueStatus::InProduction).unwrap(), 0);
    assert_eq!(repo.count_pending().unwrap(), 1);
}

#[test]
fn test_create_pallet_without_hand_out_is_rejected() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let repo = SqlitePalletRepository::new(&db_path).unwrap();

    let err = repo.create_pallet(Pallet::new(99, "Ghost")).unwrap_err();

    assert!(matches!(err, RepositoryError::InvalidStateTransition { .. }));
    assert!(repo.list_pallets_for_order(99).unwrap().is_empty());
}

// ==========================================
// 中断恢复
// ==========================================

#[test]
fn test_interrupted_pallet_is_requeued_on_restart() {
    let (_temp_file, db_path) = create_test_db().unwrap();

    {
        let repo = Arc::new(SqlitePalletRepository::new(&db_path).unwrap());
        repo.enqueue_order(&ProductionOrder::new(42, "Choco Chip", 1)).unwrap();

        // 进程在 Freezing 工序时退出
        let scheduler = StageScheduler::new(repo.clone(), Arc::new(ProductionBox::default()));
        scheduler.tick_at(fixed_ts()).unwrap();
        scheduler.tick_at(fixed_ts()).unwrap();
        assert_eq!(repo.count_by_status(QueueStatus::InProduction).unwrap(), 1);
        assert_eq!(repo.count_pending().unwrap(), 0);
    }

    let repo = Arc::new(SqlitePalletRepository::new(&db_path).unwrap());
    assert_eq!(repo.requeue_in_production().unwrap(), 1);
    assert_eq!(repo.count_pending().unwrap(), 1);
    assert_eq!(repo.count_by_status(QueueStatus::InProduction).unwrap(), 0);

    let view = Arc::new(ProductionBox::default());
    let scheduler = StageScheduler::new(repo.clone(), view.clone());
    let mut last = None;
    for _ in 0..5 {
        last = Some(scheduler.tick_at(fixed_ts()).unwrap().outcome);
    }

    assert_eq!(last, Some(TickOutcome::Completed { order_id: 42 }));
    assert_eq!(repo.list_pallets_for_order(42).unwrap().len(), 1);
    assert!(view.lines()[0].ends_with("Choco Chip in production"));
    assert_eq!(repo.count_by_status(QueueStatus::Done).unwrap(), 1);
}

#[test]
fn test_requeue_without_interrupted_rows_is_noop() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let repo = SqlitePalletRepository::new(&db_path).unwrap();
    repo.enqueue_order(&ProductionOrder::new(7, "Tango", 2)).unwrap();

    assert_eq!(repo.requeue_in_production().unwrap(), 0);
    assert_eq!(repo.count_pending().unwrap(), 2);
}
