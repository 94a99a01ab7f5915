// ==========================================
// 饼干生产线 - 托盘数据仓储 (SQLite)
// ==========================================
// 表: production_queue (待生产队列) / pallet (已入库托盘)
// 队列状态: PENDING → IN_PRODUCTION → DONE
// 红线: Repository 不含调度逻辑，只负责数据访问
// ==========================================

use crate::domain::{Pallet, ProducedPallet, ProductionOrder, QueueStatus};
use crate::engine::collaborators::ProductionModel;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::Local;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn now_str() -> String {
    Local::now().format(DATETIME_FORMAT).to_string()
}

// ==========================================
// SqlitePalletRepository - 托盘仓储
// ==========================================
pub struct SqlitePalletRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SqlitePalletRepository {
    /// 创建新的 SqlitePalletRepository 实例
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = crate::db::open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 订单行入队：按托盘数展开为多条 PENDING 记录
    ///
    /// # 返回
    /// - 入队的托盘数
    pub fn enqueue_order(&self, order: &ProductionOrder) -> RepositoryResult<usize> {
        if order.recipe_name.trim().is_empty() {
            return Err(RepositoryError::ValidationError(format!(
                "订单 {} 缺少配方名",
                order.order_id
            )));
        }

        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;
        let enqueued_at = now_str();
        for pallet in order.pallets() {
            tx.execute(
                r#"
                INSERT INTO production_queue (order_id, recipe_name, status, enqueued_at)
                VALUES (?1, ?2, ?3, ?4)
                "#,
                params![
                    pallet.order_id,
                    pallet.recipe_name,
                    QueueStatus::Pending.as_str(),
                    enqueued_at
                ],
            )?;
        }
        tx.commit()?;

        tracing::debug!(
            order_id = order.order_id,
            pallet_count = order.pallet_count,
            "订单已入队"
        );
        Ok(order.pallet_count as usize)
    }

    /// 将残留的 IN_PRODUCTION 记录退回 PENDING
    ///
    /// 调度器状态不落库：进程在托盘周期中途退出后，启动时调用此方法，
    /// 被中断的托盘会按原入队顺序重新从 Production 开始
    ///
    /// # 返回
    /// - 退回的记录数
    pub fn requeue_in_production(&self) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let requeued = conn.execute(
            "UPDATE production_queue SET status = ?1, started_at = NULL WHERE status = ?2",
            params![QueueStatus::Pending.as_str(), QueueStatus::InProduction.as_str()],
        )?;

        if requeued > 0 {
            tracing::warn!(requeued, "上次运行中断的托盘已退回待生产队列");
        }
        Ok(requeued)
    }

    /// 待生产托盘数
    pub fn count_pending(&self) -> RepositoryResult<i64> {
        self.count_by_status(QueueStatus::Pending)
    }

    /// 指定状态的队列记录数
    pub fn count_by_status(&self, status: QueueStatus) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let count = conn.query_row(
            "SELECT COUNT(*) FROM production_queue WHERE status = ?1",
            params![status.as_str()],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// 查询订单已入库的托盘（按入库顺序）
    pub fn list_pallets_for_order(&self, order_id: i64) -> RepositoryResult<Vec<ProducedPallet>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT pallet_id, order_id, recipe_name, produced_at
            FROM pallet
            WHERE order_id = ?1
            ORDER BY pallet_id
            "#,
        )?;

        let pallets = stmt
            .query_map(params![order_id], |row| {
                Ok(ProducedPallet {
                    pallet_id: row.get(0)?,
                    order_id: row.get(1)?,
                    recipe_name: row.get(2)?,
                    produced_at: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(pallets)
    }
}

// ==========================================
// ProductionModel Trait 实现
// ==========================================
impl ProductionModel for SqlitePalletRepository {
    /// 取最早入队的 PENDING 记录，置为 IN_PRODUCTION
    fn next_pallet_to_produce(&self) -> RepositoryResult<Option<Pallet>> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        let next: Option<(i64, i64, String)> = tx
            .query_row(
                r#"
                SELECT queue_id, order_id, recipe_name
                FROM production_queue
                WHERE status = ?1
                ORDER BY queue_id
                LIMIT 1
                "#,
                params![QueueStatus::Pending.as_str()],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()?;

        let Some((queue_id, order_id, recipe_name)) = next else {
            return Ok(None);
        };

        tx.execute(
            "UPDATE production_queue SET status = ?1, started_at = ?2 WHERE queue_id = ?3",
            params![QueueStatus::InProduction.as_str(), now_str(), queue_id],
        )?;
        tx.commit()?;

        Ok(Some(Pallet::new(order_id, recipe_name)))
    }

    /// 写入 pallet 表，并将对应的 IN_PRODUCTION 记录置为 DONE（同一事务）
    fn create_pallet(&self, pallet: Pallet) -> RepositoryResult<()> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        let queue_id: Option<i64> = tx
            .query_row(
                r#"
                SELECT queue_id FROM production_queue
                WHERE status = ?1 AND order_id = ?2 AND recipe_name = ?3
                ORDER BY queue_id
                LIMIT 1
                "#,
                params![
                    QueueStatus::InProduction.as_str(),
                    pallet.order_id,
                    pallet.recipe_name
                ],
                |row| row.get(0),
            )
            .optional()?;

        let queue_id = queue_id.ok_or_else(|| RepositoryError::InvalidStateTransition {
            from: format!("order_id={} (无 IN_PRODUCTION 记录)", pallet.order_id),
            to: QueueStatus::Done.to_string(),
        })?;

        tx.execute(
            r#"
            INSERT INTO pallet (order_id, recipe_name, produced_at)
            VALUES (?1, ?2, ?3)
            "#,
            params![pallet.order_id, pallet.recipe_name, now_str()],
        )?;
        tx.execute(
            "UPDATE production_queue SET status = ?1 WHERE queue_id = ?2",
            params![QueueStatus::Done.as_str(), queue_id],
        )?;
        tx.commit()?;
        Ok(())
    }
}
