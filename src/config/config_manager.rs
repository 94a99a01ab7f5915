// ==========================================
// 饼干生产线 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::production_config::{
    IntervalRounding, ProductionConfig, DEFAULT_BOX_CAPACITY, DEFAULT_RUN_TIME_SECS,
};
use crate::db::open_sqlite_connection;
use rusqlite::{params, Connection};
use serde_json::json;
use std::collections::HashMap;
use std::error::Error;
use std::sync::{Arc, Mutex};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 读取 global scope 的配置值（公开方法，供其他模块复用）
    pub fn get_global_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        self.get_config_value(key)
    }

    /// 写入 global scope 的配置值（存在则覆盖）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        Ok(())
    }

    /// 从 config_kv 表读取配置值，带默认值
    fn get_config_or_default(&self, key: &str, default: &str) -> Result<String, Box<dyn Error>> {
        Ok(self.get_config_value(key)?.unwrap_or_else(|| default.to_string()))
    }

    /// 获取所有配置的快照（JSON格式）
    ///
    /// # 用途
    /// - 启动时记录本次运行使用的配置
    pub fn get_config_snapshot(&self) -> Result<String, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt = conn.prepare(
            "SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key"
        )?;

        let mut config_map: HashMap<String, String> = HashMap::new();
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
            ))
        })?;

        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        let json_value = json!(config_map);
        Ok(serde_json::to_string(&json_value)?)
    }

    // ===== 生产节拍配置 =====

    /// 获取完整周期时长（秒，默认 25）
    pub fn get_run_time_secs(&self) -> Result<u64, Box<dyn Error>> {
        let default = DEFAULT_RUN_TIME_SECS.to_string();
        let value = self.get_config_or_default(config_keys::RUN_TIME_SECS, &default)?;
        Ok(value.trim().parse::<u64>().unwrap_or_else(|_| {
            tracing::warn!(
                config_key = config_keys::RUN_TIME_SECS,
                raw_value = %value,
                "周期时长配置格式错误，使用默认值"
            );
            DEFAULT_RUN_TIME_SECS
        }))
    }

    /// 获取 tick 间隔取整方式（默认 TRUNCATE_SECONDS）
    pub fn get_interval_rounding(&self) -> Result<IntervalRounding, Box<dyn Error>> {
        let value = self.get_config_or_default(config_keys::INTERVAL_ROUNDING, "TRUNCATE_SECONDS")?;
        Ok(IntervalRounding::from_str(&value).unwrap_or_default())
    }

    /// 获取进度框保留行数（默认 500）
    pub fn get_box_capacity(&self) -> Result<usize, Box<dyn Error>> {
        let default = DEFAULT_BOX_CAPACITY.to_string();
        let value = self.get_config_or_default(config_keys::BOX_CAPACITY, &default)?;
        Ok(value.trim().parse::<usize>().unwrap_or_else(|_| {
            tracing::warn!(
                config_key = config_keys::BOX_CAPACITY,
                raw_value = %value,
                "进度框容量配置格式错误，使用默认值"
            );
            DEFAULT_BOX_CAPACITY
        }))
    }

    /// 加载完整生产配置
    pub fn load_production_config(&self) -> Result<ProductionConfig, Box<dyn Error>> {
        Ok(ProductionConfig {
            run_time_secs: self.get_run_time_secs()?,
            interval_rounding: self.get_interval_rounding()?,
            box_capacity: self.get_box_capacity()?,
        })
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 生产节拍
    pub const RUN_TIME_SECS: &str = "production/run_time_secs";
    pub const INTERVAL_ROUNDING: &str = "production/interval_rounding";

    // 进度视图
    pub const BOX_CAPACITY: &str = "production/box_capacity";
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::ensure_schema;

    fn setup() -> ConfigManager {
        let conn = Connection::open_in_memory().unwrap();
        ensure_schema(&conn).unwrap();
        ConfigManager::from_connection(Arc::new(Mutex::new(conn))).unwrap()
    }

    #[test]
    fn test_defaults_when_table_empty() {
        let manager = setup();
        let config = manager.load_production_config().unwrap();
        assert_eq!(config, ProductionConfig::default());
    }

    #[test]
    fn test_overrides_are_read_back() {
        let manager = setup();
        manager.set_global_config_value(config_keys::RUN_TIME_SECS, "10").unwrap();
        manager.set_global_config_value(config_keys::INTERVAL_ROUNDING, "exact").unwrap();
        manager.set_global_config_value(config_keys::BOX_CAPACITY, "20").unwrap();

        let config = manager.load_production_config().unwrap();
        assert_eq!(config.run_time_secs, 10);
        assert_eq!(config.interval_rounding, IntervalRounding::Exact);
        assert_eq!(config.box_capacity, 20);
    }

    #[test]
    fn test_malformed_run_time_falls_back_to_default() {
        let manager = setup();
        manager.set_global_config_value(config_keys::RUN_TIME_SECS, "ten").unwrap();
        assert_eq!(manager.get_run_time_secs().unwrap(), DEFAULT_RUN_TIME_SECS);
    }

    #[test]
    fn test_malformed_box_capacity_falls_back_to_default() {
        let manager = setup();
        manager.set_global_config_value(config_keys::BOX_CAPACITY, "many").unwrap();
        assert_eq!(manager.get_box_capacity().unwrap(), DEFAULT_BOX_CAPACITY);

        manager.set_global_config_value(config_keys::BOX_CAPACITY, "-3").unwrap();
        assert_eq!(manager.load_production_config().unwrap().box_capacity, DEFAULT_BOX_CAPACITY);
    }

    #[test]
    fn test_snapshot_contains_overrides() {
        let manager = setup();
        manager.set_global_config_value(config_keys::RUN_TIME_SECS, "30").unwrap();
        manager.set_global_config_value(config_keys::RUN_TIME_SECS, "35").unwrap();

        let snapshot: HashMap<String, String> =
            serde_json::from_str(&manager.get_config_snapshot().unwrap()).unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[config_keys::RUN_TIME_SECS], "35");
    }
}
