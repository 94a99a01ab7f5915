// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的数据库初始化、测试数据生成等功能
// ==========================================
#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use krusty_kookies::config::ConfigManager;
use krusty_kookies::db::{ensure_schema, open_sqlite_connection};
use krusty_kookies::domain::Pallet;
use rusqlite::Connection;
use std::error::Error;
use tempfile::NamedTempFile;

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file
        .path()
        .to_str()
        .ok_or("临时文件路径不是 UTF-8")?
        .to_string();

    let conn = open_sqlite_connection(&db_path)?;
    ensure_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// 打开测试数据库连接
pub fn open_test_connection(db_path: &str) -> Result<Connection, Box<dyn Error>> {
    Ok(open_sqlite_connection(db_path)?)
}

/// 写入生产节拍配置
pub fn insert_run_time_config(db_path: &str, run_time_secs: u64) -> Result<(), Box<dyn Error>> {
    let manager = ConfigManager::new(db_path)?;
    manager.set_global_config_value(
        krusty_kookies::config::config_keys::RUN_TIME_SECS,
        &run_time_secs.to_string(),
    )?;
    Ok(())
}

/// 固定的 tick 时间戳
pub fn fixed_ts() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 1, 15)
        .unwrap()
        .and_hms_opt(10, 0, 0)
        .unwrap()
}

/// 生成 n 个托盘（订单号 1..=n）
pub fn numbered_pallets(n: i64, recipe_name: &str) -> Vec<Pallet> {
    (1..=n).map(|id| Pallet::new(id, recipe_name)).collect()
}
