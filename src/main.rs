// ==========================================
// 饼干生产线仿真 - 主入口
// ==========================================
// 用法:
//   krusty-kookies [db_path]
// Ctrl-C 停止生产
// ==========================================

use anyhow::{anyhow, Context};
use krusty_kookies::app::{get_default_db_path, AppState};
use krusty_kookies::view::ConsoleProductionView;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    krusty_kookies::logging::init();

    tracing::info!("==================================================");
    tracing::info!("{}", krusty_kookies::APP_NAME);
    tracing::info!("系统版本: {}", krusty_kookies::VERSION);
    tracing::info!("==================================================");

    let db_path = std::env::args()
        .nth(1)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(get_default_db_path);
    tracing::info!("使用数据库: {}", db_path);

    let app_state = AppState::new(db_path, Arc::new(ConsoleProductionView))
        .map_err(|e| anyhow!(e))
        .context("无法初始化AppState")?;

    match app_state.pallet_repo.count_pending() {
        Ok(pending) => tracing::info!(pending, "待生产托盘"),
        Err(e) => tracing::warn!("待生产托盘统计失败: {}", e),
    }

    app_state.controller.start()?;

    tokio::signal::ctrl_c()
        .await
        .context("等待 Ctrl-C 信号失败")?;
    tracing::info!("收到停止信号");

    let ticks = app_state.controller.stop().await?;
    tracing::info!(ticks, "生产线已停止");
    Ok(())
}
