// ==========================================
// 饼干生产线 - 应用状态
// ==========================================
// 职责: 装配数据库、配置、Model、View 与生产控制器
// ==========================================

use std::sync::{Arc, Mutex};

use crate::config::{ConfigManager, ProductionConfig};
use crate::db::{ensure_schema, open_sqlite_connection};
use crate::engine::{ProductionController, ProductionView};
use crate::repository::SqlitePalletRepository;
use crate::view::{FanOutProductionView, ProductionBox};

/// 应用状态
///
/// 包含共享连接上的仓储、本次运行的配置与生产控制器
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 本次运行使用的生产配置
    pub config: ProductionConfig,

    /// 配置管理器
    pub config_manager: Arc<ConfigManager>,

    /// 托盘仓储（调度器的 Model）
    pub pallet_repo: Arc<SqlitePalletRepository>,

    /// 生产进度框（容量取自 production/box_capacity）
    pub production_box: Arc<ProductionBox>,

    /// 生产节拍控制器
    pub controller: ProductionController,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    /// - view: 额外的进度消息输出（与进度框同时接收）
    ///
    /// # 说明
    /// 该方法会：
    /// 1. 打开数据库并建表（幂等）
    /// 2. 从 config_kv 加载生产配置
    /// 3. 将上次运行中断的托盘退回待生产队列
    /// 4. 创建托盘仓储、进度框与生产控制器（不启动）
    pub fn new(db_path: String, view: Arc<dyn ProductionView>) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let conn = open_sqlite_connection(&db_path)
            .map_err(|e| format!("无法打开数据库: {}", e))?;
        ensure_schema(&conn).map_err(|e| format!("数据库建表失败: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        let config_manager = Arc::new(
            ConfigManager::from_connection(conn.clone())
                .map_err(|e| format!("无法初始化配置管理器: {}", e))?,
        );
        let config = config_manager
            .load_production_config()
            .map_err(|e| format!("无法加载生产配置: {}", e))?;

        let effective = serde_json::to_string(&config).unwrap_or_default();
        match config_manager.get_config_snapshot() {
            Ok(snapshot) => tracing::info!(
                effective = %effective,
                overrides = %snapshot,
                "生产配置已加载"
            ),
            Err(e) => tracing::warn!("配置快照读取失败: {}", e),
        }

        let pallet_repo = Arc::new(SqlitePalletRepository::from_connection(conn));
        pallet_repo
            .requeue_in_production()
            .map_err(|e| format!("无法恢复中断的托盘: {}", e))?;

        let production_box = Arc::new(ProductionBox::with_capacity(config.box_capacity));
        let fan_out = Arc::new(FanOutProductionView::new(vec![
            production_box.clone() as Arc<dyn ProductionView>,
            view,
        ]));
        let controller = ProductionController::from_config(&config, pallet_repo.clone(), fan_out)
            .map_err(|e| format!("无法创建生产控制器: {}", e))?;

        Ok(Self {
            db_path,
            config,
            config_manager,
            pallet_repo,
            production_box,
            controller,
        })
    }
}

/// 获取默认数据库路径
///
/// 优先级: KRUSTY_DB_PATH 环境变量 > 用户本地数据目录 > 当前目录
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    if let Ok(path) = std::env::var("KRUSTY_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./krusty_kookies.db");

    if let Some(data_dir) = dirs::data_local_dir() {
        let dir = data_dir.join("krusty-kookies");
        // 目录创建失败时退回当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("krusty_kookies.db");
        }
    }

    path.to_string_lossy().to_string()
}
