// ==========================================
// 饼干生产线 - 生产节拍控制器
// ==========================================
// 职责: 持有周期定时任务，按固定节拍驱动 StageScheduler
// 节拍: interval = run_time / 5，首个 tick 立即触发
// 生命周期: start() 启动后台任务，stop() 通知退出并等待结束
// ==========================================

use crate::config::ProductionConfig;
use crate::domain::ProductionStage;
use crate::engine::collaborators::{ProductionModel, ProductionView};
use crate::engine::error::{ProductionError, ProductionResult};
use crate::engine::stage_scheduler::StageScheduler;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

/// 由一个完整周期的总时长推导 tick 间隔（精确除以工序数）
///
/// # 错误
/// - 推导出的间隔为 0 时返回 `InvalidConfig`
pub fn tick_interval_for(run_time: Duration) -> ProductionResult<Duration> {
    let tick = run_time / ProductionStage::COUNT;
    if tick.is_zero() {
        return Err(ProductionError::InvalidConfig(format!(
            "run_time={:?} 推导出的 tick 间隔为 0",
            run_time
        )));
    }
    Ok(tick)
}

/// 运行中的后台任务
struct RunningTask {
    shutdown_tx: oneshot::Sender<()>,
    handle: JoinHandle<u64>,
}

// ==========================================
// ProductionController - 生产节拍控制器
// ==========================================
pub struct ProductionController {
    scheduler: Arc<StageScheduler>,
    interval: Duration,
    running: Mutex<Option<RunningTask>>,
}

impl ProductionController {
    /// 创建控制器
    ///
    /// # 参数
    /// - `scheduler`: 工序推进调度器
    /// - `interval`: tick 间隔，必须为正
    pub fn new(scheduler: Arc<StageScheduler>, interval: Duration) -> ProductionResult<Self> {
        if interval.is_zero() {
            return Err(ProductionError::InvalidConfig(
                "tick 间隔必须为正".to_string(),
            ));
        }

        Ok(Self {
            scheduler,
            interval,
            running: Mutex::new(None),
        })
    }

    /// 按完整周期总时长创建控制器（interval = run_time / 5）
    pub fn with_run_time(
        run_time: Duration,
        model: Arc<dyn ProductionModel>,
        view: Arc<dyn ProductionView>,
    ) -> ProductionResult<Self> {
        let tick = tick_interval_for(run_time)?;
        Self::new(Arc::new(StageScheduler::new(model, view)), tick)
    }

    /// 按生产配置创建控制器（遵循配置中的取整方式）
    pub fn from_config(
        config: &ProductionConfig,
        model: Arc<dyn ProductionModel>,
        view: Arc<dyn ProductionView>,
    ) -> ProductionResult<Self> {
        let tick = config.tick_interval()?;
        Self::new(Arc::new(StageScheduler::new(model, view)), tick)
    }

    pub fn scheduler(&self) -> &Arc<StageScheduler> {
        &self.scheduler
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// 启动后台定时任务（需在 tokio 运行时内调用）
    ///
    /// # 错误
    /// - 已在运行时返回 `AlreadyRunning`
    pub fn start(&self) -> ProductionResult<()> {
        let mut running = self.lock_running()?;
        if let Some(task) = running.as_ref() {
            if !task.handle.is_finished() {
                return Err(ProductionError::AlreadyRunning);
            }
        }

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let handle = tokio::spawn(run_production_loop(
            self.scheduler.clone(),
            self.interval,
            shutdown_rx,
        ));

        tracing::info!(interval_ms = self.interval.as_millis() as u64, "生产控制器已启动");
        *running = Some(RunningTask {
            shutdown_tx,
            handle,
        });
        Ok(())
    }

    /// 停止后台定时任务
    ///
    /// # 返回
    /// - 本次运行累计执行的 tick 数
    ///
    /// # 错误
    /// - 未启动时返回 `NotRunning`
    pub async fn stop(&self) -> ProductionResult<u64> {
        let task = self.lock_running()?.take().ok_or(ProductionError::NotRunning)?;

        // 任务可能已自行退出，发送失败无需处理
        let _ = task.shutdown_tx.send(());
        let ticks = task
            .handle
            .await
            .map_err(|e| ProductionError::TaskJoin(e.to_string()))?;

        tracing::info!(ticks, "生产控制器已停止");
        Ok(ticks)
    }

    pub fn is_running(&self) -> bool {
        self.running
            .lock()
            .map(|running| {
                running
                    .as_ref()
                    .map(|task| !task.handle.is_finished())
                    .unwrap_or(false)
            })
            .unwrap_or(false)
    }

    fn lock_running(&self) -> ProductionResult<std::sync::MutexGuard<'_, Option<RunningTask>>> {
        self.running
            .lock()
            .map_err(|e| ProductionError::LockError(e.to_string()))
    }
}

/// 定时循环：固定延迟节拍，单任务串行执行 tick
///
/// tick 内含同步 SQLite 访问，放到阻塞线程池执行并等待完成后才进入下一个节拍。
/// tick 出错只记录日志，等待下一个节拍（不提前重试）
async fn run_production_loop(
    scheduler: Arc<StageScheduler>,
    period: Duration,
    mut shutdown_rx: oneshot::Receiver<()>,
) -> u64 {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut ticks = 0u64;

    loop {
        tokio::select! {
            biased;
            _ = &mut shutdown_rx => break,
            _ = ticker.tick() => {
                ticks += 1;
                let scheduler = scheduler.clone();
                match tokio::task::spawn_blocking(move || scheduler.tick()).await {
                    Ok(Ok(_report)) => {}
                    Ok(Err(err)) => {
                        tracing::error!(tick = ticks, error = %err, "生产 tick 执行失败");
                    }
                    Err(err) => {
                        tracing::error!(tick = ticks, error = %err, "生产 tick 任务异常退出");
                    }
                }
            }
        }
    }

    ticks
}
