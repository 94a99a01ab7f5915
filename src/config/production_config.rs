// ==========================================
// 饼干生产线 - 生产节拍配置
// ==========================================
// 节拍: 一个完整周期 (5 道工序) 的总时长 run_time_secs
// tick 间隔 = run_time_secs / 5，取整方式可配置
// ==========================================

use crate::domain::ProductionStage;
use crate::engine::controller::tick_interval_for;
use crate::engine::error::{ProductionError, ProductionResult};
use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// 默认完整周期时长（秒）
pub const DEFAULT_RUN_TIME_SECS: u64 = 25;

/// 默认生产进度框保留行数
pub const DEFAULT_BOX_CAPACITY: usize = 500;

// ==========================================
// IntervalRounding - tick 间隔取整方式
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IntervalRounding {
    TruncateSeconds, // 截断到整秒 (run_time=12 → 2s)
    Exact,           // 精确除法 (run_time=12 → 2.4s)
}

impl IntervalRounding {
    pub fn as_str(&self) -> &str {
        match self {
            IntervalRounding::TruncateSeconds => "TRUNCATE_SECONDS",
            IntervalRounding::Exact => "EXACT",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "TRUNCATE_SECONDS" => Some(IntervalRounding::TruncateSeconds),
            "EXACT" => Some(IntervalRounding::Exact),
            _ => None,
        }
    }
}

impl Default for IntervalRounding {
    fn default() -> Self {
        IntervalRounding::TruncateSeconds
    }
}

impl fmt::Display for IntervalRounding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// ProductionConfig - 生产配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductionConfig {
    pub run_time_secs: u64,                 // 完整周期时长（秒）
    pub interval_rounding: IntervalRounding, // tick 间隔取整方式
    pub box_capacity: usize,                // 进度框保留行数
}

impl Default for ProductionConfig {
    fn default() -> Self {
        Self {
            run_time_secs: DEFAULT_RUN_TIME_SECS,
            interval_rounding: IntervalRounding::default(),
            box_capacity: DEFAULT_BOX_CAPACITY,
        }
    }
}

impl ProductionConfig {
    pub fn with_run_time(run_time_secs: u64) -> Self {
        Self {
            run_time_secs,
            ..Self::default()
        }
    }

    /// 推导 tick 间隔
    ///
    /// # 错误
    /// - 间隔为 0（例如截断模式下 run_time_secs < 5）时返回 `InvalidConfig`
    pub fn tick_interval(&self) -> ProductionResult<Duration> {
        match self.interval_rounding {
            IntervalRounding::TruncateSeconds => {
                let secs = self.run_time_secs / u64::from(ProductionStage::COUNT);
                if secs == 0 {
                    return Err(ProductionError::InvalidConfig(format!(
                        "run_time_secs={} 截断后 tick 间隔为 0",
                        self.run_time_secs
                    )));
                }
                Ok(Duration::from_secs(secs))
            }
            IntervalRounding::Exact => tick_interval_for(Duration::from_secs(self.run_time_secs)),
        }
    }
}
