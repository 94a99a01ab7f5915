// ==========================================
// 饼干生产线 - 领域类型定义
// ==========================================
// 工序: 生产 → 冷冻 → 装袋 → 装箱 → 码垛
// 红线: 工序只能逐个推进,不可跳过,不可重复
// ==========================================

use std::fmt;

// ==========================================
// 生产工序 (Production Stage)
// ==========================================
// 顺序: Production < Freezing < BaggingPackaging < CartonPackaging < PalletLoading
// 循环: PalletLoading 之后回到 Production (下一个托盘)
// 序列化格式: SCREAMING_SNAKE_CASE
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProductionStage {
    Production,       // 生产
    Freezing,         // 冷冻
    BaggingPackaging, // 装袋
    CartonPackaging,  // 装箱
    PalletLoading,    // 码垛
}

impl ProductionStage {
    /// 全部工序 (按流水线顺序)
    pub const ALL: [ProductionStage; 5] = [
        ProductionStage::Production,
        ProductionStage::Freezing,
        ProductionStage::BaggingPackaging,
        ProductionStage::CartonPackaging,
        ProductionStage::PalletLoading,
    ];

    /// 一个完整周期的工序数
    pub const COUNT: u32 = 5;

    /// 第一道工序
    pub fn first() -> Self {
        ProductionStage::Production
    }

    /// 下一道工序
    ///
    /// 码垛之后回到生产,循环是显式的
    pub fn next(self) -> Self {
        match self {
            ProductionStage::Production => ProductionStage::Freezing,
            ProductionStage::Freezing => ProductionStage::BaggingPackaging,
            ProductionStage::BaggingPackaging => ProductionStage::CartonPackaging,
            ProductionStage::CartonPackaging => ProductionStage::PalletLoading,
            ProductionStage::PalletLoading => ProductionStage::Production,
        }
    }

    /// 是否为最后一道工序 (完成后交回 Model)
    pub fn is_final(self) -> bool {
        self == ProductionStage::PalletLoading
    }

    /// 进度描述 (拼接在配方名之后)
    pub fn activity(self) -> &'static str {
        match self {
            ProductionStage::Production => "in production",
            ProductionStage::Freezing => "in freezing",
            ProductionStage::BaggingPackaging => "in packaging in bags",
            ProductionStage::CartonPackaging => "in packaging in cartons",
            ProductionStage::PalletLoading => "in loading on pallets",
        }
    }

    /// 转换为数据库/配置字符串
    pub fn as_str(&self) -> &str {
        match self {
            ProductionStage::Production => "PRODUCTION",
            ProductionStage::Freezing => "FREEZING",
            ProductionStage::BaggingPackaging => "BAGGING_PACKAGING",
            ProductionStage::CartonPackaging => "CARTON_PACKAGING",
            ProductionStage::PalletLoading => "PALLET_LOADING",
        }
    }
}

impl Default for ProductionStage {
    fn default() -> Self {
        ProductionStage::first()
    }
}

impl fmt::Display for ProductionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 排产队列状态 (Queue Status)
// ==========================================
// 生命周期: PENDING → IN_PRODUCTION → DONE
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueStatus {
    Pending,      // 等待生产
    InProduction, // 生产中 (已交给调度器)
    Done,         // 已码垛入库
}

impl QueueStatus {
    pub fn as_str(&self) -> &str {
        match self {
            QueueStatus::Pending => "PENDING",
            QueueStatus::InProduction => "IN_PRODUCTION",
            QueueStatus::Done => "DONE",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(QueueStatus::Pending),
            "IN_PRODUCTION" => Some(QueueStatus::InProduction),
            "DONE" => Some(QueueStatus::Done),
            _ => None,
        }
    }
}

impl fmt::Display for QueueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
