// ==========================================
// 饼干生产线 - 托盘领域模型
// ==========================================
// 托盘: 一批在制品,关联订单号与配方名
// 生命周期: Model 选中 → 调度器独占 → 码垛完成交回 Model
// ==========================================

// ==========================================
// Pallet - 在制托盘
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pallet {
    pub order_id: i64,       // 订单号
    pub recipe_name: String, // 配方名 (如 "Choco Chip")
}

impl Pallet {
    pub fn new(order_id: i64, recipe_name: impl Into<String>) -> Self {
        Self {
            order_id,
            recipe_name: recipe_name.into(),
        }
    }
}

// ==========================================
// ProductionOrder - 生产订单行
// ==========================================
// 一个订单行按托盘数展开为多个待生产托盘
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductionOrder {
    pub order_id: i64,
    pub recipe_name: String,
    pub pallet_count: u32, // 需要生产的托盘数
}

impl ProductionOrder {
    pub fn new(order_id: i64, recipe_name: impl Into<String>, pallet_count: u32) -> Self {
        Self {
            order_id,
            recipe_name: recipe_name.into(),
            pallet_count,
        }
    }

    /// 展开为待生产托盘
    pub fn pallets(&self) -> impl Iterator<Item = Pallet> + '_ {
        (0..self.pallet_count).map(move |_| Pallet::new(self.order_id, self.recipe_name.clone()))
    }
}

// ==========================================
// ProducedPallet - 已入库托盘 (持久化视图)
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProducedPallet {
    pub pallet_id: i64,
    pub order_id: i64,
    pub recipe_name: String,
    pub produced_at: String, // "%Y-%m-%d %H:%M:%S"
}
