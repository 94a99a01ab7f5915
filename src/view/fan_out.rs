// ==========================================
// 饼干生产线 - 多路进度视图
// ==========================================

use crate::engine::collaborators::ProductionView;
use std::sync::Arc;

/// 按注册顺序把同一行消息转发给每个视图
pub struct FanOutProductionView {
    views: Vec<Arc<dyn ProductionView>>,
}

impl FanOutProductionView {
    pub fn new(views: Vec<Arc<dyn ProductionView>>) -> Self {
        Self { views }
    }
}

impl ProductionView for FanOutProductionView {
    fn insert_to_production_box(&self, message: &str) {
        for view in &self.views {
            view.insert_to_production_box(message);
        }
    }
}
