// ==========================================
// 饼干生产线 - 控制台进度视图
// ==========================================

use crate::engine::collaborators::ProductionView;

/// 逐行输出到 stdout，同时记录到 production_box target
#[derive(Debug, Clone, Default)]
pub struct ConsoleProductionView;

impl ProductionView for ConsoleProductionView {
    fn insert_to_production_box(&self, message: &str) {
        tracing::debug!(target: "production_box", "{}", message);
        println!("{}", message);
    }
}
