// ==========================================
// 饼干生产线 - 生产进度框
// ==========================================
// 固定容量的滚动消息列表，超出容量时丢弃最早的行
// ==========================================

use crate::config::production_config::DEFAULT_BOX_CAPACITY;
use crate::engine::collaborators::ProductionView;
use std::collections::VecDeque;
use std::sync::Mutex;

pub struct ProductionBox {
    capacity: usize,
    lines: Mutex<VecDeque<String>>,
}

impl ProductionBox {
    /// 创建进度框（容量至少为 1）
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            lines: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// 当前所有行的快照（从旧到新）
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .map(|lines| lines.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn last(&self) -> Option<String> {
        self.lines.lock().ok().and_then(|lines| lines.back().cloned())
    }

    pub fn len(&self) -> usize {
        self.lines.lock().map(|lines| lines.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ProductionBox {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_BOX_CAPACITY)
    }
}

impl ProductionView for ProductionBox {
    fn insert_to_production_box(&self, message: &str) {
        match self.lines.lock() {
            Ok(mut lines) => {
                if lines.len() == self.capacity {
                    lines.pop_front();
                }
                lines.push_back(message.to_string());
            }
            Err(e) => tracing::warn!("生产进度框锁获取失败，丢弃消息: {}", e),
        }
    }
}
