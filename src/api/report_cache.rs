// ==========================================
// 销售分析与采购建议系统 - 报表缓存
// ==========================================
// 键: (分析窗口, 门店范围)
// 值: 回读的已存汇总行（未投影）；投影与分档按每次调用的参数重算
// 过期: 写入后超过 TTL 视为未命中
// 失效: 每次刷新结果集后整体清空
// ==========================================

use crate::config::config_manager::DEFAULT_CACHE_TTL_SECONDS;
use crate::domain::sales::SalesAggregate;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// 缓存键
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReportCacheKey {
    pub analysis_window_days: u32,
    pub store_id: Option<i64>, // None = 全部门店
}

impl ReportCacheKey {
    pub fn new(analysis_window_days: u32, store_id: Option<i64>) -> Self {
        Self {
            analysis_window_days,
            store_id,
        }
    }
}

#[derive(Clone)]
struct CacheEntry {
    rows: Arc<Vec<SalesAggregate>>,
    inserted_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self, ttl: Duration) -> bool {
        self.inserted_at.elapsed() > ttl
    }
}

pub struct ReportCache {
    ttl: Duration,
    entries: Mutex<HashMap<ReportCacheKey, CacheEntry>>,
}

impl Default for ReportCache {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_CACHE_TTL_SECONDS))
    }
}

impl ReportCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    // 缓存内容可随时重建，锁中毒时直接沿用内部数据
    fn entries(&self) -> MutexGuard<'_, HashMap<ReportCacheKey, CacheEntry>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// 命中且未过期时返回结果；过期项顺带移除
    pub fn get(&self, key: ReportCacheKey) -> Option<Arc<Vec<SalesAggregate>>> {
        let mut entries = self.entries();
        match entries.get(&key) {
            Some(entry) if !entry.is_expired(self.ttl) => Some(Arc::clone(&entry.rows)),
            Some(_) => {
                entries.remove(&key);
                None
            }
            None => None,
        }
    }

    pub fn insert(&self, key: ReportCacheKey, rows: Vec<SalesAggregate>) -> Arc<Vec<SalesAggregate>> {
        let rows = Arc::new(rows);
        self.entries().insert(
            key,
            CacheEntry {
                rows: Arc::clone(&rows),
                inserted_at: Instant::now(),
            },
        );
        rows
    }

    pub fn invalidate(&self) {
        self.entries().clear();
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
