use parking_lot::RwLock;
use prioq_core::PriorityQueue;
use std::collections::HashMap;
use std::sync::Arc;

/// Registry of all named queues, created lazily on first reference.
///
/// Lookups of existing names share the read lock, so traffic on
/// distinct queues never serializes; only first-reference creation
/// takes the write lock. Queues are never evicted: once created, a
/// name maps to the same instance for the life of the process, even
/// when drained to empty.
pub struct QueueRegistry {
    queues: RwLock<HashMap<String, Arc<PriorityQueue>>>,
}

impl QueueRegistry {
    pub fn new() -> Self {
        QueueRegistry {
            queues: RwLock::new(HashMap::new()),
        }
    }

    /// Return the queue for `name`, creating an empty one on first
    /// reference. Concurrent first references to the same name all
    /// observe the same instance. Any name is accepted, including the
    /// empty string.
    pub fn resolve(&self, name: &str) -> Arc<PriorityQueue> {
        if let Some(queue) = self.queues.read().get(name) {
            return queue.clone();
        }

        // Re-check under the write lock: another caller may have
        // created the queue between our read and write acquisition.
        let mut queues = self.queues.write();
        queues
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(PriorityQueue::new()))
            .clone()
    }

    /// Number of queues created so far.
    pub fn queue_count(&self) -> usize {
        self.queues.read().len()
    }

    /// Per-queue depth snapshot (high, medium, low), sorted by name.
    /// Queue depths are read after the registry lock is released, so
    /// this never holds the registry lock and a queue lock together.
    pub fn depths(&self) -> Vec<(String, (usize, usize, usize))> {
        let snapshot: Vec<(String, Arc<PriorityQueue>)> = {
            let queues = self.queues.read();
            queues
                .iter()
                .map(|(name, queue)| (name.clone(), queue.clone()))
                .collect()
        };

        let mut depths: Vec<_> = snapshot
            .into_iter()
            .map(|(name, queue)| (name, queue.depth_by_priority()))
            .collect();
        depths.sort_by(|a, b| a.0.cmp(&b.0));
        depths
    }

    /// Total pending tasks across every queue.
    pub fn pending_total(&self) -> usize {
        self.depths()
            .into_iter()
            .map(|(_, (high, medium, low))| high + medium + low)
            .sum()
    }
}

impl Default for QueueRegistry {
    fn default() -> Self {
        Self::new()
    }
}
