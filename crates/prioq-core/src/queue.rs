use crate::{Priority, Task};
use parking_lot::Mutex;
use std::collections::VecDeque;

/// The three tier sequences of one named queue. Kept behind a single
/// lock so a push and a pop on the same queue never interleave their
/// mutations.
#[derive(Default)]
struct Tiers {
    high: VecDeque<Task>,
    medium: VecDeque<Task>,
    low: VecDeque<Task>,
}

/// In-memory priority queue for one queue name: FIFO within a tier,
/// strict tier precedence on pop. Unbounded; callers accept
/// resource-exhaustion under sustained push-only load.
pub struct PriorityQueue {
    tiers: Mutex<Tiers>,
}

impl PriorityQueue {
    pub fn new() -> Self {
        PriorityQueue {
            tiers: Mutex::new(Tiers::default()),
        }
    }

    /// Append a task to the tier matching its priority. Never fails;
    /// an out-of-band priority value has already been normalized to
    /// `Low` by `Priority`.
    pub fn push(&self, task: Task) {
        let mut tiers = self.tiers.lock();
        match task.priority {
            Priority::High => tiers.high.push_back(task),
            Priority::Medium => tiers.medium.push_back(task),
            Priority::Low => tiers.low.push_back(task),
        }
    }

    /// Remove and return the front of the highest non-empty tier, or
    /// `None` when the queue is empty. Emptiness is a normal outcome,
    /// not an error.
    pub fn pop(&self) -> Option<Task> {
        let mut tiers = self.tiers.lock();
        tiers
            .high
            .pop_front()
            .or_else(|| tiers.medium.pop_front())
            .or_else(|| tiers.low.pop_front())
    }

    /// Total pending tasks across all tiers.
    pub fn len(&self) -> usize {
        let tiers = self.tiers.lock();
        tiers.high.len() + tiers.medium.len() + tiers.low.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Pending count per tier, high/medium/low.
    pub fn depth_by_priority(&self) -> (usize, usize, usize) {
        let tiers = self.tiers.lock();
        (tiers.high.len(), tiers.medium.len(), tiers.low.len())
    }
}

impl Default for PriorityQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::sync::Arc;

    #[test]
    fn test_tier_precedence() {
        let queue = PriorityQueue::new();
        queue.push(Task::new("l", Priority::Low));
        queue.push(Task::new("m", Priority::Medium));
        queue.push(Task::new("h", Priority::High));

        assert_eq!(queue.pop().unwrap().body, "h");
        assert_eq!(queue.pop().unwrap().body, "m");
        assert_eq!(queue.pop().unwrap().body, "l");
        assert!(queue.pop().is_none());
    }

    #[test]
    fn test_fifo_within_tier() {
        let queue = PriorityQueue::new();
        queue.push(Task::new("a", Priority::High));
        queue.push(Task::new("b", Priority::High));

        assert_eq!(queue.pop().unwrap().body, "a");
        assert_eq!(queue.pop().unwrap().body, "b");
    }

    #[test]
    fn test_interleaved_pushes_keep_tier_order() {
        let queue = PriorityQueue::new();
        queue.push(Task::new("a", Priority::High));
        queue.push(Task::new("b", Priority::Low));
        queue.push(Task::new("c", Priority::High));

        assert_eq!(queue.pop().unwrap().body, "a");
        assert_eq!(queue.pop().unwrap().body, "c");
        assert_eq!(queue.pop().unwrap().body, "b");
        assert!(queue.pop().is_none());
    }

    #[test]
    fn test_pop_empty_is_idempotent() {
        let queue = PriorityQueue::new();
        for _ in 0..5 {
            assert!(queue.pop().is_none());
        }

        queue.push(Task::new("x", Priority::Low));
        assert!(queue.pop().is_some());
        for _ in 0..5 {
            assert!(queue.pop().is_none());
        }
    }

    #[test]
    fn test_depth_by_priority() {
        let queue = PriorityQueue::new();
        queue.push(Task::new("1", Priority::High));
        queue.push(Task::new("2", Priority::Low));
        queue.push(Task::new("3", Priority::Low));

        assert_eq!(queue.depth_by_priority(), (1, 0, 2));
        assert_eq!(queue.len(), 3);
        assert!(!queue.is_empty());
    }

    #[test]
    fn test_concurrent_pushes_lose_nothing() {
        let queue = Arc::new(PriorityQueue::new());
        let handles: Vec<_> = (0..16)
            .map(|i| {
                let queue = queue.clone();
                std::thread::spawn(move || {
                    queue.push(Task::new(format!("task-{i}"), Priority::Medium));
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let mut bodies: Vec<String> = std::iter::from_fn(|| queue.pop())
            .map(|t| t.body)
            .collect();
        bodies.sort();
        assert_eq!(bodies.len(), 16);
        bodies.dedup();
        assert_eq!(bodies.len(), 16);
    }

    fn arb_priority() -> impl Strategy<Value = Priority> {
        prop_oneof![
            Just(Priority::High),
            Just(Priority::Medium),
            Just(Priority::Low),
        ]
    }

    proptest! {
        /// A pop never returns a task while a higher tier is
        /// non-empty, for any push sequence.
        #[test]
        fn prop_pop_respects_tier_precedence(priorities in prop::collection::vec(arb_priority(), 0..64)) {
            let queue = PriorityQueue::new();
            for (i, priority) in priorities.iter().enumerate() {
                queue.push(Task::new(i.to_string(), *priority));
            }

            let mut previous = Priority::High;
            while let Some(task) = queue.pop() {
                let rank = |p: Priority| match p {
                    Priority::High => 0,
                    Priority::Medium => 1,
                    Priority::Low => 2,
                };
                prop_assert!(rank(task.priority) >= rank(previous));
                previous = task.priority;
            }
            prop_assert!(queue.is_empty());
        }
    }
}
