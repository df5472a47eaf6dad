use prioq_core::Priority;
use prometheus::{Counter, CounterVec, IntGauge, IntGaugeVec, Opts, Registry};

use crate::QueueRegistry;

/// Prometheus metrics for the broker.
pub struct BrokerMetrics {
    pub registry: Registry,

    /// Accepted pushes by effective priority tier.
    pub tasks_pushed_total: CounterVec,

    /// Successful pops by priority tier of the returned task.
    pub tasks_popped_total: CounterVec,

    /// Pops that found the queue empty.
    pub pops_empty_total: Counter,

    /// Pending tasks by priority tier, refreshed on scrape.
    pub queue_depth: IntGaugeVec,

    /// Number of queues created so far, refreshed on scrape.
    pub queues: IntGauge,
}

impl BrokerMetrics {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let tasks_pushed_total = CounterVec::new(
            Opts::new("prioq_tasks_pushed_total", "Tasks pushed by priority tier"),
            &["priority"],
        )?;
        registry.register(Box::new(tasks_pushed_total.clone()))?;

        let tasks_popped_total = CounterVec::new(
            Opts::new("prioq_tasks_popped_total", "Tasks popped by priority tier"),
            &["priority"],
        )?;
        registry.register(Box::new(tasks_popped_total.clone()))?;

        let pops_empty_total = Counter::new(
            "prioq_pops_empty_total",
            "Pop requests that found the queue empty",
        )?;
        registry.register(Box::new(pops_empty_total.clone()))?;

        let queue_depth = IntGaugeVec::new(
            Opts::new("prioq_queue_depth", "Pending tasks by priority tier"),
            &["priority"],
        )?;
        registry.register(Box::new(queue_depth.clone()))?;

        let queues = IntGauge::new("prioq_queues", "Number of queues created")?;
        registry.register(Box::new(queues.clone()))?;

        Ok(BrokerMetrics {
            registry,
            tasks_pushed_total,
            tasks_popped_total,
            pops_empty_total,
            queue_depth,
            queues,
        })
    }

    pub fn inc_pushed(&self, priority: Priority) {
        self.tasks_pushed_total
            .with_label_values(&[priority.as_str()])
            .inc();
    }

    pub fn inc_popped(&self, priority: Priority) {
        self.tasks_popped_total
            .with_label_values(&[priority.as_str()])
            .inc();
    }

    /// Recompute the depth gauges from a registry snapshot. Called
    /// from the scrape handler rather than on every mutation.
    pub fn refresh_gauges(&self, registry: &QueueRegistry) {
        let mut high = 0;
        let mut medium = 0;
        let mut low = 0;
        for (_, (h, m, l)) in registry.depths() {
            high += h;
            medium += m;
            low += l;
        }

        self.queue_depth
            .with_label_values(&["high"])
            .set(high as i64);
        self.queue_depth
            .with_label_values(&["medium"])
            .set(medium as i64);
        self.queue_depth.with_label_values(&["low"]).set(low as i64);
        self.queues.set(registry.queue_count() as i64);
    }
}
