pub mod api;
pub mod config;
pub mod metrics;
pub mod registry;

pub use config::BrokerConfig;
pub use metrics::BrokerMetrics;
pub use registry::QueueRegistry;
