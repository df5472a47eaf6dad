mod priority;
mod queue;
mod task;

pub use priority::Priority;
pub use queue::PriorityQueue;
pub use task::Task;
