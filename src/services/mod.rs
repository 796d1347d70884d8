pub mod lifecycle;
pub mod loader;
pub mod matrix;
pub mod recommender;
pub mod scheduler;
pub mod store;

pub use lifecycle::Coordinator;
pub use scheduler::Scheduler;
pub use store::ArtifactStore;
