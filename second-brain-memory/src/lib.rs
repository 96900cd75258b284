//! Concrete `MemoryService` providers: a cloud HTTP-backed semantic store,
//! an in-process knowledge-graph store, and a stub for tests/offline mode.
//! All three share idle-reconnect and retry/circuit-breaker wiring.

pub mod circuit_breaker;
pub mod cloud;
pub mod graph;
pub mod idle;
pub mod stub;

pub use cloud::CloudMemoryService;
pub use graph::GraphMemoryService;
pub use idle::IdleTracker;
pub use stub::StubMemoryService;
