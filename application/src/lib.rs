//! Application layer for llm-council
//!
//! This crate contains the council use case, the dispatch/fan-out
//! machinery, and the port definitions infrastructure adapters implement.
//! It depends only on the domain layer.

pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use ports::{
    backend_gateway::{BackendGateway, GatewayError},
    image_source::{ImageSource, ImageSourceError},
    progress::{CouncilProgress, NoProgress},
    result_sink::{ResultSink, StoreError},
};
pub use use_cases::run_council::{
    CouncilSettings, Dispatcher, RunCouncilInput, RunCouncilUseCase,
};
