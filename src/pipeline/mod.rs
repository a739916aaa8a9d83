//! Asynchronous report pipeline.
//!
//! This module contains the orchestrator that sequences the pipeline
//! stages for one request, and the worker that turns each submitted
//! request into an independent task.

pub mod orchestrator;
pub mod worker;

pub use orchestrator::ReportPipeline;
pub use worker::ReportWorker;
