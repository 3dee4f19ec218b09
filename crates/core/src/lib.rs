//! # CAVI Core
//!
//! Core logic of the asynchronous CAVI calculator:
//! - Request intake validation (`request`)
//! - The index formula (`formula`)
//! - The per-request calculation lifecycle (`task`) and its bounded dispatcher (`dispatcher`)
//! - Result delivery to the owning backend (`delivery`)
//!
//! Nothing here is persisted. **No API concerns**: HTTP routing and response shapes belong in
//! `api-rest` and `api-shared`.

pub mod config;
pub mod constants;
pub mod delivery;
pub mod dispatcher;
pub mod error;
pub mod formula;
pub mod request;
pub mod task;

pub use config::{CalculatorConfig, DelayRange};
pub use delivery::ResultDeliveryClient;
pub use dispatcher::CalculationDispatcher;
pub use error::{CaviError, CaviResult};
pub use formula::{compute_index, AgeGroup, DiseaseType};
pub use request::{CalculationId, CalculationRequest, GroupResult, GroupSpec};
pub use task::CalculationTask;
