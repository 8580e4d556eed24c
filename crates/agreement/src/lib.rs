//! `iaa-agreement`: inter-annotator agreement engine.
//!
//! Pure engine crate: receives two annotators' token maps, returns kappa
//! statistics and the rendered difference report. No CLI or filesystem writes.

pub mod align;
pub mod calculate;
pub mod config;
pub mod engine;
pub mod error;
pub mod extract;
pub mod model;
pub mod reader;
pub mod report;
pub mod summary;

pub use config::AgreementConfig;
pub use engine::run;
pub use error::AgreementError;
pub use model::{AgreementInput, AgreementResult, Category, TokenMap, TokenRecord};
