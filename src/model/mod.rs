//! Scoring model contract.
//!
//! The completion-rate model is trained elsewhere. This crate sees it only
//! through two traits, [`Standardizer`] and [`CompletionModel`], bundled with
//! the feature order they were fitted on into a [`ModelHandle`]. The handle is
//! built once and passed into every evaluation; there is no global model.

mod handle;
mod linear;
mod types;

pub use handle::{ModelHandle, ModelHandleBuilder};
pub use linear::{LinearModel, StandardScaler};
pub use types::{CompletionModel, IdentityStandardizer, ScoringError, ScoringStage, Standardizer};
