//! Feature builder.
//!
//! Maps a [`ProductionUnit`](crate::system::ProductionUnit) to the fixed set
//! of named inputs the completion-rate model was trained on. The set and its
//! canonical order are versioned by [`FEATURE_SCHEMA_VERSION`]; a model
//! declares which subset and order it consumes through its
//! [`ModelHandle`](crate::model::ModelHandle).

mod builder;

pub use builder::{
    build_features, FeatureName, UnitFeatures, FEATURE_COUNT, FEATURE_ORDER,
    FEATURE_SCHEMA_VERSION,
};
