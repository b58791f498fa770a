//! housepk core
//!
//! Shared between the offline trainer and the prediction server.
//!
//! Modules:
//! - `features`: label encoders, feature schema, layout binding and request vectorization
//! - `forest`: random forest regression trees and ensemble inference
//! - `artifacts`: file layout and canonical read/write of persisted artifacts
//! - `serde_canon`: canonical JSON and blake3 hashing
//! - `errors`: artifact I/O errors

pub mod artifacts;
pub mod errors;
pub mod features;
pub mod forest;
pub mod serde_canon;

pub use artifacts::ArtifactPaths;
pub use errors::ArtifactError;
pub use features::{
    EncodeError, EncoderRegistry, FeatureKind, FeatureLayout, FeatureSchema, FeatureSpec,
    FeatureVector, LabelEncoder, NumericRange, RawRequest, RawValue, SchemaError,
    VectorizeError,
};
pub use forest::{ForestMetadata, ForestModel, ModelError};

/// Crate version string
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
