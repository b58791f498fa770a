//! Categorical encoding, feature schema and request vectorization
//!
//! The training pipeline fits an [`EncoderRegistry`] and a
//! [`FeatureSchema`]; the server binds them into a [`FeatureLayout`] once
//! at start-up and vectorizes every request against it.

pub mod encoder;
pub mod layout;
pub mod registry;
pub mod request;
pub mod schema;
pub mod vectorizer;

pub use encoder::{EncodeError, LabelEncoder};
pub use layout::{Column, ColumnKind, FeatureLayout};
pub use registry::{EncoderRegistry, RegistryError};
pub use request::{RawRequest, RawValue};
pub use schema::{FeatureKind, FeatureSchema, FeatureSpec, NumericRange, SchemaError};
pub use vectorizer::{FeatureVector, VectorizeError};
