//! Random forest inference
//!
//! A forest is a list of regression trees whose outputs are averaged.
//! Trees are stored as flat node vectors and serialized as canonical JSON
//! so a model file hashes identically wherever it is written.
//!
//! # Usage
//!
//! ```rust
//! use housepk_core::forest::{ForestMetadata, ForestModel, Node, Tree};
//!
//! let tree = Tree::new(vec![
//!     Node::internal(0, 0, 3.0, 1, 2),
//!     Node::leaf(1, 8_000_000.0),
//!     Node::leaf(2, 15_000_000.0),
//! ]);
//! let metadata = ForestMetadata {
//!     n_estimators: 1,
//!     max_depth: Some(1),
//!     min_samples_split: 2,
//!     random_state: 42,
//!     training_rows: 4,
//! };
//! let model = ForestModel::new(1, vec![tree], metadata);
//! assert_eq!(model.predict(&[4.0]), 15_000_000.0);
//! ```

pub mod model;
pub mod tree;

pub use model::{ForestMetadata, ForestModel, ModelError, FORMAT_VERSION};
pub use tree::{Node, Tree};
