//! Gradient Boosted Decision Tree inference
//!
//! Deterministic ensemble evaluation: flat-vector trees with `<=`
//! traversal, a bias term, and sigmoid calibration of the accumulated
//! score. Training lives in the `cardio-trainer` crate; this module only
//! evaluates fitted ensembles.

pub mod model;
pub mod tree;

pub use model::{sigmoid, Ensemble, DECISION_THRESHOLD};
pub use tree::{Node, Tree};
