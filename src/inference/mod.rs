//! ML inference module for the context classifier.
//!
//! Wraps the trained binary classifier (an ONNX artifact) behind a batch
//! probability-prediction API via ONNX Runtime. The model is loaded once at
//! startup and only used during the initial catalog scoring pass.

mod model;

pub use model::ContextClassifier;

/// Inference error types
#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    #[error("ONNX runtime error: {0}")]
    Onnx(String),

    #[error("Unexpected model output: {0}")]
    BadOutput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
