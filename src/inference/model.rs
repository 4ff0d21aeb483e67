//! Context classifier wrapper for ONNX Runtime inference.
//!
//! Model contract: one graph with inputs `num_features` (f32, `[N, 10]`,
//! numeric features in declared order) and `cat_features` (string, `[N, 6]`,
//! categorical features in declared order), and an output `probabilities`
//! (f32, `[N, 2]`) whose second column is the positive class. The feature
//! column order must match the training layout exactly.

use std::path::Path;
use std::sync::Mutex;

use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Tensor;
use tracing::{debug, info};

use super::InferenceError;
use crate::catalog::{RawCatalog, CATEGORICAL_FEATURES, CONTEXT_CLASS_IDX, NUMERIC_FEATURES};
use crate::context::Context;

/// Name of the model output carrying the class probabilities.
const PROBABILITIES_OUTPUT: &str = "probabilities";

/// Trained binary classifier, loaded once at startup.
pub struct ContextClassifier {
    session: Mutex<Session>,
}

impl std::fmt::Debug for ContextClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextClassifier").finish()
    }
}

impl ContextClassifier {
    /// Load the classifier from an ONNX artifact.
    pub fn load(model_path: &Path) -> Result<Self, InferenceError> {
        info!(path = %model_path.display(), "Loading context classifier");

        let model_bytes = std::fs::read(model_path)?;

        let session = Session::builder()
            .map_err(|e| InferenceError::Onnx(e.to_string()))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| InferenceError::Onnx(e.to_string()))?
            .with_intra_threads(4)
            .map_err(|e| InferenceError::Onnx(e.to_string()))?
            .commit_from_memory(&model_bytes)
            .map_err(|e| InferenceError::Onnx(format!("Failed to load model: {e}")))?;

        debug!(
            inputs = ?session.inputs.iter().map(|i| &i.name).collect::<Vec<_>>(),
            outputs = ?session.outputs.iter().map(|o| &o.name).collect::<Vec<_>>(),
            "Classifier loaded"
        );

        Ok(Self {
            session: Mutex::new(session),
        })
    }

    /// Batch positive-class probability for every catalog row, with the
    /// `context_class` feature forced to `context` on every row and all
    /// other features held as-is. Returns one probability per row, in row
    /// order. The whole batch either succeeds or the call fails.
    pub fn predict_positive(
        &self,
        catalog: &RawCatalog,
        context: Context,
    ) -> Result<Vec<f32>, InferenceError> {
        let n = catalog.len();
        if n == 0 {
            return Ok(Vec::new());
        }

        // Numeric block, [N, 10], row-major in declared feature order.
        let mut numeric = Vec::with_capacity(n * NUMERIC_FEATURES.len());
        for row in &catalog.tracks {
            numeric.extend_from_slice(&row.numeric);
        }

        // Categorical block, [N, 6], with the context_class column overridden.
        let mut categorical = Vec::with_capacity(n * CATEGORICAL_FEATURES.len());
        for row in &catalog.tracks {
            for (i, value) in row.categorical.iter().enumerate() {
                if i == CONTEXT_CLASS_IDX {
                    categorical.push(context.as_str().to_string());
                } else {
                    categorical.push(value.clone());
                }
            }
        }

        let num_tensor = Tensor::from_array((
            [n, NUMERIC_FEATURES.len()],
            numeric.into_boxed_slice(),
        ))
        .map_err(|e| InferenceError::Onnx(e.to_string()))?;

        let cat_tensor = Tensor::from_string_array((
            [n, CATEGORICAL_FEATURES.len()],
            categorical.as_slice(),
        ))
        .map_err(|e| InferenceError::Onnx(e.to_string()))?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| InferenceError::Onnx(format!("Session lock error: {e}")))?;

        let outputs = session
            .run(ort::inputs![
                "num_features" => num_tensor,
                "cat_features" => cat_tensor
            ])
            .map_err(|e| InferenceError::Onnx(e.to_string()))?;

        let output = outputs.get(PROBABILITIES_OUTPUT).ok_or_else(|| {
            InferenceError::BadOutput(format!("Output '{PROBABILITIES_OUTPUT}' not found"))
        })?;

        let (shape, data) = output
            .try_extract_tensor::<f32>()
            .map_err(|e| InferenceError::Onnx(e.to_string()))?;

        debug!(?shape, rows = n, context = %context, "Classifier output");

        // Expect [N, 2]; the positive class is column 1.
        if data.len() != n * 2 {
            return Err(InferenceError::BadOutput(format!(
                "Expected {} probability values, got {}",
                n * 2,
                data.len()
            )));
        }

        Ok((0..n).map(|i| data[i * 2 + 1]).collect())
    }
}
