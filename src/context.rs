//! Fixed listening-context definitions.
//!
//! The context set is part of the model contract: the classifier was trained
//! with these labels as values of the `context_class` feature, and the
//! declaration order below is the order used for argmax tie-breaking and for
//! every per-context listing in the API.

use serde::{Deserialize, Serialize};

/// A listening context the classifier scores tracks against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Context {
    Workout,
    Party,
    Focus,
    SleepRelax,
    Art,
}

/// All contexts, in declaration order. This order is load-bearing: argmax
/// ties resolve to the first context attaining the maximum.
pub const CONTEXTS: [Context; 5] = [
    Context::Workout,
    Context::Party,
    Context::Focus,
    Context::SleepRelax,
    Context::Art,
];

/// Number of contexts; sizes the per-track probability arrays.
pub const CONTEXT_COUNT: usize = CONTEXTS.len();

impl Context {
    /// Wire label, matching the training data's `context_class` values.
    pub fn as_str(self) -> &'static str {
        match self {
            Context::Workout => "workout",
            Context::Party => "party",
            Context::Focus => "focus",
            Context::SleepRelax => "sleep_relax",
            Context::Art => "art",
        }
    }

    /// Position in the fixed declaration order.
    pub fn index(self) -> usize {
        match self {
            Context::Workout => 0,
            Context::Party => 1,
            Context::Focus => 2,
            Context::SleepRelax => 3,
            Context::Art => 4,
        }
    }

    /// Weight of this context in the global `top_score_weighted` score.
    /// Weights sum to 1.0, so the weighted score stays in [0, 1].
    pub fn weight(self) -> f32 {
        match self {
            Context::Workout => 0.25,
            Context::Party => 0.20,
            Context::Focus => 0.25,
            Context::SleepRelax => 0.20,
            Context::Art => 0.10,
        }
    }

    /// Parse a wire label. Returns `None` for anything outside the fixed set.
    pub fn parse(s: &str) -> Option<Self> {
        CONTEXTS.iter().copied().find(|c| c.as_str() == s)
    }
}

impl std::fmt::Display for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declaration_order() {
        let labels: Vec<&str> = CONTEXTS.iter().map(|c| c.as_str()).collect();
        assert_eq!(labels, ["workout", "party", "focus", "sleep_relax", "art"]);
    }

    #[test]
    fn test_index_matches_position() {
        for (i, ctx) in CONTEXTS.iter().enumerate() {
            assert_eq!(ctx.index(), i);
        }
    }

    #[test]
    fn test_weights_sum_to_one() {
        let sum: f32 = CONTEXTS.iter().map(|c| c.weight()).sum();
        assert!((sum - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_parse_roundtrip() {
        for ctx in CONTEXTS {
            assert_eq!(Context::parse(ctx.as_str()), Some(ctx));
        }
        assert_eq!(Context::parse("bogus"), None);
        assert_eq!(Context::parse(""), None);
        assert_eq!(Context::parse("Workout"), None);
    }

    #[test]
    fn test_serde_labels() {
        let json = serde_json::to_string(&Context::SleepRelax).unwrap();
        assert_eq!(json, "\"sleep_relax\"");

        let decoded: Context = serde_json::from_str("\"workout\"").unwrap();
        assert_eq!(decoded, Context::Workout);
    }
}
