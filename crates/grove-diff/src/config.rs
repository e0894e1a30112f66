//! Engine configuration

/// Tuning knobs for the matching engine.
#[derive(Debug, Clone, Copy)]
pub struct MatchConfig {
    /// Similarity scores strictly above this become move/rename/extract
    /// matches. A score equal to the threshold is rejected.
    pub similarity_threshold: f64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.5,
        }
    }
}
