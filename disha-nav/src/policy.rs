//! Boundary trait for learned control policies.
//!
//! A trained policy can replace the hand-authored state flow behind this
//! trait without touching the world model or the command types: it consumes
//! a flat signal vector and produces a flat action vector, and the embedding
//! application owns both encodings.

/// A drop-in decision policy.
pub trait ActionPolicy {
    /// Map one observation vector to one action vector.
    fn act(&mut self, signals: &[f64]) -> Vec<f64>;
}
