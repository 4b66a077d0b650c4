//! Vector operations on flat `f32` embeddings: raw cosine similarity,
//! centroid, and mean pairwise coherence.
//!
//! Cosine similarity here is returned raw, in `[-1, 1]` — callers that need
//! a `[0, 1]` score (the hybrid retrieval formula) clamp explicitly with
//! `max(similarity, 0.0)` themselves, rather than this function pre-clamping
//! for them. Several thresholds in this pipeline compare against negative
//! or sub-zero windows indirectly, so silently normalizing here would be
//! wrong for those callers.

use crate::error::{Error, Result};

/// Raw cosine similarity between two equal-length vectors, in `[-1, 1]`.
///
/// # Errors
/// Returns [`Error::DimensionMismatch`] if `a.len() != b.len()`.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(Error::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }
    Ok(dot / (norm_a * norm_b))
}

/// Element-wise arithmetic mean of a set of equal-length vectors. Returns an
/// empty vector for empty input.
#[must_use]
pub fn centroid(vectors: &[Vec<f32>]) -> Vec<f32> {
    let Some(first) = vectors.first() else {
        return Vec::new();
    };
    let dim = first.len();
    let mut sum = vec![0.0f32; dim];
    for v in vectors {
        for (s, x) in sum.iter_mut().zip(v) {
            *s += x;
        }
    }
    let n = vectors.len() as f32;
    for s in &mut sum {
        *s /= n;
    }
    sum
}

/// Mean cosine similarity over all unordered pairs of `vectors`. A singleton
/// input yields `1.0`; empty input yields `0.0`.
#[must_use]
pub fn mean_pairwise_cosine(vectors: &[Vec<f32>]) -> f32 {
    if vectors.len() <= 1 {
        return if vectors.is_empty() { 0.0 } else { 1.0 };
    }
    let mut total = 0.0f32;
    let mut count = 0usize;
    for i in 0..vectors.len() {
        for j in (i + 1)..vectors.len() {
            if let Ok(sim) = cosine_similarity(&vectors[i], &vectors[j]) {
                total += sim;
                count += 1;
            }
        }
    }
    if count == 0 {
        0.0
    } else {
        total / count as f32
    }
}
