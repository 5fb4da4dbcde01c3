use std::cmp::Ordering;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum VectorError {
    #[error("Vectors must not be empty")]
    Empty,
    #[error("Vector length mismatch: {0} != {1}")]
    DimensionMismatch(usize, usize),
}

/// Cosine similarity of two vectors of equal, non-zero length.
///
/// Mismatched lengths are an error rather than a zero score: vectors from
/// different embedding models are not comparable.
pub fn cosine_similarity(query: &[f32], candidate: &[f32]) -> Result<f32, VectorError> {
    if query.is_empty() || candidate.is_empty() {
        return Err(VectorError::Empty);
    }
    if query.len() != candidate.len() {
        return Err(VectorError::DimensionMismatch(query.len(), candidate.len()));
    }

    let dot: f64 = query
        .iter()
        .zip(candidate)
        .map(|(a, b)| f64::from(*a) * f64::from(*b))
        .sum();
    let denom = l2_norm(query) * l2_norm(candidate);
    if denom <= f64::EPSILON {
        return Ok(0.0);
    }

    Ok((dot / denom).clamp(-1.0, 1.0) as f32)
}

pub fn rank_descending_by_cosine(
    query: &[f32],
    candidates: &[Vec<f32>],
) -> Result<Vec<(usize, f32)>, VectorError> {
    let mut scores = Vec::with_capacity(candidates.len());
    for (idx, candidate) in candidates.iter().enumerate() {
        let score = cosine_similarity(query, candidate)?;
        scores.push((idx, score));
    }

    scores.sort_by(|left, right| right.1.partial_cmp(&left.1).unwrap_or(Ordering::Equal));
    Ok(scores)
}

fn l2_norm(values: &[f32]) -> f64 {
    values
        .iter()
        .map(|v| f64::from(*v).powi(2))
        .sum::<f64>()
        .sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(left: f32, right: f32) -> bool {
        (left - right).abs() < 1e-5
    }

    #[test]
    fn cosine_is_one_for_identical_vectors() {
        let vec = vec![1.0, 2.0, 3.0, 4.0];
        let score = cosine_similarity(&vec, &vec).expect("cosine should work");
        assert!(approx_eq(score, 1.0));
    }

    #[test]
    fn cosine_is_zero_for_orthogonal_vectors() {
        let score = cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).expect("cosine should work");
        assert!(approx_eq(score, 0.0));
    }

    #[test]
    fn cosine_rejects_mismatched_dimensions() {
        let err = cosine_similarity(&[1.0, 0.0, 0.0], &[1.0, 0.0]).unwrap_err();
        assert_eq!(err, VectorError::DimensionMismatch(3, 2));
    }

    #[test]
    fn cosine_rejects_empty_query() {
        assert_eq!(cosine_similarity(&[], &[1.0]), Err(VectorError::Empty));
    }

    #[test]
    fn zero_vector_scores_zero() {
        let score = cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]).expect("cosine should work");
        assert!(approx_eq(score, 0.0));
    }

    #[test]
    fn ranking_returns_highest_similarity_first() {
        let query = vec![1.0, 0.0];
        let candidates = vec![vec![0.8, 0.2], vec![0.1, 0.9], vec![0.9, 0.0]];
        let ranked = rank_descending_by_cosine(&query, &candidates).expect("ranking should work");

        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0].0, 2);
        assert_eq!(ranked[2].0, 1);
    }
}
