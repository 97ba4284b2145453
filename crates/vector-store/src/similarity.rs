use crate::error::{Result, VectorStoreError};

/// Cosine similarity `dot(a, b) / (|a| * |b|)`.
///
/// A zero-norm vector on either side has no direction; its similarity to
/// anything is defined as `0.0`.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(VectorStoreError::InvalidDimension {
            expected: a.len(),
            actual: b.len(),
        });
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }

    // + 0.0 folds -0.0 into 0.0
    Ok(dot_product / (norm_a * norm_b) + 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-6;

    #[test]
    fn identical_vectors_score_one() {
        let a = [0.3, -1.2, 4.0, 0.0, 2.5];
        assert!((cosine_similarity(&a, &a).unwrap() - 1.0).abs() < EPS);
    }

    #[test]
    fn similarity_is_symmetric() {
        let a = [1.0, 2.0, 3.0];
        let b = [-0.5, 4.0, 0.25];
        let ab = cosine_similarity(&a, &b).unwrap();
        let ba = cosine_similarity(&b, &a).unwrap();
        assert!((ab - ba).abs() < EPS);
    }

    #[test]
    fn opposite_vectors_score_minus_one() {
        let a = [1.5, -2.0, 0.5];
        let neg: Vec<f32> = a.iter().map(|x| -x).collect();
        assert!((cosine_similarity(&a, &neg).unwrap() + 1.0).abs() < EPS);
    }

    #[test]
    fn orthogonal_vectors_score_zero() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).unwrap(), 0.0);
    }

    #[test]
    fn orthogonal_score_is_positive_zero() {
        let score = cosine_similarity(&[-0.0, -1.0], &[1.0, 0.0]).unwrap();
        assert_eq!(score, 0.0);
        assert!(score.is_sign_positive());
    }

    #[test]
    fn zero_norm_scores_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]).unwrap(), 0.0);
        assert_eq!(cosine_similarity(&[1.0, 2.0], &[0.0, 0.0]).unwrap(), 0.0);
        assert_eq!(cosine_similarity(&[0.0], &[0.0]).unwrap(), 0.0);
    }

    #[test]
    fn dimension_mismatch_is_an_error() {
        let err = cosine_similarity(&[1.0, 2.0], &[1.0]).unwrap_err();
        assert!(matches!(
            err,
            VectorStoreError::InvalidDimension {
                expected: 2,
                actual: 1
            }
        ));
    }
}
