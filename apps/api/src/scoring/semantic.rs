/// Neutral score used when either embedding is missing or degenerate.
pub const NEUTRAL_SCORE: f64 = 50.0;

/// Cosine similarity rescaled from [-1, 1] to [0, 100].
///
/// Absent, empty, zero-magnitude, length-mismatched or non-finite vectors yield
/// the neutral score.
pub fn semantic_similarity(a: Option<&[f32]>, b: Option<&[f32]>) -> f64 {
    let (Some(a), Some(b)) = (a, b) else {
        return NEUTRAL_SCORE;
    };
    if a.is_empty() || a.len() != b.len() {
        return NEUTRAL_SCORE;
    }

    let dot: f64 = a.iter().zip(b).map(|(x, y)| *x as f64 * *y as f64).sum();
    let norm_a: f64 = a.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return NEUTRAL_SCORE;
    }

    let cosine = dot / (norm_a * norm_b);
    if !cosine.is_finite() {
        return NEUTRAL_SCORE;
    }
    super::skills::round2(((cosine + 1.0) * 50.0).clamp(0.0, 100.0))
}
