//! Source fingerprinting.
//!
//! Fixed-length feature vectors meant to identify the capture source
//! (device, technique) rather than the exact bytes. The extractors are
//! deterministic placeholders: the device vector folds a byte prefix into
//! 128 bins, the temporal and acoustic vectors are derived almost entirely
//! from the input length. A real perceptual-hash or embedding extractor can
//! replace them as long as the vector length and the cosine matching
//! downstream stay fixed.

use crate::record::MediaType;

/// Length of every feature vector.
pub const FINGERPRINT_LEN: usize = 128;

/// Number of prefix bytes folded into the device vector.
const DEVICE_PREFIX_LEN: usize = 10_000;

/// Device-noise fingerprint for still images, L2-normalized.
/// A zero prefix stays the zero vector.
pub fn device_fingerprint(bytes: &[u8]) -> Vec<f64> {
    let mut vector = vec![0.0_f64; FINGERPRINT_LEN];
    for (i, byte) in bytes.iter().take(DEVICE_PREFIX_LEN).enumerate() {
        vector[i % FINGERPRINT_LEN] += f64::from(*byte);
    }

    let norm = l2_norm(&vector);
    if norm > 0.0 {
        for value in &mut vector {
            *value /= norm;
        }
    }
    vector
}

/// Temporal-consistency fingerprint for video.
pub fn temporal_fingerprint(bytes: &[u8]) -> Vec<f64> {
    let mut vector = vec![0.5_f64; FINGERPRINT_LEN];
    let magic = bytes.len() % 255;
    vector[0] = magic as f64 / 255.0;
    vector[10] = ((magic * 2) % 255) as f64 / 255.0;
    vector
}

/// Acoustic fingerprint for audio.
pub fn acoustic_fingerprint(bytes: &[u8]) -> Vec<f64> {
    let mut vector = vec![0.1_f64; FINGERPRINT_LEN];
    let magic = bytes.len() % 255;
    vector[5] = magic as f64 / 255.0;
    vector[20] = 0.8;
    vector
}

/// Extractor used when querying the similarity index for a media type.
/// Video queries use the temporal vector; the acoustic vector of a video
/// registration is stored on the record but never queried.
pub fn query_fingerprint(media_type: MediaType, bytes: &[u8]) -> Vec<f64> {
    match media_type {
        MediaType::Image => device_fingerprint(bytes),
        MediaType::Video => temporal_fingerprint(bytes),
        MediaType::Audio => acoustic_fingerprint(bytes),
    }
}

/// Cosine similarity: dot product over the product of L2 norms.
///
/// Returns 0 for mismatched lengths and for zero-norm inputs, so a missing
/// or degenerate fingerprint can never produce a match.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = l2_norm(a);
    let norm_b = l2_norm(b);
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

fn l2_norm(vector: &[f64]) -> f64 {
    vector.iter().map(|x| x * x).sum::<f64>().sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_fingerprint_deterministic_and_normalized() {
        let bytes: Vec<u8> = (0..20_000).map(|i| (i % 256) as u8).collect();
        let a = device_fingerprint(&bytes);
        let b = device_fingerprint(&bytes);

        assert_eq!(a, b);
        assert_eq!(a.len(), FINGERPRINT_LEN);
        assert!((l2_norm(&a) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_device_fingerprint_of_zero_bytes_is_zero_vector() {
        let fp = device_fingerprint(&[0u8; 512]);
        assert!(fp.iter().all(|v| *v == 0.0));
        assert!(fp.iter().all(|v| !v.is_nan()));
    }

    #[test]
    fn test_device_fingerprint_ignores_bytes_past_prefix() {
        let mut bytes = vec![7u8; 20_000];
        let a = device_fingerprint(&bytes);
        bytes[15_000] = 200;
        let b = device_fingerprint(&bytes);
        assert_eq!(a, b);
    }

    #[test]
    fn test_temporal_fingerprint_depends_on_length() {
        let a = temporal_fingerprint(&vec![0u8; 100]);
        let b = temporal_fingerprint(&vec![0u8; 101]);

        assert_eq!(a[0], (100 % 255) as f64 / 255.0);
        assert_eq!(a[1], 0.5);
        assert_ne!(a[0], b[0]);
    }

    #[test]
    fn test_acoustic_fingerprint_shape() {
        let fp = acoustic_fingerprint(&vec![0u8; 300]);
        assert_eq!(fp[5], (300 % 255) as f64 / 255.0);
        assert_eq!(fp[20], 0.8);
        assert_eq!(fp[1], 0.1);
    }

    #[test]
    fn test_cosine_of_identical_vectors_is_one() {
        let v = vec![0.3, 0.4, 0.5, 0.1];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_cosine_of_orthogonal_vectors_is_zero() {
        let a = [1.0, 0.0];
        let b = [0.0, 1.0];
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[test]
    fn test_cosine_zero_norm_guard() {
        let zero = [0.0, 0.0, 0.0];
        let v = [1.0, 2.0, 3.0];
        assert_eq!(cosine_similarity(&zero, &v), 0.0);
        assert_eq!(cosine_similarity(&v, &zero), 0.0);
    }

    #[test]
    fn test_cosine_length_mismatch_is_zero() {
        assert_eq!(cosine_similarity(&[1.0, 2.0], &[1.0, 2.0, 3.0]), 0.0);
    }
}
