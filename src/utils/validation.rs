/// Validate audio data.
///
/// # Arguments
/// * `y` - Audio samples to validate
///
/// # Returns
/// `Ok(())` if valid
///
/// # Errors
/// Returns `Error::EmptyAudio` for an empty buffer and
/// `Error::NonFiniteAudio` if any sample is NaN or infinite.
///
/// # Example
/// ```
/// use glottis::utils::valid_audio;
///
/// let y = vec![0.0, 0.5, -0.5, 0.0];
/// assert!(valid_audio(&y).is_ok());
///
/// let empty: Vec<f32> = vec![];
/// assert!(valid_audio(&empty).is_err());
/// ```
pub fn valid_audio(y: &[f32]) -> crate::Result<()> {
    if y.is_empty() {
        return Err(crate::Error::EmptyAudio);
    }

    if !y.iter().all(|&v| v.is_finite()) {
        return Err(crate::Error::NonFiniteAudio);
    }

    Ok(())
}

/// Count sign changes between consecutive samples.
///
/// A sample counts as negative when its sign bit is set: `0.0` is
/// non-negative, `-0.0` is negative.
///
/// # Example
/// ```
/// use glottis::utils::sign_changes;
///
/// assert_eq!(sign_changes(&[1.0, -1.0, 1.0, -1.0]), 3);
/// assert_eq!(sign_changes(&[-1.0, 0.0, 1.0]), 1);
/// ```
pub fn sign_changes(y: &[f32]) -> usize {
    y.windows(2)
        .filter(|pair| pair[0].is_sign_negative() != pair[1].is_sign_negative())
        .count()
}
