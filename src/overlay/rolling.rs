//! Fixed-size rolling means over ordered values.

use crate::error::AidWeatherError;

/// Where a window sits relative to the row it produces a value for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowAlignment {
    /// The row and the `window - 1` rows before it.
    #[default]
    Trailing,
    /// The row in the middle; for even windows the extra row is taken from before.
    Centered,
}

/// Rolling mean of `values` over `window` rows.
///
/// Windows are clipped at the ends of the slice. A row gets a value only if
/// its window holds at least `min_periods` non-null entries; the mean is
/// taken over those entries.
///
/// # Errors
///
/// Returns [`AidWeatherError::InvalidWindow`] if `window` is 0.
pub fn rolling_mean(
    values: &[Option<f64>],
    window: usize,
    alignment: WindowAlignment,
    min_periods: usize,
) -> Result<Vec<Option<f64>>, AidWeatherError> {
    if window == 0 {
        return Err(AidWeatherError::InvalidWindow);
    }
    let n = values.len();
    let ahead = match alignment {
        WindowAlignment::Trailing => 0,
        WindowAlignment::Centered => (window - 1) / 2,
    };

    let averaged = (0..n)
        .map(|i| {
            // Window is [i + ahead + 1 - window, i + ahead], clipped to the slice
            let end = (i + ahead + 1).min(n);
            let start = (i + ahead + 1).saturating_sub(window);
            let (sum, count) = values[start..end]
                .iter()
                .flatten()
                .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
            (count >= min_periods.max(1)).then(|| sum / count as f64)
        })
        .collect();
    Ok(averaged)
}
