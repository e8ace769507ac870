//! Error types for the boundary of the simulation
//!
//! Stepping and collision code never fails; errors only come from parsing
//! user-supplied values and from loading/saving settings.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("hex color code expected, got {0:?}")]
    InvalidColor(String),

    #[error("alpha must be within [0, 1], got {0}")]
    InvalidAlpha(f64),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type SimResult<T> = Result<T, SimError>;

/// Check that an alpha value lies within [0, 1] (NaN rejected)
pub fn validate_alpha(alpha: f64) -> SimResult<f64> {
    if (0.0..=1.0).contains(&alpha) {
        Ok(alpha)
    } else {
        Err(SimError::InvalidAlpha(alpha))
    }
}
