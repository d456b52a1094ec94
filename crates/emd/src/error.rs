//! Error types for the sift-emd crate.

/// Error type for all fallible operations in the sift-emd crate.
///
/// Configuration errors are detected before any noise is drawn or any
/// sifting starts, so a failed call never leaves partial results behind.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EmdError {
    /// Returned when the input data contains non-finite values (NaN or infinity).
    #[error("input data contains non-finite values")]
    NonFiniteData,

    /// Returned when a signal length is negative.
    #[error("signal length must be non-negative, got {len}")]
    NegativeLength {
        /// The invalid length.
        len: i64,
    },

    /// Returned when the ensemble size is zero.
    #[error("ensemble_size must be >= 1, got {ensemble_size}")]
    InvalidEnsembleSize {
        /// The invalid ensemble size.
        ensemble_size: usize,
    },

    /// Returned when the noise strength is negative or non-finite.
    #[error("noise_strength must be finite and non-negative, got {noise_strength}")]
    InvalidNoiseStrength {
        /// The invalid noise strength.
        noise_strength: f64,
    },

    /// Returned when a negative S-number is supplied.
    #[error("S_number must be non-negative, got {s_number}")]
    NegativeSNumber {
        /// The invalid S-number.
        s_number: i64,
    },

    /// Returned when a negative sifting limit is supplied.
    #[error("num_siftings must be non-negative, got {num_siftings}")]
    NegativeNumSiftings {
        /// The invalid sifting limit.
        num_siftings: i64,
    },

    /// Returned when both the S-number and the sifting limit are disabled.
    #[error("one of S_number or num_siftings must be positive")]
    NoStoppingCriterion,

    /// Returned when the requested IMF count is zero or above the natural maximum.
    #[error("num_imfs must be in 1..={max} for length {len}, got {requested}")]
    InvalidNumImfs {
        /// IMF count that was requested.
        requested: usize,
        /// Largest IMF count allowed for this length.
        max: usize,
        /// Length of the input signal.
        len: usize,
    },

    /// Returned when fewer than two spline knots are given.
    #[error("spline needs at least 2 knots, got {got}")]
    TooFewKnots {
        /// Number of knots provided.
        got: usize,
    },

    /// Returned when the knot abscissas and ordinates differ in length.
    #[error("knot length mismatch: {x_len} abscissas, {y_len} ordinates")]
    KnotLengthMismatch {
        /// Number of abscissas.
        x_len: usize,
        /// Number of ordinates.
        y_len: usize,
    },

    /// Returned when a knot coordinate is NaN or infinite.
    #[error("spline knots contain non-finite values")]
    NonFiniteKnots,

    /// Returned when the first knot abscissa is not zero.
    #[error("first knot must be at 0, got {x0}")]
    FirstKnotNotZero {
        /// The first abscissa.
        x0: f64,
    },

    /// Returned when the last knot abscissa is not an integer.
    #[error("last knot must be at an integer position, got {x_last}")]
    LastKnotNotInteger {
        /// The last abscissa.
        x_last: f64,
    },

    /// Returned when the last knot abscissa exceeds `u32::MAX`.
    #[error("last knot position {x_last} exceeds the supported maximum {max}")]
    LastKnotTooLarge {
        /// The last abscissa.
        x_last: f64,
        /// Largest accepted last abscissa.
        max: f64,
    },

    /// Returned when the knot abscissas are not strictly increasing.
    #[error("knot abscissas must be strictly increasing (violated at index {index})")]
    KnotsNotIncreasing {
        /// Index of the first knot that is not above its predecessor.
        index: usize,
    },

    /// Returned when the tridiagonal spline system cannot be solved.
    #[error("spline system is singular at row {row}")]
    SplineSolveFailed {
        /// Row at which elimination hit a zero or non-finite pivot.
        row: usize,
    },

    /// Returned when an unsupported decomposition method name is provided.
    #[error("unsupported decomposition method: {0}")]
    UnsupportedMethod(String),
}
