//! Configuration for decompositions.

use crate::emd::num_imfs;
use crate::error::EmdError;

/// Default S-number when neither criterion is specified.
pub const DEFAULT_S_NUMBER: usize = 4;
/// Default sifting limit when neither criterion is specified.
pub const DEFAULT_NUM_SIFTINGS: usize = 50;

/// Stopping criteria for the sifting loop.
///
/// Sifting stops when either enabled criterion fires. A value of `0`
/// disables the corresponding criterion; at least one must be enabled.
///
/// - `s_number`: stop after that many consecutive iterations in which the
///   extrema are good and the count of extrema plus zero crossings changes by
///   at most one.
/// - `num_siftings`: hard limit on envelope-mean subtractions per IMF.
///
/// With `num_siftings = 0` sifting has no upper bound; a warning is logged
/// when such criteria are used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoppingCriteria {
    s_number: usize,
    num_siftings: usize,
}

impl StoppingCriteria {
    /// Creates criteria from explicit values.
    ///
    /// # Errors
    ///
    /// Returns [`EmdError::NoStoppingCriterion`] if both are zero.
    pub fn new(s_number: usize, num_siftings: usize) -> Result<Self, EmdError> {
        if s_number == 0 && num_siftings == 0 {
            return Err(EmdError::NoStoppingCriterion);
        }
        Ok(Self {
            s_number,
            num_siftings,
        })
    }

    /// Resolves possibly-absent, possibly-negative user values.
    ///
    /// | S-number | num_siftings | Result |
    /// |----------|--------------|--------|
    /// | absent | absent | `(4, 50)` |
    /// | `s` | absent | `(s, 0)` |
    /// | absent | `n` | `(0, n)` |
    /// | `s` | `n` | `(s, n)` |
    ///
    /// # Errors
    ///
    /// Negative values give [`EmdError::NegativeSNumber`] or
    /// [`EmdError::NegativeNumSiftings`]; a result of `(0, 0)` gives
    /// [`EmdError::NoStoppingCriterion`].
    ///
    /// # Example
    ///
    /// ```
    /// use sift_emd::StoppingCriteria;
    ///
    /// let c = StoppingCriteria::resolve(Some(10), None).unwrap();
    /// assert_eq!((c.s_number(), c.num_siftings()), (10, 0));
    /// ```
    pub fn resolve(s_number: Option<i64>, num_siftings: Option<i64>) -> Result<Self, EmdError> {
        if let Some(s) = s_number
            && s < 0
        {
            return Err(EmdError::NegativeSNumber { s_number: s });
        }
        if let Some(n) = num_siftings
            && n < 0
        {
            return Err(EmdError::NegativeNumSiftings { num_siftings: n });
        }
        let (s, n) = match (s_number, num_siftings) {
            (None, None) => (DEFAULT_S_NUMBER, DEFAULT_NUM_SIFTINGS),
            (Some(s), None) => (s as usize, 0),
            (None, Some(n)) => (0, n as usize),
            (Some(s), Some(n)) => (s as usize, n as usize),
        };
        Self::new(s, n)
    }

    /// Returns the S-number (`0` = disabled).
    pub fn s_number(&self) -> usize {
        self.s_number
    }

    /// Returns the sifting limit (`0` = disabled).
    pub fn num_siftings(&self) -> usize {
        self.num_siftings
    }

    /// Returns `true` if the sifting limit is enabled.
    pub fn is_bounded(&self) -> bool {
        self.num_siftings > 0
    }
}

impl Default for StoppingCriteria {
    fn default() -> Self {
        Self {
            s_number: DEFAULT_S_NUMBER,
            num_siftings: DEFAULT_NUM_SIFTINGS,
        }
    }
}

/// Decomposition method.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Method {
    /// Plain empirical mode decomposition.
    Emd,
    /// Ensemble EMD: average of noise-perturbed EMDs.
    #[default]
    Eemd,
    /// Complete ensemble EMD with adaptive noise.
    Ceemdan,
}

impl Method {
    /// Parses a method name (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`EmdError::UnsupportedMethod`] for unknown names.
    pub fn from_name(name: &str) -> Result<Self, EmdError> {
        match name.to_ascii_lowercase().as_str() {
            "emd" => Ok(Self::Emd),
            "eemd" => Ok(Self::Eemd),
            "ceemdan" => Ok(Self::Ceemdan),
            _ => Err(EmdError::UnsupportedMethod(name.to_string())),
        }
    }

    /// Returns the lowercase name of the method.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Emd => "emd",
            Self::Eemd => "eemd",
            Self::Ceemdan => "ceemdan",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Configuration for an ensemble decomposition.
///
/// # Example
///
/// ```
/// use sift_emd::{DecomposeConfig, StoppingCriteria};
///
/// let config = DecomposeConfig::new()
///     .with_ensemble_size(100)
///     .with_noise_strength(0.3)
///     .with_criteria(StoppingCriteria::new(0, 10).unwrap())
///     .with_seed(42);
///
/// assert_eq!(config.validate(64).unwrap(), 6);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DecomposeConfig {
    /// Number of output rows (IMFs plus residual); `None` = natural maximum.
    num_imfs: Option<usize>,
    /// Number of ensemble members.
    ensemble_size: usize,
    /// Noise standard deviation relative to the input's standard deviation.
    noise_strength: f64,
    /// Sifting stopping criteria.
    criteria: StoppingCriteria,
    /// RNG seed (`0` = entropy-seeded).
    seed: u64,
    /// Run ensemble members on the rayon pool.
    parallel: bool,
}

impl DecomposeConfig {
    /// Creates a configuration with default values.
    ///
    /// Defaults: natural IMF count, `ensemble_size = 250`,
    /// `noise_strength = 0.2`, criteria `(4, 50)`, `seed = 0`,
    /// `parallel = true`.
    pub fn new() -> Self {
        Self {
            num_imfs: None,
            ensemble_size: 250,
            noise_strength: 0.2,
            criteria: StoppingCriteria::default(),
            seed: 0,
            parallel: true,
        }
    }

    /// Sets the number of output rows (IMFs plus residual).
    pub fn with_num_imfs(mut self, num_imfs: usize) -> Self {
        self.num_imfs = Some(num_imfs);
        self
    }

    /// Sets or clears the number of output rows.
    pub fn with_num_imfs_opt(mut self, num_imfs: Option<usize>) -> Self {
        self.num_imfs = num_imfs;
        self
    }

    /// Sets the ensemble size.
    pub fn with_ensemble_size(mut self, ensemble_size: usize) -> Self {
        self.ensemble_size = ensemble_size;
        self
    }

    /// Sets the relative noise strength.
    pub fn with_noise_strength(mut self, noise_strength: f64) -> Self {
        self.noise_strength = noise_strength;
        self
    }

    /// Sets the sifting stopping criteria.
    pub fn with_criteria(mut self, criteria: StoppingCriteria) -> Self {
        self.criteria = criteria;
        self
    }

    /// Sets the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Enables or disables parallel ensemble execution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Returns the requested number of output rows.
    pub fn num_imfs(&self) -> Option<usize> {
        self.num_imfs
    }

    /// Returns the ensemble size.
    pub fn ensemble_size(&self) -> usize {
        self.ensemble_size
    }

    /// Returns the relative noise strength.
    pub fn noise_strength(&self) -> f64 {
        self.noise_strength
    }

    /// Returns the stopping criteria.
    pub fn criteria(&self) -> StoppingCriteria {
        self.criteria
    }

    /// Returns the RNG seed.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns whether ensemble members run in parallel.
    pub fn parallel(&self) -> bool {
        self.parallel
    }

    /// Validates this configuration for a signal of length `len` and
    /// returns the resolved number of output rows.
    ///
    /// Signals of length 0 or 1 always resolve to a single row.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`EmdError::InvalidEnsembleSize`] | `ensemble_size == 0` |
    /// | [`EmdError::InvalidNoiseStrength`] | negative or non-finite noise |
    /// | [`EmdError::InvalidNumImfs`] | requested rows outside `1..=max(num_imfs(len), 1)` |
    pub fn validate(&self, len: usize) -> Result<usize, EmdError> {
        if self.ensemble_size < 1 {
            return Err(EmdError::InvalidEnsembleSize {
                ensemble_size: self.ensemble_size,
            });
        }
        if !self.noise_strength.is_finite() || self.noise_strength < 0.0 {
            return Err(EmdError::InvalidNoiseStrength {
                noise_strength: self.noise_strength,
            });
        }
        resolve_rows(self.num_imfs, len)
    }
}

impl Default for DecomposeConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolves a requested row count against the natural maximum for `len`.
pub(crate) fn resolve_rows(requested: Option<usize>, len: usize) -> Result<usize, EmdError> {
    let max = num_imfs(len).max(1);
    match requested {
        None => Ok(max),
        Some(m) if (1..=max).contains(&m) => Ok(m),
        Some(m) => Err(EmdError::InvalidNumImfs {
            requested: m,
            max,
            len,
        }),
    }
}
