//! # sift-emd
//!
//! Empirical Mode Decomposition of one-dimensional signals, with the
//! noise-assisted variants EEMD and CEEMDAN.
//!
//! ## Decomposition Pipeline
//!
//! ```mermaid
//! graph LR
//!     A["Signal::new(data)?"] -->|"validate"| B["Signal"]
//!     B -->|"emd(&signal, m, criteria)?"| C["Imfs"]
//!     B -->|"eemd(&signal, &config)?"| C
//!     B -->|"ceemdan(&signal, &config)?"| C
//!     C --> D[".imf(i)"]
//!     C --> E[".residual()"]
//!     C --> F[".variance_fractions()"]
//!     C --> G[".reconstruction_error(&data)"]
//! ```
//!
//! Each IMF is extracted by sifting: the mean of the cubic-spline envelopes
//! through the local maxima and minima is subtracted until the
//! [`StoppingCriteria`] fire.
//!
//! ## Methods
//!
//! | Method | Noise | Members |
//! |--------|-------|---------|
//! | [`Method::Emd`] | none | 1 |
//! | [`Method::Eemd`] | white noise added to the input | `ensemble_size` |
//! | [`Method::Ceemdan`] | IMFs of white noise added per stage | `ensemble_size` |
//!
//! ## Quick Start
//!
//! ```
//! use sift_emd::{DecomposeConfig, Signal, eemd};
//!
//! let data: Vec<f64> = (0..256).map(|i| (i as f64 * 0.3).sin() + (i as f64 * 0.02).cos()).collect();
//! let signal = Signal::new(data.clone()).unwrap();
//! let config = DecomposeConfig::new().with_ensemble_size(20).with_seed(42);
//! let imfs = eemd(&signal, &config).unwrap();
//!
//! assert_eq!(imfs.n_rows(), 8);
//! assert!(imfs.reconstruction_error(&data) < 1e-9);
//! ```

mod config;
mod emd;
mod ensemble;
mod error;
mod extrema;
mod imfs;
mod random;
mod series;
mod sift;
mod spline;

pub use config::{DEFAULT_NUM_SIFTINGS, DEFAULT_S_NUMBER, DecomposeConfig, Method, StoppingCriteria};
pub use emd::{num_imfs, try_num_imfs};
pub use ensemble::{ceemdan, decompose, eemd, emd};
pub use error::EmdError;
pub use extrema::{ExtremumSet, count_zero_crossings, find_extrema};
pub use imfs::Imfs;
pub use random::NoiseSource;
pub use series::Signal;
pub use sift::{SiftOutcome, SiftReport};
pub use spline::evaluate_spline;
