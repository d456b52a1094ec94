//! Noise-assisted decompositions: EEMD and CEEMDAN.

use rayon::prelude::*;
use tracing::{debug, info, trace, warn};

use crate::config::{DecomposeConfig, Method, StoppingCriteria};
use crate::emd::EmdEngine;
use crate::error::EmdError;
use crate::imfs::{Imfs, std_dev};
use crate::random::NoiseSource;
use crate::series::Signal;
use crate::sift::warn_if_unbounded;

/// Upper bound on ensemble members whose noise is drawn and dispatched
/// together.
///
/// Noise for a chunk is drawn sequentially before the chunk runs, so member
/// `i` always receives the same slice of the random stream whatever the
/// chunk size.
const CHUNK_SIZE: usize = 64;

/// Number of `f64` member outputs one chunk may hold at once (128 MiB).
const CHUNK_BUDGET: usize = 1 << 24;

/// Members per chunk for `m` rows of `n` samples.
fn members_per_chunk(m: usize, n: usize) -> usize {
    (CHUNK_BUDGET / (m * n).max(1)).clamp(1, CHUNK_SIZE)
}

/// Decomposes a signal with plain EMD.
///
/// Equivalent to [`eemd`] with `ensemble_size = 1` and
/// `noise_strength = 0`. `num_imfs = None` selects the natural maximum
/// [`num_imfs(len)`](crate::num_imfs). The result carries one
/// [`SiftReport`](crate::SiftReport) per IMF.
///
/// # Errors
///
/// See [`DecomposeConfig::validate`]; [`EmdError::SplineSolveFailed`] if an
/// envelope cannot be fitted.
///
/// # Example
///
/// ```
/// use sift_emd::{Signal, StoppingCriteria, emd};
///
/// let data: Vec<f64> = (0..128).map(|i| (i as f64 * 0.4).sin() + 0.01 * i as f64).collect();
/// let signal = Signal::new(data.clone()).unwrap();
/// let imfs = emd(&signal, None, StoppingCriteria::default()).unwrap();
/// assert_eq!(imfs.n_rows(), 7);
/// assert!(imfs.reconstruction_error(&data) < 1e-9);
/// ```
pub fn emd(
    signal: &Signal,
    num_imfs: Option<usize>,
    criteria: StoppingCriteria,
) -> Result<Imfs, EmdError> {
    let config = DecomposeConfig::new()
        .with_num_imfs_opt(num_imfs)
        .with_ensemble_size(1)
        .with_noise_strength(0.0)
        .with_criteria(criteria)
        .with_parallel(false);
    eemd(signal, &config)
}

/// Decomposes a signal with Ensemble EMD.
///
/// Each member decomposes the input plus Gaussian noise of standard
/// deviation `noise_strength * sd(input)`; the rows are averaged over the
/// ensemble.
///
/// When noise is added, the residual row is not the plain ensemble average
/// of the members' residuals: it is set to the input minus the averaged
/// IMFs, absorbing the averaged noise so the rows always sum to the input
/// exactly. The IMF rows are plain averages.
///
/// A zero noise amplitude (zero strength or a constant input) makes every
/// member identical; a single trial is run and no noise is drawn.
///
/// Output is identical for a given nonzero seed regardless of
/// [`DecomposeConfig::parallel`] and the rayon thread count.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`EmdError::InvalidEnsembleSize`] | `ensemble_size == 0` |
/// | [`EmdError::InvalidNoiseStrength`] | negative or non-finite noise |
/// | [`EmdError::InvalidNumImfs`] | row count out of range |
/// | [`EmdError::SplineSolveFailed`] | envelope fit failed in any member |
pub fn eemd(signal: &Signal, config: &DecomposeConfig) -> Result<Imfs, EmdError> {
    let input = signal.as_slice();
    let n = input.len();
    let m = config.validate(n)?;
    if n <= 1 {
        return Ok(Imfs::new(input.to_vec(), 1, n));
    }

    let criteria = config.criteria();
    warn_if_unbounded(criteria);
    let ensemble_size = config.ensemble_size();
    let sigma = config.noise_strength() * std_dev(input);
    info!(
        len = n,
        rows = m,
        ensemble_size,
        noise_sigma = sigma,
        "EEMD started"
    );

    if sigma == 0.0 {
        if ensemble_size > 1 {
            warn!(
                ensemble_size,
                "noise amplitude is zero; all ensemble members are identical, running one trial"
            );
        }
        let imfs = single_trial(input, m, criteria)?;
        info!(rows = m, "EEMD finished");
        return Ok(imfs);
    }

    let mut sum = ensemble_sum(input, m, sigma, config, members_per_chunk(m, n))?;
    let scale = 1.0 / ensemble_size as f64;
    for s in sum.iter_mut() {
        *s *= scale;
    }
    absorb_into_residual(&mut sum, input, m);

    info!(rows = m, "EEMD finished");
    Ok(Imfs::new(sum, m, n))
}

/// Decomposes a signal with Complete Ensemble EMD with Adaptive Noise.
///
/// `ensemble_size` unit-variance noise realizations are drawn once and
/// decomposed once. At stage `k` every member sifts the current residual
/// plus `sigma` times the `k`-th IMF of its realization, where
/// `sigma = noise_strength * sd(input)`; the `k`-th IMF of the result is the
/// ensemble mean of the members' first IMFs. The rows always sum to the
/// input.
///
/// With a zero noise amplitude the result equals [`emd`].
///
/// # Errors
///
/// Same as [`eemd`].
pub fn ceemdan(signal: &Signal, config: &DecomposeConfig) -> Result<Imfs, EmdError> {
    let input = signal.as_slice();
    let n = input.len();
    let m = config.validate(n)?;
    if n <= 1 {
        return Ok(Imfs::new(input.to_vec(), 1, n));
    }

    let criteria = config.criteria();
    warn_if_unbounded(criteria);
    let ensemble_size = config.ensemble_size();
    let sigma = config.noise_strength() * std_dev(input);
    info!(
        len = n,
        rows = m,
        ensemble_size,
        noise_sigma = sigma,
        "CEEMDAN started"
    );

    if sigma == 0.0 {
        if ensemble_size > 1 {
            warn!(
                ensemble_size,
                "noise amplitude is zero; all ensemble members are identical, running one trial"
            );
        }
        let imfs = single_trial(input, m, criteria)?;
        info!(rows = m, "CEEMDAN finished");
        return Ok(imfs);
    }

    let mut rng = NoiseSource::new(config.seed());
    let realizations: Vec<Vec<f64>> = (0..ensemble_size)
        .map(|_| rng.gaussian_vec(n, 1.0))
        .collect();

    // The leading rows of a decomposition do not depend on how many rows
    // follow, so decomposing to `m` rows yields the same IMFs as the natural
    // maximum.
    let noise_imfs = run_members(&realizations, n, config.parallel(), |engine, z| {
        let mut out = vec![0.0; m * n];
        engine.decompose_into(z, m, criteria, &mut out)?;
        out.truncate((m - 1) * n);
        Ok(out)
    })?;
    debug!(realizations = ensemble_size, "noise realizations decomposed");

    let pairs: Vec<(&[f64], &[f64])> = realizations
        .iter()
        .zip(&noise_imfs)
        .map(|(z, imfs)| (z.as_slice(), imfs.as_slice()))
        .collect();

    let mut out = vec![0.0; m * n];
    let mut residual = input.to_vec();
    let scale = 1.0 / ensemble_size as f64;

    for (k, row) in out.chunks_exact_mut(n).take(m - 1).enumerate() {
        let firsts = run_members(&pairs, n, config.parallel(), |engine, &(z, imfs)| {
            let noise = imfs.get(k * n..(k + 1) * n).unwrap_or(z);
            let perturbed: Vec<f64> = residual
                .iter()
                .zip(noise)
                .map(|(r, v)| r + sigma * v)
                .collect();
            let mut imf = vec![0.0; n];
            engine.first_imf(&perturbed, criteria, &mut imf)?;
            Ok(imf)
        })?;
        for member in &firsts {
            for (o, &v) in row.iter_mut().zip(member) {
                *o += v;
            }
        }
        for (o, r) in row.iter_mut().zip(residual.iter_mut()) {
            *o *= scale;
            *r -= *o;
        }
        debug!(imf = k + 1, "CEEMDAN stage finished");
    }
    out[(m - 1) * n..].copy_from_slice(&residual);

    info!(rows = m, "CEEMDAN finished");
    Ok(Imfs::new(out, m, n))
}

/// Runs the decomposition selected by `method`.
///
/// [`Method::Emd`] uses only the row count and stopping criteria of
/// `config`.
///
/// # Errors
///
/// Propagates the errors of the selected method.
pub fn decompose(
    signal: &Signal,
    method: Method,
    config: &DecomposeConfig,
) -> Result<Imfs, EmdError> {
    match method {
        Method::Emd => emd(signal, config.num_imfs(), config.criteria()),
        Method::Eemd => eemd(signal, config),
        Method::Ceemdan => ceemdan(signal, config),
    }
}

/// Decomposes `input` once without noise and records the sift reports.
fn single_trial(input: &[f64], m: usize, criteria: StoppingCriteria) -> Result<Imfs, EmdError> {
    let n = input.len();
    let mut out = vec![0.0; m * n];
    let reports = EmdEngine::new(n).decompose_into(input, m, criteria, &mut out)?;
    for (k, report) in reports.iter().enumerate() {
        debug!(
            imf = k + 1,
            siftings = report.siftings,
            outcome = ?report.outcome,
            "IMF extracted"
        );
    }
    Ok(Imfs::new(out, m, n).with_sift_reports(reports))
}

/// Applies `f` to every item with a per-worker engine, preserving order.
fn run_members<T, R, F>(items: &[T], n: usize, parallel: bool, f: F) -> Result<Vec<R>, EmdError>
where
    T: Sync,
    R: Send,
    F: Fn(&mut EmdEngine, &T) -> Result<R, EmdError> + Sync + Send,
{
    if parallel {
        items
            .par_iter()
            .map_init(|| EmdEngine::new(n), |engine, item| f(engine, item))
            .collect()
    } else {
        let mut engine = EmdEngine::new(n);
        items.iter().map(|item| f(&mut engine, item)).collect()
    }
}

/// Sums the rows of every noisy EEMD member in member order.
///
/// At most `chunk` member outputs are alive at once.
fn ensemble_sum(
    input: &[f64],
    m: usize,
    sigma: f64,
    config: &DecomposeConfig,
    chunk: usize,
) -> Result<Vec<f64>, EmdError> {
    let n = input.len();
    let ensemble_size = config.ensemble_size();
    let criteria = config.criteria();
    let mut rng = NoiseSource::new(config.seed());
    let mut sum = vec![0.0; m * n];
    let mut noise = vec![0.0; chunk.min(ensemble_size) * n];

    let mut start = 0;
    while start < ensemble_size {
        let count = chunk.min(ensemble_size - start);
        let block = &mut noise[..count * n];
        rng.fill_gaussian(block, sigma);
        trace!(first_member = start, members = count, "ensemble chunk dispatched");

        let members: Vec<&[f64]> = block.chunks_exact(n).collect();
        let rows = run_members(&members, n, config.parallel(), |engine, noise| {
            let perturbed: Vec<f64> = input.iter().zip(noise.iter()).map(|(x, z)| x + z).collect();
            let mut out = vec![0.0; m * n];
            engine.decompose_into(&perturbed, m, criteria, &mut out)?;
            Ok(out)
        })?;
        for member in &rows {
            for (s, &v) in sum.iter_mut().zip(member) {
                *s += v;
            }
        }
        start += count;
    }
    Ok(sum)
}

/// Adds `input - column_sums(rows)` to the residual row.
fn absorb_into_residual(rows: &mut [f64], input: &[f64], m: usize) {
    let n = input.len();
    let (imfs, residual) = rows.split_at_mut((m - 1) * n);
    for (j, r) in residual.iter_mut().enumerate() {
        let imf_sum: f64 = (0..m - 1).map(|k| imfs[k * n + j]).sum();
        *r = input[j] - imf_sum;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emd::num_imfs;
    use approx::assert_abs_diff_eq;

    fn chirp(n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| {
                let t = i as f64 / n as f64;
                (40.0 * t * t).sin() + 0.5 * (6.0 * t).cos() + t
            })
            .collect()
    }

    #[test]
    fn absorb_makes_columns_exact() {
        let mut rows = vec![1.0, 2.0, 0.5, 0.5, 9.0, 9.0];
        absorb_into_residual(&mut rows, &[2.0, 3.0], 3);
        assert_eq!(&rows[4..], &[0.5, 0.5]);
    }

    #[test]
    fn eemd_small_ensemble_complete() {
        let data = chirp(150);
        let signal = Signal::new(data.clone()).unwrap();
        let config = DecomposeConfig::new()
            .with_ensemble_size(10)
            .with_noise_strength(0.2)
            .with_seed(17);
        let imfs = eemd(&signal, &config).unwrap();
        assert_eq!(imfs.n_rows(), num_imfs(150));
        assert!(imfs.sift_reports().is_empty());
        assert!(imfs.reconstruction_error(&data) < 1e-9);
    }

    #[test]
    fn eemd_chunk_boundary_deterministic() {
        // more members than one chunk
        let data = chirp(40);
        let signal = Signal::new(data).unwrap();
        let config = DecomposeConfig::new()
            .with_ensemble_size(CHUNK_SIZE + 5)
            .with_criteria(StoppingCriteria::new(0, 5).unwrap())
            .with_seed(3);
        let a = eemd(&signal, &config).unwrap();
        let b = eemd(&signal, &config.clone().with_parallel(false)).unwrap();
        assert_eq!(a.as_slice(), b.as_slice());
    }

    #[test]
    fn chunk_size_bounded_by_memory() {
        assert_eq!(members_per_chunk(8, 256), CHUNK_SIZE);
        assert_eq!(members_per_chunk(16, 100_000), 10);
        assert_eq!(members_per_chunk(20, 1_000_000), 1);
        assert_eq!(members_per_chunk(1, 0), CHUNK_SIZE);
    }

    #[test]
    fn ensemble_sum_independent_of_chunk_size() {
        let data = chirp(60);
        let config = DecomposeConfig::new()
            .with_ensemble_size(7)
            .with_criteria(StoppingCriteria::new(0, 6).unwrap())
            .with_seed(11);
        let m = num_imfs(60);
        let whole = ensemble_sum(&data, m, 0.1, &config, CHUNK_SIZE).unwrap();
        for chunk in [1, 2, 3] {
            let split = ensemble_sum(&data, m, 0.1, &config, chunk).unwrap();
            assert_eq!(split, whole);
        }
    }

    #[test]
    fn zero_noise_ensemble_equals_emd() {
        let data = chirp(100);
        let signal = Signal::new(data).unwrap();
        let config = DecomposeConfig::new()
            .with_ensemble_size(8)
            .with_noise_strength(0.0);
        let ensemble = eemd(&signal, &config).unwrap();
        let single = emd(&signal, None, StoppingCriteria::default()).unwrap();
        assert_eq!(ensemble, single);
    }

    #[test]
    fn ceemdan_complete() {
        let data = chirp(120);
        let signal = Signal::new(data.clone()).unwrap();
        let config = DecomposeConfig::new()
            .with_ensemble_size(12)
            .with_noise_strength(0.1)
            .with_seed(5);
        let imfs = ceemdan(&signal, &config).unwrap();
        assert_eq!(imfs.n_rows(), num_imfs(120));
        let recon = imfs.reconstruct();
        for (r, x) in recon.iter().zip(&data) {
            assert_abs_diff_eq!(r, x, epsilon = 1e-9);
        }
    }

    #[test]
    fn ceemdan_zero_noise_equals_emd() {
        let data = chirp(64);
        let signal = Signal::new(data).unwrap();
        let config = DecomposeConfig::new().with_noise_strength(0.0);
        let a = ceemdan(&signal, &config).unwrap();
        let b = emd(&signal, None, StoppingCriteria::default()).unwrap();
        assert_eq!(a.as_slice(), b.as_slice());
    }

    #[test]
    fn decompose_dispatches() {
        let data = chirp(64);
        let signal = Signal::new(data).unwrap();
        let config = DecomposeConfig::new()
            .with_num_imfs(3)
            .with_ensemble_size(4)
            .with_seed(9);
        assert_eq!(
            decompose(&signal, Method::Emd, &config).unwrap(),
            emd(&signal, Some(3), StoppingCriteria::default()).unwrap()
        );
        assert_eq!(
            decompose(&signal, Method::Eemd, &config).unwrap(),
            eemd(&signal, &config).unwrap()
        );
        assert_eq!(
            decompose(&signal, Method::Ceemdan, &config).unwrap(),
            ceemdan(&signal, &config).unwrap()
        );
    }

    #[test]
    fn short_signals_pass_through() {
        for data in [vec![], vec![2.5]] {
            let signal = Signal::new(data.clone()).unwrap();
            let config = DecomposeConfig::new().with_seed(1);
            for imfs in [
                eemd(&signal, &config).unwrap(),
                ceemdan(&signal, &config).unwrap(),
            ] {
                assert_eq!(imfs.n_rows(), 1);
                assert_eq!(imfs.residual(), data.as_slice());
            }
        }
    }

    #[test]
    fn validation_before_work() {
        let signal = Signal::new(chirp(32)).unwrap();
        let config = DecomposeConfig::new().with_ensemble_size(0);
        assert_eq!(
            eemd(&signal, &config).unwrap_err(),
            EmdError::InvalidEnsembleSize { ensemble_size: 0 }
        );
        assert_eq!(
            ceemdan(&signal, &config).unwrap_err(),
            EmdError::InvalidEnsembleSize { ensemble_size: 0 }
        );
    }
}
