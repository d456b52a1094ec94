//! Not-a-knot cubic spline evaluation on an integer grid.

use crate::error::EmdError;

/// Largest last-knot position [`evaluate_spline`] accepts.
///
/// Bounds the output length so that a valid-looking knot such as `1e300`
/// is rejected instead of overflowing the index conversion.
pub(crate) const MAX_SPLINE_POSITION: f64 = u32::MAX as f64;

/// Reusable buffers for the tridiagonal not-a-knot system.
///
/// Sifting fits two envelopes per iteration; keeping one workspace per
/// engine avoids reallocating these on every fit.
#[derive(Clone, Debug, Default)]
pub(crate) struct SplineWorkspace {
    c: Vec<f64>,
    diag: Vec<f64>,
    sup: Vec<f64>,
    sub: Vec<f64>,
    g: Vec<f64>,
}

impl SplineWorkspace {
    /// Creates a workspace sized for up to `n_knots` knots.
    pub(crate) fn with_capacity(n_knots: usize) -> Self {
        Self {
            c: Vec::with_capacity(n_knots),
            diag: Vec::with_capacity(n_knots),
            sup: Vec::with_capacity(n_knots),
            sub: Vec::with_capacity(n_knots),
            g: Vec::with_capacity(n_knots),
        }
    }
}

/// Evaluates the not-a-knot cubic spline through `(x, y)` at every integer
/// abscissa from `0` to the last knot.
///
/// Two knots give the straight line between them; three knots give the
/// interpolating parabola, which is the unique not-a-knot cubic through
/// three points.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`EmdError::KnotLengthMismatch`] | `x.len() != y.len()` |
/// | [`EmdError::TooFewKnots`] | fewer than two knots |
/// | [`EmdError::NonFiniteKnots`] | any coordinate is NaN or infinite |
/// | [`EmdError::FirstKnotNotZero`] | `x[0] != 0` |
/// | [`EmdError::LastKnotNotInteger`] | the last abscissa has a fractional part |
/// | [`EmdError::LastKnotTooLarge`] | the last abscissa exceeds `u32::MAX` |
/// | [`EmdError::KnotsNotIncreasing`] | abscissas not strictly increasing |
/// | [`EmdError::SplineSolveFailed`] | singular tridiagonal system |
///
/// # Example
///
/// ```
/// use sift_emd::evaluate_spline;
///
/// let line = evaluate_spline(&[0.0, 4.0], &[1.0, 3.0]).unwrap();
/// assert_eq!(line, vec![1.0, 1.5, 2.0, 2.5, 3.0]);
/// ```
pub fn evaluate_spline(x: &[f64], y: &[f64]) -> Result<Vec<f64>, EmdError> {
    validate_knots(x, y)?;
    let max_j = x[x.len() - 1] as usize;
    let mut out = vec![0.0; max_j + 1];
    let mut workspace = SplineWorkspace::with_capacity(x.len());
    evaluate_spline_into(x, y, &mut out, &mut workspace)?;
    Ok(out)
}

/// Checks the knot contract of [`evaluate_spline`].
pub(crate) fn validate_knots(x: &[f64], y: &[f64]) -> Result<(), EmdError> {
    if x.len() != y.len() {
        return Err(EmdError::KnotLengthMismatch {
            x_len: x.len(),
            y_len: y.len(),
        });
    }
    if x.len() < 2 {
        return Err(EmdError::TooFewKnots { got: x.len() });
    }
    if !x.iter().chain(y.iter()).all(|v| v.is_finite()) {
        return Err(EmdError::NonFiniteKnots);
    }
    if x[0] != 0.0 {
        return Err(EmdError::FirstKnotNotZero { x0: x[0] });
    }
    let x_last = x[x.len() - 1];
    if x_last.fract() != 0.0 {
        return Err(EmdError::LastKnotNotInteger { x_last });
    }
    if x_last > MAX_SPLINE_POSITION {
        return Err(EmdError::LastKnotTooLarge {
            x_last,
            max: MAX_SPLINE_POSITION,
        });
    }
    if let Some(index) = (1..x.len()).find(|&i| x[i] <= x[i - 1]) {
        return Err(EmdError::KnotsNotIncreasing { index });
    }
    Ok(())
}

/// Evaluates the spline into `out`, which must hold `x[last] + 1` values.
///
/// The knots are assumed valid; extrema produced by
/// [`ExtremumSet`](crate::ExtremumSet) always are.
pub(crate) fn evaluate_spline_into(
    x: &[f64],
    y: &[f64],
    out: &mut [f64],
    workspace: &mut SplineWorkspace,
) -> Result<(), EmdError> {
    let n_knots = x.len();
    let max_j = x[n_knots - 1] as usize;
    debug_assert_eq!(out.len(), max_j + 1);

    if n_knots <= 3 {
        eval_low_order(x, y, &mut out[..=max_j]);
        return Ok(());
    }

    solve_not_a_knot(x, y, workspace)?;
    let c = &workspace.c;

    let mut i = 0;
    for (j, slot) in out.iter_mut().enumerate().take(max_j) {
        let xj = j as f64;
        while i + 2 < n_knots && xj >= x[i + 1] {
            i += 1;
        }
        let dx = xj - x[i];
        if dx == 0.0 {
            *slot = y[i];
            continue;
        }
        let h = x[i + 1] - x[i];
        let b = (y[i + 1] - y[i]) / h - (h / 3.0) * (c[i + 1] + 2.0 * c[i]);
        let d = (c[i + 1] - c[i]) / (3.0 * h);
        *slot = y[i] + dx * (b + dx * (c[i] + dx * d));
    }
    out[max_j] = y[n_knots - 1];
    Ok(())
}

/// Newton-form interpolation through two or three knots.
fn eval_low_order(x: &[f64], y: &[f64], out: &mut [f64]) {
    let dd1 = (y[1] - y[0]) / (x[1] - x[0]);
    let dd2 = if x.len() == 3 {
        ((y[2] - y[1]) / (x[2] - x[1]) - dd1) / (x[2] - x[0])
    } else {
        0.0
    };
    for (j, slot) in out.iter_mut().enumerate() {
        let xj = j as f64;
        *slot = y[0] + (xj - x[0]) * (dd1 + (xj - x[1]) * dd2);
    }
}

/// Fills `workspace.c` with the quadratic coefficients of every segment.
///
/// Interior coefficients `c[1..k]` solve a tridiagonal system whose first and
/// last rows fold in the not-a-knot conditions (third derivative continuous
/// at `x[1]` and `x[k-1]`); `c[0]` and `c[k]` follow from the same conditions.
fn solve_not_a_knot(
    x: &[f64],
    y: &[f64],
    workspace: &mut SplineWorkspace,
) -> Result<(), EmdError> {
    let k = x.len() - 1;
    let m = k - 1;
    let SplineWorkspace {
        c,
        diag,
        sup,
        sub,
        g,
    } = workspace;
    c.clear();
    c.resize(k + 1, 0.0);
    diag.clear();
    diag.resize(m, 0.0);
    sup.clear();
    sup.resize(m - 1, 0.0);
    sub.clear();
    sub.resize(m - 1, 0.0);
    g.clear();
    g.resize(m, 0.0);

    let h0 = x[1] - x[0];
    let h1 = x[2] - x[1];
    let hk1 = x[k] - x[k - 1];
    let hk2 = x[k - 1] - x[k - 2];

    diag[0] = h0 + 2.0 * h1;
    sup[0] = h1 - h0;
    g[0] = 3.0 / (h0 + h1) * ((y[2] - y[1]) - (h1 / h0) * (y[1] - y[0]));
    for i in 2..=k - 2 {
        let hi = x[i + 1] - x[i];
        let him1 = x[i] - x[i - 1];
        sub[i - 2] = him1;
        diag[i - 1] = 2.0 * (him1 + hi);
        sup[i - 1] = hi;
        g[i - 1] = 3.0 * ((y[i + 1] - y[i]) / hi - (y[i] - y[i - 1]) / him1);
    }
    sub[k - 3] = hk2 - hk1;
    diag[k - 2] = 2.0 * hk2 + hk1;
    g[k - 2] = 3.0 / (hk1 + hk2) * ((hk2 / hk1) * (y[k] - y[k - 1]) - (y[k - 1] - y[k - 2]));

    solve_tridiagonal(diag, sup, sub, g, &mut c[1..k])?;

    c[0] = c[1] + (h0 / h1) * (c[1] - c[2]);
    c[k] = c[k - 1] + (hk1 / hk2) * (c[k - 1] - c[k - 2]);
    Ok(())
}

/// Thomas algorithm for a tridiagonal system; `sup` and `g` are overwritten.
///
/// `sub[i]` is the coefficient of row `i + 1`, column `i`.
fn solve_tridiagonal(
    diag: &[f64],
    sup: &mut [f64],
    sub: &[f64],
    g: &mut [f64],
    solution: &mut [f64],
) -> Result<(), EmdError> {
    let m = diag.len();
    debug_assert_eq!(solution.len(), m);

    let pivot = diag[0];
    if pivot == 0.0 || !pivot.is_finite() {
        return Err(EmdError::SplineSolveFailed { row: 0 });
    }
    if m > 1 {
        sup[0] /= pivot;
    }
    g[0] /= pivot;
    for i in 1..m {
        let pivot = diag[i] - sub[i - 1] * sup[i - 1];
        if pivot == 0.0 || !pivot.is_finite() {
            return Err(EmdError::SplineSolveFailed { row: i });
        }
        if i < m - 1 {
            sup[i] /= pivot;
        }
        g[i] = (g[i] - sub[i - 1] * g[i - 1]) / pivot;
    }

    solution[m - 1] = g[m - 1];
    for i in (0..m - 1).rev() {
        solution[i] = g[i] - sup[i] * solution[i + 1];
    }
    Ok(())
}
