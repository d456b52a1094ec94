//! Integration tests for extrema detection and spline envelopes.

use approx::assert_abs_diff_eq;
use sift_emd::{count_zero_crossings, evaluate_spline, find_extrema};

#[test]
fn reference_extrema() {
    let set = find_extrema(&[2.0, -1.0, 5.0]);
    assert_eq!(set.maxima_x(), &[0.0, 2.0]);
    assert_eq!(set.maxima_y(), &[2.0, 5.0]);
    assert_eq!(set.minima_x(), &[0.0, 1.0, 2.0]);
    assert_eq!(set.minima_y(), &[2.0, -1.0, 5.0]);
    assert!(set.extrema_good());
}

#[test]
fn sine_extrema_alternate() {
    let x: Vec<f64> = (0..200).map(|i| (i as f64 * 0.2).sin()).collect();
    let set = find_extrema(&x);
    assert!(set.extrema_good());
    // period ~31.4 samples: about 6 genuine maxima and 6 minima
    assert!((5..=8).contains(&(set.n_maxima() - 2)));
    assert!((5..=8).contains(&(set.n_minima() - 2)));
    for w in set.maxima_x().windows(2) {
        assert!(w[0] < w[1]);
    }
    let zc = count_zero_crossings(&x);
    assert!((11..=13).contains(&zc), "zero crossings = {zc}");
}

#[test]
fn envelopes_bound_sine() {
    let x: Vec<f64> = (0..101).map(|i| (i as f64 * 0.3).sin()).collect();
    let set = find_extrema(&x);
    let upper = evaluate_spline(set.maxima_x(), set.maxima_y()).unwrap();
    let lower = evaluate_spline(set.minima_x(), set.minima_y()).unwrap();
    assert_eq!(upper.len(), x.len());
    assert_eq!(lower.len(), x.len());
    for i in 10..90 {
        assert!(upper[i] >= x[i] - 0.05, "upper below signal at {i}");
        assert!(lower[i] <= x[i] + 0.05, "lower above signal at {i}");
    }
}

#[test]
fn two_knot_spline_is_line() {
    let out = evaluate_spline(&[0.0, 5.0], &[10.0, 0.0]).unwrap();
    let expected = [10.0, 8.0, 6.0, 4.0, 2.0, 0.0];
    for (v, e) in out.iter().zip(expected) {
        assert_abs_diff_eq!(*v, e, epsilon = 1e-12);
    }
}

#[test]
fn spline_passes_through_knots() {
    let xs = [0.0, 3.0, 4.5, 8.0, 11.0, 15.0];
    let ys = [0.0, 2.0, -1.0, 3.0, 0.5, 1.0];
    let out = evaluate_spline(&xs, &ys).unwrap();
    assert_eq!(out.len(), 16);
    assert_eq!(out[0], 0.0);
    assert_eq!(out[3], 2.0);
    assert_eq!(out[8], 3.0);
    assert_eq!(out[11], 0.5);
    assert_eq!(out[15], 1.0);
}
