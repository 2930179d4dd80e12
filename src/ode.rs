//! Adaptive Runge-Kutta integration.
//!
//! Implements the Dormand-Prince 5(4) embedded pair with local error
//! control. The fifth-order solution is propagated and the embedded
//! fourth-order one is only used to estimate the error of each step.

use anyhow::{Result, bail, ensure};

/// Error tolerances of the adaptive integrator.
#[derive(Debug, Clone, Copy)]
pub struct Tolerance {
    /// Relative tolerance.
    pub rel: f64,
    /// Absolute tolerance.
    pub abs: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            rel: 1e-10,
            abs: 1e-10,
        }
    }
}

const MAX_STEPS: usize = 100_000;

const SAFETY: f64 = 0.9;
const MIN_FACTOR: f64 = 0.2;
const MAX_FACTOR: f64 = 5.0;

const C: [f64; 7] = [0.0, 1.0 / 5.0, 3.0 / 10.0, 4.0 / 5.0, 8.0 / 9.0, 1.0, 1.0];

const A: [[f64; 6]; 7] = [
    [0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
    [1.0 / 5.0, 0.0, 0.0, 0.0, 0.0, 0.0],
    [3.0 / 40.0, 9.0 / 40.0, 0.0, 0.0, 0.0, 0.0],
    [44.0 / 45.0, -56.0 / 15.0, 32.0 / 9.0, 0.0, 0.0, 0.0],
    [
        19372.0 / 6561.0,
        -25360.0 / 2187.0,
        64448.0 / 6561.0,
        -212.0 / 729.0,
        0.0,
        0.0,
    ],
    [
        9017.0 / 3168.0,
        -355.0 / 33.0,
        46732.0 / 5247.0,
        49.0 / 176.0,
        -5103.0 / 18656.0,
        0.0,
    ],
    [
        35.0 / 384.0,
        0.0,
        500.0 / 1113.0,
        125.0 / 192.0,
        -2187.0 / 6784.0,
        11.0 / 84.0,
    ],
];

// Fifth-order weights.
const B: [f64; 7] = [
    35.0 / 384.0,
    0.0,
    500.0 / 1113.0,
    125.0 / 192.0,
    -2187.0 / 6784.0,
    11.0 / 84.0,
    0.0,
];

// Difference between the fifth- and fourth-order weights.
const E: [f64; 7] = [
    71.0 / 57600.0,
    0.0,
    -71.0 / 16695.0,
    71.0 / 1920.0,
    -17253.0 / 339200.0,
    22.0 / 525.0,
    -1.0 / 40.0,
];

/// Integrate `dy/dt = f(t, y)` from `t0` to `t1` starting at `y0`.
///
/// Returns the state at `t1`.
///
/// # Errors
/// Returns an error if the state stops being finite, if the step size
/// underflows or if the integration takes too many steps.
pub fn integrate<const D: usize, F>(
    f: F,
    y0: [f64; D],
    t0: f64,
    t1: f64,
    tol: Tolerance,
) -> Result<[f64; D]>
where
    F: Fn(f64, &[f64; D]) -> [f64; D],
{
    ensure!(t1 >= t0, "integration interval is reversed ({t0} > {t1})");
    ensure!(
        y0.iter().all(|y| y.is_finite()),
        "initial state must be finite, but is {y0:?}"
    );

    let span = t1 - t0;
    if span == 0.0 {
        return Ok(y0);
    }
    let h_min = span * 1e-12;

    let mut t = t0;
    let mut y = y0;
    let mut h = span / 16.0;

    for _ in 0..MAX_STEPS {
        let last = h >= t1 - t;
        if last {
            h = t1 - t;
        }

        let (y_new, err) = dopri_step(&f, t, &y, h, tol);
        if !err.is_finite() || y_new.iter().any(|y| !y.is_finite()) {
            bail!("state stopped being finite at t = {t}");
        }

        if err <= 1.0 {
            y = y_new;
            if last {
                return Ok(y);
            }
            t += h;
        }

        let factor = if err == 0.0 {
            MAX_FACTOR
        } else {
            (SAFETY * err.powf(-0.2)).clamp(MIN_FACTOR, MAX_FACTOR)
        };
        h *= factor;
        if h < h_min {
            bail!("step size underflow at t = {t} (h = {h:e})");
        }
    }

    bail!("integration did not finish within {MAX_STEPS} steps")
}

/// Take a single Dormand-Prince step of size `h`.
///
/// Returns the fifth-order solution and the scaled RMS error estimate.
fn dopri_step<const D: usize, F>(
    f: &F,
    t: f64,
    y: &[f64; D],
    h: f64,
    tol: Tolerance,
) -> ([f64; D], f64)
where
    F: Fn(f64, &[f64; D]) -> [f64; D],
{
    let mut k = [[0.0; D]; 7];
    for i_stage in 0..7 {
        let mut y_stage = *y;
        for (j_stage, k_j) in k.iter().enumerate().take(i_stage) {
            let a = A[i_stage][j_stage];
            if a == 0.0 {
                continue;
            }
            for (y_i, k_ji) in y_stage.iter_mut().zip(k_j) {
                *y_i += h * a * k_ji;
            }
        }
        k[i_stage] = f(t + C[i_stage] * h, &y_stage);
    }

    let mut y_new = *y;
    let mut err_sum = 0.0;
    for i in 0..D {
        let mut incr = 0.0;
        let mut err = 0.0;
        for (i_stage, k_i) in k.iter().enumerate() {
            incr += B[i_stage] * k_i[i];
            err += E[i_stage] * k_i[i];
        }
        y_new[i] += h * incr;

        let scale = tol.abs + tol.rel * y[i].abs().max(y_new[i].abs());
        err_sum += (h * err / scale).powi(2);
    }

    let err = if D == 0 {
        0.0
    } else {
        (err_sum / D as f64).sqrt()
    };
    (y_new, err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn exponential_decay() {
        let y = integrate(|_, y: &[f64; 1]| [-y[0]], [1.0], 0.0, 1.0, Tolerance::default())
            .expect("integration failed");
        assert_relative_eq!(y[0], (-1.0f64).exp(), max_relative = 1e-9);
    }

    #[test]
    fn harmonic_oscillator() {
        let f = |_, y: &[f64; 2]| [y[1], -y[0]];
        let y = integrate(f, [0.0, 1.0], 0.0, 2.0, Tolerance::default())
            .expect("integration failed");
        assert_relative_eq!(y[0], 2.0f64.sin(), max_relative = 1e-8);
        assert_relative_eq!(y[1], 2.0f64.cos(), max_relative = 1e-8);
    }

    #[test]
    fn empty_interval_returns_initial_state() {
        let y = integrate(|_, y: &[f64; 1]| [y[0]], [3.0], 0.5, 0.5, Tolerance::default())
            .expect("integration failed");
        assert_eq!(y, [3.0]);
    }

    #[test]
    fn rejects_reversed_interval() {
        let result = integrate(|_, y: &[f64; 1]| [y[0]], [1.0], 1.0, 0.0, Tolerance::default());
        assert!(result.is_err());
    }

    #[test]
    fn rejects_non_finite_state() {
        let result = integrate(
            |_, y: &[f64; 1]| [y[0]],
            [f64::NAN],
            0.0,
            1.0,
            Tolerance::default(),
        );
        assert!(result.is_err());

        let result = integrate(
            |t, _: &[f64; 1]| [(0.5 - t).ln()],
            [1.0],
            0.0,
            1.0,
            Tolerance::default(),
        );
        assert!(result.is_err());
    }
}
