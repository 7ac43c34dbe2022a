//! Detrending of raw brightness traces.
//!
//! Ambient lighting drifts far below the heart-rate band; subtracting a
//! short trailing mean removes it while leaving the pulsatile component
//! intact.

use ndarray::Array1;

/// Subtract the mean of a trailing window ending at each sample.
///
/// The window shrinks near the start of the trace (it covers whatever
/// samples exist), so the output has the same length as the input.
pub fn moving_mean(signal: &Array1<f32>, window: usize) -> Array1<f32> {
    let n = signal.len();
    let window = window.max(1);
    let mut out = Array1::zeros(n);
    let mut acc = 0.0f64;
    for i in 0..n {
        acc += signal[i] as f64;
        if i >= window {
            acc -= signal[i - window] as f64;
        }
        let count = (i + 1).min(window);
        out[i] = signal[i] - (acc / count as f64) as f32;
    }
    out
}

/// Subtract the global mean of the whole trace.
///
/// Coarser than [`moving_mean`] and less robust to drift; adequate for
/// short windows.
pub fn mean_center(signal: &Array1<f32>) -> Array1<f32> {
    let mean = signal.mean().unwrap_or(0.0);
    signal.mapv(|x| x - mean)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::PI;

    #[test]
    fn moving_mean_matches_direct_formula() {
        let signal: Array1<f32> = (0..40).map(|i| (i as f32 * 0.7).sin() * 10.0 + 100.0).collect();
        let window = 8;
        let fast = moving_mean(&signal, window);
        for i in 0..signal.len() {
            let start = i.saturating_sub(window - 1);
            let count = i - start + 1;
            let avg: f32 = (start..=i).map(|j| signal[j]).sum::<f32>() / count as f32;
            assert_relative_eq!(fast[i], signal[i] - avg, epsilon = 1e-4);
        }
    }

    #[test]
    fn moving_mean_removes_slow_drift() {
        let fs = 30.0;
        let n = 300;
        // 0.05 Hz drift under a 1.2 Hz pulse
        let signal: Array1<f32> = (0..n)
            .map(|i| {
                let t = i as f32 / fs;
                120.0 + 20.0 * (2.0 * PI * 0.05 * t).sin() + 3.0 * (2.0 * PI * 1.2 * t).sin()
            })
            .collect();
        let detrended = moving_mean(&signal, fs as usize);
        // After warm-up the residual baseline stays small vs the 20-unit drift
        let tail_mean: f32 =
            detrended.iter().skip(60).sum::<f32>() / (n - 60) as f32;
        assert!(tail_mean.abs() < 1.0, "residual baseline {tail_mean}");
    }

    #[test]
    fn mean_center_zeroes_the_mean() {
        let signal = Array1::from(vec![1.0, 2.0, 3.0, 4.0, 5.0]);
        let centered = mean_center(&signal);
        assert_relative_eq!(centered.mean().unwrap(), 0.0, epsilon = 1e-6);
        assert_relative_eq!(centered[0], -2.0);
    }

    #[test]
    fn short_traces_are_fine() {
        let one = Array1::from(vec![5.0]);
        assert_relative_eq!(moving_mean(&one, 30)[0], 0.0);
        let empty = Array1::from(Vec::<f32>::new());
        assert_eq!(moving_mean(&empty, 30).len(), 0);
    }
}
