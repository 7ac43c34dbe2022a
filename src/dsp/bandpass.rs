//! Butterworth band-limiting with zero-phase application.

use std::f64::consts::{PI, SQRT_2};

use ndarray::Array1;

use crate::error::Error;

/// 4th-order Butterworth bandpass as a single length-5 transfer function
/// (numerator `b`, denominator `a`, normalized so `a[0] = 1`).
#[derive(Debug, Clone)]
pub struct Butterworth {
    b: [f64; 5],
    a: [f64; 5],
}

impl Butterworth {
    /// Canonical coefficients for 30 fps sampling and the 0.7-3.5 Hz
    /// heart-rate band (42-210 BPM). Valid only at 30 fps; any other
    /// sample rate needs [`Butterworth::design`].
    pub fn fps30() -> Self {
        Self {
            b: [0.06004382, 0.0, -0.12008764, 0.0, 0.06004382],
            a: [1.0, -3.02200416, 3.55111471, -1.95868597, 0.43749735],
        }
    }

    /// Design coefficients for the given band at an arbitrary sample rate.
    ///
    /// Second-order analog Butterworth prototype, lowpass-to-bandpass
    /// transform, bilinear transform. Requires
    /// `0 < low_hz < high_hz < fs / 2`.
    pub fn design(low_hz: f64, high_hz: f64, fs: f64) -> Result<Self, Error> {
        if !(fs > 0.0 && low_hz > 0.0 && low_hz < high_hz && high_hz < fs / 2.0) {
            return Err(Error::FilterDesign {
                low_hz,
                high_hz,
                fs,
            });
        }

        // Pre-warp the band edges so the bilinear transform lands them
        // exactly on the requested digital frequencies.
        let w1 = 2.0 * fs * (PI * low_hz / fs).tan();
        let w2 = 2.0 * fs * (PI * high_hz / fs).tan();
        let bw = w2 - w1;
        let w0_sq = w1 * w2;

        // Lowpass-to-bandpass of the order-2 prototype 1/(s^2 + sqrt2 s + 1),
        // coefficients in descending powers of s.
        let num = [bw * bw, 0.0, 0.0];
        let den = [
            1.0,
            SQRT_2 * bw,
            2.0 * w0_sq + bw * bw,
            SQRT_2 * bw * w0_sq,
            w0_sq * w0_sq,
        ];

        let bz = bilinear(&num, fs);
        let az = bilinear(&den, fs);

        let a0 = az[0];
        let mut b = [0.0; 5];
        let mut a = [0.0; 5];
        for i in 0..5 {
            b[i] = bz[i] / a0;
            a[i] = az[i] / a0;
        }
        Ok(Self { b, a })
    }

    /// `(b, a)` transfer-function coefficients.
    pub fn coefficients(&self) -> (&[f64; 5], &[f64; 5]) {
        (&self.b, &self.a)
    }

    /// Apply the filter forward, then backward over the result, cancelling
    /// the phase delay of each pass.
    ///
    /// At the trace boundaries, taps that would fall outside the trace are
    /// omitted (no zero padding), leaving a start-up transient with
    /// untouched initial conditions. The recursion runs in f64; the
    /// feedback section is too sensitive for f32 accumulation.
    pub fn filtfilt(&self, signal: &Array1<f32>) -> Array1<f32> {
        let n = signal.len();
        let (b, a) = (&self.b, &self.a);

        let mut forward = vec![0.0f64; n];
        for i in 0..n {
            let mut acc = b[0] * signal[i] as f64;
            for t in 1..5 {
                if i >= t {
                    acc += b[t] * signal[i - t] as f64 - a[t] * forward[i - t];
                }
            }
            forward[i] = acc;
        }

        let mut out = vec![0.0f64; n];
        for i in (0..n).rev() {
            let mut acc = b[0] * forward[i];
            for t in 1..5 {
                if i + t < n {
                    acc += b[t] * forward[i + t] - a[t] * out[i + t];
                }
            }
            out[i] = acc;
        }

        out.into_iter().map(|x| x as f32).collect()
    }
}

/// Substitute `s = 2 fs (z - 1) / (z + 1)` into a degree <= 4 analog
/// polynomial (descending powers of s) and multiply through by
/// `(z + 1)^4`, yielding a degree-4 polynomial in z (descending powers).
fn bilinear(analog: &[f64], fs: f64) -> [f64; 5] {
    let c = 2.0 * fs;
    let degree = analog.len() - 1;
    let mut acc = [0.0f64; 5];
    for (idx, &coef) in analog.iter().enumerate() {
        let power = degree - idx;
        let mut term = vec![coef * c.powi(power as i32)];
        for _ in 0..power {
            term = poly_mul(&term, &[1.0, -1.0]); // (z - 1)
        }
        for _ in 0..4 - power {
            term = poly_mul(&term, &[1.0, 1.0]); // (z + 1)
        }
        for (slot, value) in acc.iter_mut().zip(term) {
            *slot += value;
        }
    }
    acc
}

fn poly_mul(p: &[f64], q: &[f64]) -> Vec<f64> {
    let mut out = vec![0.0; p.len() + q.len() - 1];
    for (i, &x) in p.iter().enumerate() {
        for (j, &y) in q.iter().enumerate() {
            out[i + j] += x * y;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f32::consts::PI as PI32;

    fn sine(freq: f32, fs: f32, n: usize) -> Array1<f32> {
        (0..n)
            .map(|i| (2.0 * PI32 * freq * i as f32 / fs).sin())
            .collect()
    }

    fn rms(samples: &[f32]) -> f32 {
        (samples.iter().map(|x| x * x).sum::<f32>() / samples.len() as f32).sqrt()
    }

    #[test]
    fn design_reproduces_the_30fps_literals() {
        let designed = Butterworth::design(0.7, 3.5, 30.0).unwrap();
        let canonical = Butterworth::fps30();
        for i in 0..5 {
            assert_abs_diff_eq!(designed.b[i], canonical.b[i], epsilon = 1e-5);
            assert_abs_diff_eq!(designed.a[i], canonical.a[i], epsilon = 1e-5);
        }
    }

    #[test]
    fn design_rejects_impossible_bands() {
        assert!(Butterworth::design(0.7, 3.5, 6.0).is_err()); // 3.5 >= Nyquist
        assert!(Butterworth::design(3.5, 0.7, 30.0).is_err());
        assert!(Butterworth::design(0.0, 3.5, 30.0).is_err());
        assert!(Butterworth::design(0.7, 3.5, 0.0).is_err());
    }

    #[test]
    fn passband_tone_survives() {
        let filter = Butterworth::fps30();
        let input = sine(1.2, 30.0, 300);
        let output = filter.filtfilt(&input);
        // Compare away from the edge transients
        let ratio = rms(&output.as_slice().unwrap()[60..240])
            / rms(&input.as_slice().unwrap()[60..240]);
        assert!(ratio > 0.8, "passband ratio {ratio}");
    }

    #[test]
    fn stopband_tone_is_suppressed() {
        let filter = Butterworth::fps30();
        let input = sine(5.0, 30.0, 300);
        let output = filter.filtfilt(&input);
        let ratio = rms(&output.as_slice().unwrap()[60..240])
            / rms(&input.as_slice().unwrap()[60..240]);
        assert!(ratio < 0.2, "stopband ratio {ratio}");
    }

    #[test]
    fn dc_is_rejected() {
        let filter = Butterworth::fps30();
        let input = Array1::from(vec![7.5f32; 300]);
        let output = filter.filtfilt(&input);
        let mid = rms(&output.as_slice().unwrap()[60..240]);
        assert!(mid < 0.05, "DC leak {mid}");
    }

    #[test]
    fn empty_and_short_traces_pass_through() {
        let filter = Butterworth::fps30();
        assert_eq!(filter.filtfilt(&Array1::from(Vec::<f32>::new())).len(), 0);
        assert_eq!(filter.filtfilt(&Array1::from(vec![1.0, 2.0])).len(), 2);
    }

    #[test]
    fn designed_filter_works_at_other_rates() {
        // Same band at 60 fps: a 1.2 Hz tone still passes, 10 Hz does not.
        let filter = Butterworth::design(0.7, 3.5, 60.0).unwrap();
        let pass = filter.filtfilt(&sine(1.2, 60.0, 600));
        let stop = filter.filtfilt(&sine(10.0, 60.0, 600));
        let pass_rms = rms(&pass.as_slice().unwrap()[120..480]);
        let stop_rms = rms(&stop.as_slice().unwrap()[120..480]);
        assert!(pass_rms > 5.0 * stop_rms);
    }
}
