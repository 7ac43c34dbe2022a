//! Power spectrum and band-restricted peak search.

use ndarray::Array1;
use num_complex::Complex32;
use rustfft::FftPlanner;

/// Strongest spectral component inside a frequency band.
#[derive(Debug, Clone, Copy)]
pub struct BandPeak {
    /// Peak frequency in Hz.
    pub freq_hz: f32,
    /// Ratio of peak power to the summed power of every other in-band
    /// bin, in dB.
    pub snr_db: f32,
}

/// Locate the strongest bin whose frequency lies in `[min_hz, max_hz]`.
///
/// Only the non-negative half of the spectrum is considered: bin `k` in
/// `0..=n/2` sits at `k * fs / n` Hz. Returns `None` when no bin falls
/// inside the band, which happens for very short traces.
pub fn band_peak(signal: &Array1<f32>, fs: f32, min_hz: f32, max_hz: f32) -> Option<BandPeak> {
    let n = signal.len();
    if n == 0 {
        return None;
    }

    let mut buffer: Vec<Complex32> = signal.iter().map(|&s| Complex32::new(s, 0.0)).collect();
    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(n);
    fft.process(&mut buffer);

    let bin_hz = fs / n as f32;
    let in_band = |k: usize| {
        let freq = k as f32 * bin_hz;
        freq >= min_hz && freq <= max_hz
    };

    let mut peak: Option<(usize, f32)> = None;
    for k in (0..=n / 2).filter(|&k| in_band(k)) {
        let power = buffer[k].norm_sqr();
        if peak.map_or(true, |(_, best)| power > best) {
            peak = Some((k, power));
        }
    }
    let (peak_bin, peak_power) = peak?;

    let noise_power: f32 = (0..=n / 2)
        .filter(|&k| k != peak_bin && in_band(k))
        .map(|k| buffer[k].norm_sqr())
        .sum();

    // The epsilon keeps the ratio finite when the peak is the only in-band bin.
    let snr_db = 10.0 * (peak_power / (noise_power + 1e-8)).log10();

    Some(BandPeak {
        freq_hz: peak_bin as f32 * bin_hz,
        snr_db,
    })
}
