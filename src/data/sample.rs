//! Synthetic recordings for browsing without a real dataset.
//!
//! The generator produces the three signals the plot modes draw:
//! `stim` (multi-channel, non-negative), `pred` (a smoothed, tuned projection of
//! the stimulus) and `resp` (`pred` plus noise). It is deterministic per seed.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;
use tracing::info;

use super::recording::{Recording, Signal};
use crate::error::AppError;

/// Time constant (seconds) of the stimulus envelope.
const STIM_TAU: f64 = 0.05;
/// Time constant (seconds) of the temporal filter producing `pred`.
const PRED_TAU: f64 = 0.03;
/// Standard deviation of the response noise, in `pred` units.
const RESP_NOISE: f64 = 0.3;

#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticSpec {
    /// Recording length in seconds.
    pub seconds: f64,
    /// Sampling rate in Hz (shared by all signals).
    pub fs: f64,
    /// Number of stimulus channels.
    pub channels: usize,
    pub seed: u64,
}

impl Default for SyntheticSpec {
    fn default() -> Self {
        Self {
            seconds: 60.0,
            fs: 100.0,
            channels: 18,
            seed: 42,
        }
    }
}

pub fn generate_recording(spec: &SyntheticSpec) -> Result<Recording, AppError> {
    if !(spec.seconds.is_finite() && spec.seconds > 0.0) {
        return Err(AppError::new(2, "Recording length must be a positive number of seconds."));
    }
    if !(spec.fs.is_finite() && spec.fs > 0.0) {
        return Err(AppError::new(2, "Sampling rate must be a positive number of Hz."));
    }
    if spec.channels == 0 {
        return Err(AppError::new(2, "Stimulus channel count must be > 0."));
    }
    let n = (spec.seconds * spec.fs).round() as usize;
    if n == 0 {
        return Err(AppError::new(2, "Recording is shorter than one sample."));
    }

    let mut rng = StdRng::seed_from_u64(spec.seed);
    let normal = Normal::new(0.0, 1.0)
        .map_err(|e| AppError::new(4, format!("Noise distribution error: {e}")))?;

    // Stimulus: rectified AR(1) noise per channel.
    let a = (-1.0 / (STIM_TAU * spec.fs)).exp();
    let innovation = (1.0 - a * a).sqrt();
    let mut stim = Vec::with_capacity(spec.channels);
    for _ in 0..spec.channels {
        let mut x = 0.0;
        let mut ch = Vec::with_capacity(n);
        for _ in 0..n {
            x = a * x + innovation * normal.sample(&mut rng);
            ch.push(x.max(0.0));
        }
        stim.push(ch);
    }

    // Gaussian spectral tuning centred on a random channel.
    let centre = rng.gen_range(0.0..spec.channels as f64);
    let width = (spec.channels as f64 / 6.0).max(0.5);
    let weights: Vec<f64> = (0..spec.channels)
        .map(|c| (-0.5 * ((c as f64 - centre) / width).powi(2)).exp())
        .collect();
    let weight_sum: f64 = weights.iter().sum::<f64>().max(1e-12);

    let b = (-1.0 / (PRED_TAU * spec.fs)).exp();
    let mut filtered = 0.0;
    let mut pred = Vec::with_capacity(n);
    let mut resp = Vec::with_capacity(n);
    for t in 0..n {
        let drive = weights
            .iter()
            .zip(&stim)
            .map(|(w, ch)| w * ch[t])
            .sum::<f64>()
            / weight_sum;
        filtered = b * filtered + (1.0 - b) * drive;
        let p = 0.1 + 2.0 * filtered;
        pred.push(p);
        resp.push((p + RESP_NOISE * normal.sample(&mut rng)).max(0.0));
    }

    info!(
        samples = n,
        fs = spec.fs,
        channels = spec.channels,
        seed = spec.seed,
        "generated synthetic recording"
    );

    Ok(Recording::new(format!("synthetic_seed{}", spec.seed))
        .with_signal(Signal::new("stim", Some(spec.fs), stim))
        .with_signal(Signal::new("pred", Some(spec.fs), vec![pred]))
        .with_signal(Signal::new("resp", Some(spec.fs), vec![resp])))
}
