use std::collections::BTreeMap;

use super::SignalSource;

/// A named, possibly multi-channel, uniformly sampled signal.
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    pub name: String,
    /// Sampling rate in Hz. `None` when the producer did not record one.
    pub fs: Option<f64>,
    /// One vector per channel; all channels have the same length.
    pub channels: Vec<Vec<f64>>,
}

impl Signal {
    pub fn new(name: impl Into<String>, fs: Option<f64>, channels: Vec<Vec<f64>>) -> Self {
        Self {
            name: name.into(),
            fs,
            channels,
        }
    }

    /// Number of samples per channel.
    pub fn len(&self) -> usize {
        self.channels.first().map(Vec::len).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Mean across channels, one value per sample.
    pub fn channel_mean(&self) -> Vec<f64> {
        let n = self.len();
        let c = self.channels.len();
        if c == 0 {
            return Vec::new();
        }
        let mut out = vec![0.0; n];
        for ch in &self.channels {
            for (acc, v) in out.iter_mut().zip(ch) {
                *acc += v;
            }
        }
        for v in &mut out {
            *v /= c as f64;
        }
        out
    }
}

/// A set of signals sharing one time base.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Recording {
    pub name: String,
    signals: BTreeMap<String, Signal>,
}

impl Recording {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            signals: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, signal: Signal) {
        self.signals.insert(signal.name.clone(), signal);
    }

    pub fn with_signal(mut self, signal: Signal) -> Self {
        self.insert(signal);
        self
    }

    pub fn signal(&self, name: &str) -> Option<&Signal> {
        self.signals.get(name)
    }

    pub fn signal_names(&self) -> impl Iterator<Item = &str> {
        self.signals.keys().map(String::as_str)
    }
}

impl SignalSource for Recording {
    fn sample_rate(&self, signal: &str) -> Option<f64> {
        self.signal(signal).and_then(|s| s.fs)
    }

    fn extent(&self, signal: &str) -> Option<f64> {
        let s = self.signal(signal)?;
        let fs = s.fs?;
        if fs > 0.0 { Some(s.len() as f64 / fs) } else { None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extent_is_length_over_rate() {
        let rec = Recording::new("r")
            .with_signal(Signal::new("resp", Some(100.0), vec![vec![0.0; 250]]))
            .with_signal(Signal::new("pred", None, vec![vec![0.0; 250]]));

        assert_eq!(rec.extent("resp"), Some(2.5));
        assert_eq!(rec.sample_rate("resp"), Some(100.0));
        assert_eq!(rec.extent("pred"), None);
        assert_eq!(rec.sample_rate("missing"), None);
    }

    #[test]
    fn channel_mean_averages_channels() {
        let sig = Signal::new("stim", Some(1.0), vec![vec![1.0, 2.0], vec![3.0, 6.0]]);
        assert_eq!(sig.channel_mean(), vec![2.0, 4.0]);
        assert_eq!(sig.channel_count(), 2);
    }
}
