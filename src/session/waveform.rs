//! Simulated waveform sampling for the recording display.
//!
//! While a session is recording, the sampler appends one display magnitude at
//! a fixed cadence and keeps only the most recent entries, producing the
//! scrolling-bars effect on screen. The magnitudes are synthetic: they are
//! drawn from a [`MagnitudeSource`] rather than metered from the audio
//! stream, so the display keeps moving regardless of input level. The source
//! is the seam to replace if real amplitude metering is ever wanted.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::time::{Duration, Instant};

/// Maximum number of magnitudes kept for display.
pub const WAVEFORM_CAPACITY: usize = 30;

/// Interval between consecutive samples.
pub const SAMPLE_INTERVAL: Duration = Duration::from_millis(100);

/// Display range for synthetic magnitudes. Bars render against a fixed
/// maximum, so the range stays well inside it to keep the motion readable.
pub const MIN_MAGNITUDE: u64 = 8;
/// See [`MIN_MAGNITUDE`].
pub const MAX_MAGNITUDE: u64 = 64;

/// Produces display magnitudes for the waveform.
///
/// Implementations must only return values in a fixed positive range.
/// Tests supply deterministic sources.
pub trait MagnitudeSource {
    /// Returns the next magnitude to display.
    fn next_magnitude(&mut self) -> u64;
}

/// Default source: uniformly distributed synthetic magnitudes.
pub struct SyntheticMagnitudes {
    rng: SmallRng,
}

impl SyntheticMagnitudes {
    /// Creates a source seeded from the operating system.
    pub fn new() -> Self {
        Self {
            rng: SmallRng::from_os_rng(),
        }
    }
}

impl Default for SyntheticMagnitudes {
    fn default() -> Self {
        Self::new()
    }
}

impl MagnitudeSource for SyntheticMagnitudes {
    fn next_magnitude(&mut self) -> u64 {
        self.rng.random_range(MIN_MAGNITUDE..=MAX_MAGNITUDE)
    }
}

/// Sliding window of display magnitudes, fed while a session is recording.
///
/// The buffer is non-empty only while recording: the first tick after the
/// session leaves the Recording state clears it.
pub struct WaveformSampler<S: MagnitudeSource> {
    source: S,
    history: Vec<u64>,
    last_sample_at: Option<Instant>,
}

impl<S: MagnitudeSource> WaveformSampler<S> {
    /// Creates an empty sampler over the given magnitude source.
    pub fn new(source: S) -> Self {
        Self {
            source,
            history: Vec::with_capacity(WAVEFORM_CAPACITY),
            last_sample_at: None,
        }
    }

    /// Advances the sampler.
    ///
    /// When `recording` is true, appends one magnitude if at least
    /// [`SAMPLE_INTERVAL`] has passed since the previous sample (the first
    /// tick of a session samples immediately), evicting the oldest entry
    /// beyond [`WAVEFORM_CAPACITY`]. When `recording` is false, clears the
    /// buffer.
    pub fn tick(&mut self, now: Instant, recording: bool) {
        if !recording {
            self.clear();
            return;
        }

        let due = match self.last_sample_at {
            None => true,
            Some(last) => now.duration_since(last) >= SAMPLE_INTERVAL,
        };

        if due {
            self.history.push(self.source.next_magnitude());
            if self.history.len() > WAVEFORM_CAPACITY {
                self.history.remove(0);
            }
            self.last_sample_at = Some(now);
        }
    }

    /// Current magnitudes, oldest first.
    pub fn magnitudes(&self) -> &[u64] {
        &self.history
    }

    /// Empties the buffer and resets the cadence.
    pub fn clear(&mut self) {
        self.history.clear();
        self.last_sample_at = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Deterministic source counting up from 1.
    struct Counting(u64);

    impl MagnitudeSource for Counting {
        fn next_magnitude(&mut self) -> u64 {
            self.0 += 1;
            self.0
        }
    }

    #[test]
    fn samples_on_first_tick_then_at_cadence() {
        let mut sampler = WaveformSampler::new(Counting(0));
        let t0 = Instant::now();

        sampler.tick(t0, true);
        assert_eq!(sampler.magnitudes(), &[1]);

        // 50ms later: not yet due
        sampler.tick(t0 + Duration::from_millis(50), true);
        assert_eq!(sampler.magnitudes(), &[1]);

        // 100ms later: due
        sampler.tick(t0 + Duration::from_millis(100), true);
        assert_eq!(sampler.magnitudes(), &[1, 2]);
    }

    #[test]
    fn capacity_capped_with_oldest_evicted_first() {
        let mut sampler = WaveformSampler::new(Counting(0));
        let t0 = Instant::now();

        for i in 0..40u64 {
            sampler.tick(t0 + SAMPLE_INTERVAL * i as u32, true);
        }

        assert_eq!(sampler.magnitudes().len(), WAVEFORM_CAPACITY);
        // 40 samples drawn, the first 10 evicted
        assert_eq!(sampler.magnitudes()[0], 11);
        assert_eq!(*sampler.magnitudes().last().unwrap(), 40);
    }

    #[test]
    fn clears_when_not_recording() {
        let mut sampler = WaveformSampler::new(Counting(0));
        let t0 = Instant::now();

        sampler.tick(t0, true);
        sampler.tick(t0 + SAMPLE_INTERVAL, true);
        assert!(!sampler.magnitudes().is_empty());

        sampler.tick(t0 + SAMPLE_INTERVAL * 2, false);
        assert!(sampler.magnitudes().is_empty());

        // A fresh session samples immediately again
        sampler.tick(t0 + SAMPLE_INTERVAL * 3, true);
        assert_eq!(sampler.magnitudes().len(), 1);
    }

    #[test]
    fn synthetic_magnitudes_stay_in_range() {
        let mut source = SyntheticMagnitudes::new();
        for _ in 0..1000 {
            let m = source.next_magnitude();
            assert!((MIN_MAGNITUDE..=MAX_MAGNITUDE).contains(&m));
        }
    }
}
