//! Per-phase moving-average smoothing

use arraydeque::{ArrayDeque, Wrapping};

use crate::sampling::{SAMPLES_PER_SECOND, SECONDS_TO_SMOOTH, SMOOTH_WINDOW_LEN};

/// Moving average over the last [`SECONDS_TO_SMOOTH`] seconds, kept
/// separately for every sample phase within a second
///
/// The transmitter keys its pulse at the same point of every second, so
/// averaging each sampling phase against the same phase of the preceding
/// seconds sharpens the leading edge while smoothing out one-off sampling
/// errors.
///
/// Each call retires the sample taken [`SECONDS_TO_SMOOTH`] seconds ago at
/// the same phase and admits the new one. Only the retired and admitted
/// samples can change the phase's running sum, so the update is O(1) per
/// sample no matter how long the window is; the window is never rescanned.
#[derive(Clone, Debug)]
pub(crate) struct Smoother {
    // every raw sample currently part of an average, oldest at the front
    window: ArrayDeque<bool, SMOOTH_WINDOW_LEN, Wrapping>,

    // per-phase count of asserted samples in the window, each 0..=SECONDS_TO_SMOOTH
    sums: [u8; SAMPLES_PER_SECOND as usize],

    // phase of the next incoming sample
    phase: u8,
}

impl Smoother {
    pub(crate) fn new() -> Self {
        Self {
            window: ArrayDeque::new(),
            sums: [0; SAMPLES_PER_SECOND as usize],
            phase: 0,
        }
    }

    /// Reset to zero initial conditions
    pub(crate) fn reset(&mut self) {
        self.window.clear();
        self.sums = [0; SAMPLES_PER_SECOND as usize];
        self.phase = 0;
    }

    /// Admit one raw sample and return the smoothed sample for its phase
    ///
    /// Must be called exactly once per sampling tick. The output is the
    /// strict majority of the window at this phase, which favors deasserted
    /// when the window is still filling.
    pub(crate) fn input(&mut self, sample: bool) -> bool {
        let phase = usize::from(self.phase);
        self.phase += 1;
        if u32::from(self.phase) == SAMPLES_PER_SECOND {
            self.phase = 0;
        }

        // The window holds exactly SECONDS_TO_SMOOTH seconds, so the sample
        // displaced by a wrapping push is the one leaving this same phase.
        match (sample, self.window.push_back(sample)) {
            (true, Some(false)) | (true, None) => self.sums[phase] += 1,
            (false, Some(true)) => self.sums[phase] -= 1,
            _ => {}
        }

        u32::from(self.sums[phase]) > SECONDS_TO_SMOOTH / 2
    }
}
