//! Reply variant selection

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of variant indices for reply selection
pub trait IndexPicker: Send + Sync {
    /// Pick an index in `0..len`. Callers never pass `len == 0`.
    fn pick(&self, len: usize) -> usize;
}

impl<T: IndexPicker + ?Sized> IndexPicker for Arc<T> {
    fn pick(&self, len: usize) -> usize {
        (**self).pick(len)
    }
}

/// Uniform selection from the thread-local RNG
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomPicker;

impl IndexPicker for RandomPicker {
    fn pick(&self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }
}

/// Uniform selection from a seeded RNG, reproducible across runs
#[derive(Debug)]
pub struct SeededPicker {
    rng: Mutex<StdRng>,
}

impl SeededPicker {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl IndexPicker for SeededPicker {
    fn pick(&self, len: usize) -> usize {
        match self.rng.lock() {
            Ok(mut rng) => rng.gen_range(0..len),
            Err(poisoned) => poisoned.into_inner().gen_range(0..len),
        }
    }
}

/// Replays a fixed sequence of indices, wrapping around
///
/// Each value is reduced modulo the variant count, so `usize::MAX` style
/// values are safe. Counts every draw so callers can assert whether the
/// random branch was entered at all.
#[derive(Debug, Default)]
pub struct SequencePicker {
    sequence: Vec<usize>,
    cursor: AtomicUsize,
}

impl SequencePicker {
    #[must_use]
    pub fn new(sequence: impl Into<Vec<usize>>) -> Self {
        Self {
            sequence: sequence.into(),
            cursor: AtomicUsize::new(0),
        }
    }

    /// Number of indices handed out so far
    #[must_use]
    pub fn draws(&self) -> usize {
        self.cursor.load(Ordering::SeqCst)
    }
}

impl IndexPicker for SequencePicker {
    fn pick(&self, len: usize) -> usize {
        let n = self.cursor.fetch_add(1, Ordering::SeqCst);
        if self.sequence.is_empty() {
            return 0;
        }
        self.sequence[n % self.sequence.len()] % len
    }
}
