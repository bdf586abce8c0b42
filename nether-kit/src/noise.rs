//! Pink noise source for dithering
//!
//! Voss-McCartney generator: a bank of octave rows, where row `k` is redrawn
//! every `2^(k+1)` samples, summed with one fresh white value per sample. The sum
//! approximates a 1/f spectrum and stays within -1.0..=1.0.

/// Number of octave rows in the generator
const NUM_OCTAVES: usize = 8;

/// Deterministic pink noise generator
///
/// Two generators built from the same seed produce identical sequences.
/// Not safe to share between call sites; output depends on call order.
#[derive(Debug, Clone)]
pub struct PinkNoise {
    seed: u64,
    state: u64,
    counter: u32,
    octaves: [f64; NUM_OCTAVES],
}

impl PinkNoise {
    pub fn new(seed: u64) -> Self {
        let mut noise = Self {
            seed,
            state: seed,
            counter: 0,
            octaves: [0.0; NUM_OCTAVES],
        };
        noise.fill_octaves();
        noise
    }

    /// Restart the sequence from the original seed
    pub fn reset(&mut self) {
        self.state = self.seed;
        self.counter = 0;
        self.fill_octaves();
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Next noise value in -1.0..=1.0
    pub fn next_value(&mut self) -> f64 {
        self.counter = self.counter.wrapping_add(1);
        let octave = (self.counter.trailing_zeros() as usize).min(NUM_OCTAVES - 1);

        self.octaves[octave] = self.next_white();

        let white = self.next_white();
        let sum: f64 = self.octaves.iter().sum();
        (sum + white) / (NUM_OCTAVES + 1) as f64
    }

    fn fill_octaves(&mut self) {
        self.octaves = std::array::from_fn(|_| self.next_white());
    }

    /// Uniform white noise in -1.0..=1.0 (LCG, Numerical Recipes constants)
    fn next_white(&mut self) -> f64 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.state >> 11) as f64 / (1u64 << 53) as f64 * 2.0 - 1.0
    }
}

impl Iterator for PinkNoise {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        Some(self.next_value())
    }
}
