use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Uniform random numbers in `[0, 1)` for jitter and random glyph choice.
pub trait UniformSource {
    fn next_unit(&mut self) -> f64;

    /// Uniform value in `[-1, 1)`.
    fn symmetric(&mut self) -> f64 {
        (self.next_unit() - 0.5) * 2.0
    }

    /// Uniform index in `[0, len)`. `len` must be non-zero.
    fn index(&mut self, len: usize) -> usize {
        let index = (self.next_unit() * len as f64).floor() as usize;
        index.min(len - 1)
    }
}

/// `rand`-backed source, seeded from entropy or from a fixed seed.
pub struct RandomSource {
    rng: StdRng,
}

impl RandomSource {
    pub fn from_entropy() -> Self {
        Self { rng: StdRng::from_entropy() }
    }

    pub fn seeded(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }

    pub fn from_seed_option(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_entropy, Self::seeded)
    }
}

impl UniformSource for RandomSource {
    fn next_unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Replays a fixed list of values, wrapping around at the end.
#[derive(Clone, Debug)]
pub struct SequenceSource {
    values: Vec<f64>,
    cursor: usize,
}

impl SequenceSource {
    pub fn new(values: impl Into<Vec<f64>>) -> Self {
        let mut values = values.into();
        if values.is_empty() {
            values.push(0.5);
        }
        Self { values, cursor: 0 }
    }

    /// Always yields the midpoint, which maps to zero jitter.
    pub fn centered() -> Self {
        Self::new(vec![0.5])
    }

    /// Number of values consumed so far.
    pub fn draws(&self) -> usize {
        self.cursor
    }
}

impl UniformSource for SequenceSource {
    fn next_unit(&mut self) -> f64 {
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value.clamp(0.0, 1.0)
    }
}
