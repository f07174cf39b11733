//! # Simplex Noise
//!
//! Coherent 2D noise used for island elevation.
//!
//! ## Reproducibility
//!
//! The lattice is shuffled from a `WorldSeed` with a fixed integer mixer, so
//! one seed gives the same field on every platform. Per-run variety comes
//! from drawing the seed out of the caller's random source.

use rand::Rng;

/// Skew from input space to the simplex lattice: (sqrt(3) - 1) / 2.
const SKEW: f64 = 0.366_025_403_784_438_6;

/// Skew back from the lattice to input space: (3 - sqrt(3)) / 6.
const UNSKEW: f64 = 0.211_324_865_405_187_1;

/// Squared radius of each corner's influence.
const CORNER_RADIUS_SQ: f64 = 0.5;

/// Brings the summed corner contributions into [-1, 1].
const OUTPUT_SCALE: f64 = 70.0;

/// Edge and diagonal directions of the 2D lattice.
const GRADIENTS: [(f64, f64); 12] = [
    (1.0, 1.0),
    (-1.0, 1.0),
    (1.0, -1.0),
    (-1.0, -1.0),
    (1.0, 0.0),
    (-1.0, 0.0),
    (1.0, 0.0),
    (-1.0, 0.0),
    (0.0, 1.0),
    (0.0, -1.0),
    (0.0, 1.0),
    (0.0, -1.0),
];

/// Seed for coherent noise.
///
/// Independent channels (elevation, sample offset, ...) use `derive` so they
/// never share a stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WorldSeed(u64);

impl WorldSeed {
    /// Wraps a raw seed.
    #[inline]
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self(seed)
    }

    /// Draws a seed from the caller's random source.
    #[must_use]
    pub fn from_rng<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self(rng.gen())
    }

    /// The raw value.
    #[inline]
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Sub-seed for one purpose. Equal inputs give equal outputs.
    #[inline]
    #[must_use]
    pub const fn derive(self, purpose: u64) -> Self {
        Self(finalize(self.0 ^ purpose.wrapping_mul(0x9E37_79B9_7F4A_7C15)))
    }
}

impl Default for WorldSeed {
    fn default() -> Self {
        Self(0x15_1E_F0_26_E5_EE_D0_01)
    }
}

/// splitmix64 output function.
const fn finalize(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Fisher-Yates over `0..=255`, driven by splitmix64. Any seed, zero
/// included, yields a full permutation.
fn shuffled_lattice(seed: WorldSeed) -> [u8; 256] {
    let mut lattice = [0u8; 256];
    for (slot, value) in lattice.iter_mut().zip(0..=u8::MAX) {
        *slot = value;
    }

    let mut state = seed.value();
    for i in (1..lattice.len()).rev() {
        state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let bound = i as u64 + 1;
        #[allow(clippy::cast_possible_truncation)]
        let j = (finalize(state) % bound) as usize;
        lattice.swap(i, j);
    }
    lattice
}

/// 2D simplex noise over a seeded lattice.
///
/// Samples are continuous and lie in [-1, 1].
///
/// # Example
///
/// ```rust
/// use isleforge_procedural::noise::{SimplexNoise, WorldSeed};
///
/// let noise = SimplexNoise::new(WorldSeed::new(42));
/// let value = noise.octaved(0.25, -0.1, 3, 0.5, 2.0);
/// assert!((-1.0..=1.0).contains(&value));
/// ```
#[derive(Clone, Debug)]
pub struct SimplexNoise {
    lattice: [u8; 256],
}

impl SimplexNoise {
    /// Builds the lattice for `seed`.
    #[must_use]
    pub fn new(seed: WorldSeed) -> Self {
        Self {
            lattice: shuffled_lattice(seed),
        }
    }

    /// Gradient for lattice point `(i, j)`. Wraps every 256 cells.
    #[inline]
    #[allow(clippy::cast_sign_loss)]
    fn gradient(&self, i: i32, j: i32) -> (f64, f64) {
        let wrap = |v: i32| (v & 0xFF) as usize;
        let row = usize::from(self.lattice[wrap(j)]);
        let hash = usize::from(self.lattice[(wrap(i) + row) & 0xFF]);
        GRADIENTS[hash % GRADIENTS.len()]
    }

    /// One sample at `(x, y)`.
    #[must_use]
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let skew = (x + y) * SKEW;
        let (cell_i, cell_j) = (floor_to_i32(x + skew), floor_to_i32(y + skew));
        let unskew = f64::from(cell_i + cell_j) * UNSKEW;
        let (ox, oy) = (x - (f64::from(cell_i) - unskew), y - (f64::from(cell_j) - unskew));

        // The middle corner depends on which triangle of the cell we are in
        let middle = if ox > oy { (1, 0) } else { (0, 1) };

        let total: f64 = [(0, 0), middle, (1, 1)]
            .into_iter()
            .map(|(ci, cj)| {
                let shift = f64::from(ci + cj) * UNSKEW;
                let dx = ox - f64::from(ci) + shift;
                let dy = oy - f64::from(cj) + shift;
                let weight = CORNER_RADIUS_SQ - dx * dx - dy * dy;
                if weight <= 0.0 {
                    return 0.0;
                }
                let (gx, gy) = self.gradient(cell_i + ci, cell_j + cj);
                weight.powi(4) * (gx * dx + gy * dy)
            })
            .sum();

        OUTPUT_SCALE * total
    }

    /// Fractal sum of `octaves` samples.
    ///
    /// Each octave scales the coordinates by `lacunarity` and the amplitude
    /// by `persistence`. The sum is divided by the total amplitude, so for a
    /// positive `persistence` the result stays in [-1, 1]. Zero octaves
    /// yield 0.
    #[must_use]
    pub fn octaved(&self, x: f64, y: f64, octaves: u32, persistence: f64, lacunarity: f64) -> f64 {
        let mut total = 0.0;
        let mut weight = 0.0;
        let (mut amplitude, mut scale) = (1.0, 1.0);

        for _ in 0..octaves {
            total += amplitude * self.sample(x * scale, y * scale);
            weight += amplitude;
            amplitude *= persistence;
            scale *= lacunarity;
        }

        if weight > 0.0 {
            total / weight
        } else {
            0.0
        }
    }
}

#[inline]
#[allow(clippy::cast_possible_truncation)]
fn floor_to_i32(v: f64) -> i32 {
    v.floor() as i32
}
