use std::{fmt, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
    seq::SliceRandom,
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::PieceKind;

/// How the next piece is drawn.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Randomizer {
    /// Every draw picks one of the seven kinds with equal probability.
    #[default]
    Uniform,
    /// Pieces are dealt from shuffled bags holding each kind once.
    SevenBag,
}

/// Source of upcoming pieces with a one-piece preview.
///
/// # Example
///
/// ```
/// use dropwise_engine::{PieceQueue, PieceSeed, Randomizer};
///
/// let seed = PieceSeed::from(0x2a_u128);
/// let mut a = PieceQueue::with_seed(seed, Randomizer::SevenBag);
/// let mut b = PieceQueue::with_seed(seed, Randomizer::SevenBag);
///
/// let preview = a.peek_next();
/// assert_eq!(a.pop_next(), preview);
/// assert_eq!(b.pop_next(), preview);
/// ```
#[derive(Debug, Clone)]
pub struct PieceQueue {
    rng: Pcg32,
    randomizer: Randomizer,
    bag: Vec<PieceKind>,
    next: PieceKind,
}

/// Seed for deterministic piece generation.
///
/// A 128-bit seed for the queue's random number generator. Serialized (and
/// displayed) as 32 hexadecimal characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceSeed([u8; 16]);

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid hex seed {input:?}: expected 32 hexadecimal characters")]
pub struct ParsePieceSeedError {
    input: String,
}

impl From<u128> for PieceSeed {
    fn from(value: u128) -> Self {
        Self(value.to_be_bytes())
    }
}

impl From<PieceSeed> for u128 {
    fn from(seed: PieceSeed) -> Self {
        Self::from_be_bytes(seed.0)
    }
}

impl fmt::Display for PieceSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from(*self))
    }
}

impl FromStr for PieceSeed {
    type Err = ParsePieceSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let error = || ParsePieceSeedError {
            input: s.to_owned(),
        };
        if s.len() != 32 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(error());
        }
        let num = u128::from_str_radix(s, 16).map_err(|_| error())?;
        Ok(Self::from(num))
    }
}

impl Serialize for PieceSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PieceSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

/// Allows generating random `PieceSeed` values with `rng.random()`.
impl Distribution<PieceSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        PieceSeed(seed)
    }
}

impl PieceQueue {
    /// Creates a queue with a random seed.
    ///
    /// For deterministic piece generation, use [`Self::with_seed`] instead.
    #[must_use]
    pub fn new(randomizer: Randomizer) -> Self {
        Self::with_seed(rand::rng().random(), randomizer)
    }

    #[must_use]
    pub fn with_seed(seed: PieceSeed, randomizer: Randomizer) -> Self {
        let mut this = Self {
            rng: Pcg32::from_seed(seed.0),
            randomizer,
            bag: Vec::with_capacity(PieceKind::LEN),
            next: PieceKind::I,
        };
        this.next = this.draw();
        this
    }

    #[must_use]
    pub fn randomizer(&self) -> Randomizer {
        self.randomizer
    }

    /// Returns the piece the next [`Self::pop_next`] call will hand out.
    #[must_use]
    pub fn peek_next(&self) -> PieceKind {
        self.next
    }

    /// Takes the previewed piece and draws a new one into the preview.
    pub fn pop_next(&mut self) -> PieceKind {
        let new_next = self.draw();
        std::mem::replace(&mut self.next, new_next)
    }

    fn draw(&mut self) -> PieceKind {
        match self.randomizer {
            Randomizer::Uniform => self.rng.random(),
            Randomizer::SevenBag => loop {
                if let Some(kind) = self.bag.pop() {
                    break kind;
                }
                self.bag.extend(PieceKind::ALL);
                self.bag.shuffle(&mut self.rng);
            },
        }
    }
}
