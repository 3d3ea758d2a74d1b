use super::*;
use rand::Rng;
use serde::Serialize;

/// A single die face in 1..=6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Die(u8);

impl Die {
    /// Uniform draw over the faces.
    pub fn sample<R>(rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        Self(rng.random_range(1..=FACES))
    }
    pub fn face(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Die {
    type Error = u8;
    fn try_from(face: u8) -> Result<Self, Self::Error> {
        match face {
            1..=FACES => Ok(Self(face)),
            other => Err(other),
        }
    }
}

impl std::fmt::Display for Die {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let pips = ['⚀', '⚁', '⚂', '⚃', '⚄', '⚅'];
        write!(f, "{}", pips[self.0 as usize - 1])
    }
}

/// Outcome of throwing both dice once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Roll(Die, Die);

impl Roll {
    pub fn sample<R>(rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        Self(Die::sample(rng), Die::sample(rng))
    }
    pub fn dice(&self) -> (Die, Die) {
        (self.0, self.1)
    }
    pub fn total(&self) -> Score {
        self.0.face() as Score + self.1.face() as Score
    }
    pub fn is_double(&self) -> bool {
        self.0 == self.1
    }
    /// Both dice show a single pip.
    pub fn is_snake_eyes(&self) -> bool {
        self.0.face() == 1 && self.1.face() == 1
    }
}

impl TryFrom<(u8, u8)> for Roll {
    type Error = u8;
    fn try_from((a, b): (u8, u8)) -> Result<Self, Self::Error> {
        Ok(Self(Die::try_from(a)?, Die::try_from(b)?))
    }
}

impl std::fmt::Display for Roll {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} ({}-{})", self.0, self.1, self.0.face(), self.1.face())
    }
}
