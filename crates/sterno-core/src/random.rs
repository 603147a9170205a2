//! Bounded random value generation backed by the OS entropy source.
//!
//! Draws are reduced into `[min, max)` with a plain modulo. When `max - min`
//! does not divide 2^64 the low residues are slightly more likely than the
//! high ones; the skew is at most `(max - min) / 2^64` per value, which is
//! irrelevant for synthetic metrics but means the output is not uniform in
//! the cryptographic sense.

use rand::rngs::OsRng;
use rand::RngCore;

use crate::error::{Result, SternoError};

/// Source of raw 64-bit random words.
pub trait RandomSource: Send + Sync {
    fn next_u64(&self) -> Result<u64>;
}

/// Operating-system CSPRNG (`getrandom`).
#[derive(Debug, Default, Clone, Copy)]
pub struct OsEntropy;

impl RandomSource for OsEntropy {
    fn next_u64(&self) -> Result<u64> {
        let mut buf = [0u8; 8];
        OsRng
            .try_fill_bytes(&mut buf)
            .map_err(|e| SternoError::EntropyUnavailable(e.to_string()))?;
        Ok(u64::from_le_bytes(buf))
    }
}

/// Produces integers in a half-open range from a [`RandomSource`].
#[derive(Debug, Default, Clone)]
pub struct RandomValueGenerator<S = OsEntropy> {
    source: S,
}

impl RandomValueGenerator<OsEntropy> {
    pub fn new() -> Self {
        Self { source: OsEntropy }
    }
}

impl<S: RandomSource> RandomValueGenerator<S> {
    pub fn with_source(source: S) -> Self {
        Self { source }
    }

    /// Return a value in `[min, max)`.
    ///
    /// Fails with `InvalidRange` when `max <= min` and with
    /// `EntropyUnavailable` when the source cannot supply bytes.
    pub fn next(&self, min: u64, max: u64) -> Result<u64> {
        if max <= min {
            return Err(SternoError::InvalidRange { min, max });
        }
        let word = self.source.next_u64()?;
        Ok(min + word % (max - min))
    }
}

impl<S: RandomSource + ?Sized> RandomSource for std::sync::Arc<S> {
    fn next_u64(&self) -> Result<u64> {
        (**self).next_u64()
    }
}
