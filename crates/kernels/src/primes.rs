//! Odd-only bit sieve for prime counting and enumeration.

use crate::error::{KernelError, KernelResult};
use crate::utils::try_filled_vec;

/// Packed candidate flags for the odd integers `3, 5, 7, ...`.
///
/// Bit `i` stands for `2i + 3`; a set bit is a prime candidate and a cleared bit
/// is a known composite. Padding bits in the final byte are kept clear so whole
/// bytes can be popcounted.
#[derive(Debug, Clone)]
pub struct BitSieve {
    bytes: Vec<u8>,
    bits: usize,
}

impl BitSieve {
    /// Sieve covering every odd number in `3..=limit`, all bits set.
    pub fn with_limit(limit: u64) -> KernelResult<Self> {
        let bits = usize::try_from(limit.saturating_sub(1) / 2).map_err(|_| {
            KernelError::ResourceExhausted {
                what: "prime sieve",
                requested: limit as u128,
            }
        })?;
        let byte_len = bits.div_ceil(8);
        let mut bytes = try_filled_vec(byte_len, 0xFFu8, "prime sieve")?;
        let tail = bits % 8;
        if tail != 0 {
            if let Some(last) = bytes.last_mut() {
                *last = (1u8 << tail) - 1;
            }
        }
        Ok(Self { bytes, bits })
    }

    pub fn len(&self) -> usize {
        self.bits
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    pub fn byte_len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn get(&self, index: usize) -> bool {
        debug_assert!(index < self.bits);
        self.bytes[index >> 3] & (1 << (index & 7)) != 0
    }

    #[inline]
    pub fn clear(&mut self, index: usize) {
        debug_assert!(index < self.bits);
        self.bytes[index >> 3] &= !(1 << (index & 7));
    }

    /// Clears every odd multiple of each candidate `p` with `p * p <= limit`.
    pub fn sift(&mut self, limit: u64) {
        let mut i = 0usize;
        loop {
            let prime = 2 * i as u64 + 3;
            if prime * prime > limit || i >= self.bits {
                break;
            }
            if self.get(i) {
                let step = prime as usize;
                let mut j = ((prime * prime - 3) / 2) as usize;
                while j < self.bits {
                    self.clear(j);
                    j += step;
                }
            }
            i += 1;
        }
    }

    /// Set bits, tested one by one.
    pub fn count_candidates(&self) -> u64 {
        (0..self.bits).filter(|&i| self.get(i)).count() as u64
    }

    /// Set bits, counted a byte at a time.
    pub fn count_candidates_bytewise(&self) -> u64 {
        self.bytes.iter().map(|b| b.count_ones() as u64).sum()
    }

    /// Odd numbers whose bit is still set, ascending.
    pub fn candidates(&self) -> impl Iterator<Item = u64> + '_ {
        (0..self.bits)
            .filter(|&i| self.get(i))
            .map(|i| 2 * i as u64 + 3)
    }
}

fn sifted(limit: u64) -> KernelResult<BitSieve> {
    let mut sieve = BitSieve::with_limit(limit)?;
    sieve.sift(limit);
    Ok(sieve)
}

/// Number of primes `<= limit`. Limits below 2 (negative included) have none.
pub fn count_primes(limit: i64) -> KernelResult<u64> {
    match limit {
        l if l < 2 => Ok(0),
        2 => Ok(1),
        l => Ok(1 + sifted(l as u64)?.count_candidates()),
    }
}

/// [`count_primes`] using whole-byte popcounts for the final tally.
pub fn count_primes_bytewise(limit: i64) -> KernelResult<u64> {
    match limit {
        l if l < 2 => Ok(0),
        2 => Ok(1),
        l => Ok(1 + sifted(l as u64)?.count_candidates_bytewise()),
    }
}

/// Every prime `<= limit` in ascending order.
pub fn enumerate_primes(limit: i64) -> KernelResult<Vec<u64>> {
    if limit < 2 {
        return Ok(Vec::new());
    }
    let sieve = sifted(limit as u64)?;
    let mut primes = Vec::new();
    primes
        .try_reserve(1 + sieve.count_candidates_bytewise() as usize)
        .map_err(|_| KernelError::ResourceExhausted {
            what: "prime list",
            requested: limit as u128,
        })?;
    primes.push(2);
    primes.extend(sieve.candidates());
    Ok(primes)
}
