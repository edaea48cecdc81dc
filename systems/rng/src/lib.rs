#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Bit-exact reproductions of the two historical generators that drive monsters.
//!
//! [`ClassicRng`] is the 32-bit linear congruential generator behind the
//! classic rule set; scalar draws come from bits 16..31 of the state.
//! [`AlternateRng`] is the 31-bit generator behind the alternate rule set; it
//! is consumed through small permutations that slice one advanced state into
//! several draws. Both wrap modulo their state width and never saturate.

/// 32-bit generator used by the classic monster rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClassicRng {
    state: u32,
}

impl ClassicRng {
    /// Multiplier of the state recurrence.
    pub const MULTIPLIER: u32 = 214_013;
    /// Increment of the state recurrence.
    pub const INCREMENT: u32 = 2_531_011;

    /// Creates a generator whose state is `seed`.
    #[must_use]
    pub const fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Current raw state.
    #[must_use]
    pub const fn state(&self) -> u32 {
        self.state
    }

    /// Advances once and returns the new raw state.
    pub fn advance(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT);
        self.state
    }

    /// Advances once and returns a value in `0..bound`.
    pub fn draw(&mut self, bound: u32) -> u32 {
        debug_assert!(bound > 0, "draw requires a non-empty range");
        ((self.advance() >> 16) & 0x7FFF) % bound
    }
}

/// 31-bit generator used by the alternate monster rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AlternateRng {
    state: u32,
}

impl AlternateRng {
    /// Multiplier of the state recurrence.
    pub const MULTIPLIER: u32 = 1_103_515_245;
    /// Increment of the state recurrence.
    pub const INCREMENT: u32 = 12_345;
    /// Mask keeping the state within 31 bits.
    pub const MASK: u32 = 0x7FFF_FFFF;

    /// Creates a generator whose state is `seed` truncated to 31 bits.
    ///
    /// The top bit never influences later states, so truncating up front
    /// yields the same sequence as carrying it.
    #[must_use]
    pub const fn new(seed: u32) -> Self {
        Self {
            state: seed & Self::MASK,
        }
    }

    /// Current raw state.
    #[must_use]
    pub const fn state(&self) -> u32 {
        self.state
    }

    /// Advances once and returns the new raw state.
    pub fn advance(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
            & Self::MASK;
        self.state
    }

    /// Advances `steps` times in constant time.
    pub fn advance_by(&mut self, steps: u64) -> u32 {
        self.state = Jump::new(steps).apply(self.state);
        self.state
    }

    /// Shuffles three items using one advance (draws over 2 and 3 values).
    pub fn permute3<T>(&mut self, items: &mut [T; 3]) {
        let value = self.advance();
        items.swap(first_slice(value), 1);
        items.swap(second_slice(value), 2);
    }

    /// Shuffles four items using one advance (draws over 2, 3 and 4 values).
    pub fn permute4<T>(&mut self, items: &mut [T; 4]) {
        let value = self.advance();
        items.swap(first_slice(value), 1);
        items.swap(second_slice(value), 2);
        items.swap(third_slice(value), 3);
    }
}

// Bit 30: a draw over {0, 1}.
fn first_slice(value: u32) -> usize {
    (value >> 30) as usize
}

// Low 28 bits scaled onto {0, 1, 2}; exact in integers since 3 * 2^28 < 2^32.
fn second_slice(value: u32) -> usize {
    ((3 * (value & 0x0FFF_FFFF)) >> 28) as usize
}

// Bits 28..29: a draw over {0, 1, 2, 3}.
fn third_slice(value: u32) -> usize {
    ((value >> 28) & 3) as usize
}

/// Affine map equivalent to a fixed number of [`AlternateRng`] advances.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Jump {
    multiplier: u32,
    increment: u32,
}

impl Jump {
    /// Map that leaves the state unchanged.
    pub const IDENTITY: Self = Self {
        multiplier: 1,
        increment: 0,
    };

    /// Map for a single ordinary advance.
    pub const SINGLE: Self = Self {
        multiplier: AlternateRng::MULTIPLIER,
        increment: AlternateRng::INCREMENT,
    };

    /// Computes the map for `steps` advances by repeated squaring.
    #[must_use]
    pub fn new(steps: u64) -> Self {
        let mut result = Self::IDENTITY;
        let mut power = Self::SINGLE;
        let mut remaining = steps;
        while remaining > 0 {
            if remaining & 1 == 1 {
                result = result.then(power);
            }
            power = power.then(power);
            remaining >>= 1;
        }
        result
    }

    /// Map equivalent to applying `self` and then `next`.
    #[must_use]
    pub fn then(self, next: Self) -> Self {
        Self {
            multiplier: next.multiplier.wrapping_mul(self.multiplier) & AlternateRng::MASK,
            increment: next
                .multiplier
                .wrapping_mul(self.increment)
                .wrapping_add(next.increment)
                & AlternateRng::MASK,
        }
    }

    /// Applies the map to a raw state.
    #[must_use]
    pub fn apply(self, state: u32) -> u32 {
        state
            .wrapping_mul(self.multiplier)
            .wrapping_add(self.increment)
            & AlternateRng::MASK
    }

    /// Multiplicative constant of the map.
    #[must_use]
    pub const fn multiplier(&self) -> u32 {
        self.multiplier
    }

    /// Additive constant of the map.
    #[must_use]
    pub const fn increment(&self) -> u32 {
        self.increment
    }
}
