//! The single round-to-nearest-even primitive shared by every encoder
//! (spec.md §4.3, §4.5, §4.7, §4.8, and Design Notes "shared rounding logic
//! duplicated in three places").

/// The three bits a right-shift-by-`k` needs to decide whether to round up,
/// plus the about-to-be-discarded low bit of the *kept* result (the LSB used
/// for the round-to-even tie-break).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundInput {
    /// The bit at position `k-1` of the pre-shift value: the guard bit.
    pub guard: bool,
    /// The bit at position `k-2` of the pre-shift value: the round bit.
    pub round: bool,
    /// OR of every bit below position `k-2`.
    pub sticky: bool,
    /// The LSB of the value *after* shifting right by `k` (bit `k` of the
    /// pre-shift value).
    pub lsb: bool,
}

/// Round-to-nearest-even decision shared by `FixedPoint` multiply, `Posit`
/// encode, and `Lns2b` convert (spec.md §4.8).
///
/// Returns `true` iff the already-shifted value must be incremented by one
/// to round correctly: `guard && (lsb || round || sticky)`.
pub fn round_to_nearest_even(input: RoundInput) -> bool {
    input.guard && (input.lsb || input.round || input.sticky)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_half_rounds_to_even() {
        // lsb = 0 (even), guard = 1, nothing below: stays even, no round up.
        let input = RoundInput {
            guard: true,
            round: false,
            sticky: false,
            lsb: false,
        };
        assert!(!round_to_nearest_even(input));

        // lsb = 1 (odd), guard = 1, nothing below: rounds up to even.
        let input = RoundInput {
            guard: true,
            round: false,
            sticky: false,
            lsb: true,
        };
        assert!(round_to_nearest_even(input));
    }

    #[test]
    fn just_above_half_always_rounds_up() {
        let input = RoundInput {
            guard: true,
            round: true,
            sticky: false,
            lsb: false,
        };
        assert!(round_to_nearest_even(input));
    }

    #[test]
    fn below_half_never_rounds_up() {
        let input = RoundInput {
            guard: false,
            round: true,
            sticky: true,
            lsb: true,
        };
        assert!(!round_to_nearest_even(input));
    }
}
