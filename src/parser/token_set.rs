//! A compact set of token kinds
//!
//! The scanner's token-request protocol takes the set of token kinds the
//! tree builder currently considers valid, and error recovery walks to the
//! nearest anchor out of a declared set. Both are represented as a `u128`
//! bitmask, which is why token kinds occupy the low end of [`SyntaxKind`].

use super::syntax_kind::SyntaxKind;

/// A bitset over token kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenSet(u128);

impl TokenSet {
    pub const EMPTY: TokenSet = TokenSet(0);

    /// Build a set from a slice of token kinds (const-friendly)
    pub const fn new(kinds: &[SyntaxKind]) -> TokenSet {
        let mut bits = 0u128;
        let mut i = 0;
        while i < kinds.len() {
            bits |= mask(kinds[i]);
            i += 1;
        }
        TokenSet(bits)
    }

    /// Union of two sets
    pub const fn union(self, other: TokenSet) -> TokenSet {
        TokenSet(self.0 | other.0)
    }

    /// Membership test
    pub const fn contains(&self, kind: SyntaxKind) -> bool {
        self.0 & mask(kind) != 0
    }
}

const fn mask(kind: SyntaxKind) -> u128 {
    let idx = kind as u16;
    assert!(idx < 128, "TokenSet only covers token kinds");
    1u128 << idx
}
