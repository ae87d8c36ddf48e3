//! Precomputed, immutable lookup data shared by every position.

use crate::movegen::magics::MagicTables;
use crate::movegen::rays::build_align_masks;
use crate::zobrist::{ZobristKeys, DEFAULT_SEED};
use crate::Bitboard;
use chess_core::Square;
use std::sync::{Arc, OnceLock};

/// Slider attack tables, line masks and Zobrist keys.
///
/// Built once and then only read, so one instance can back any number of
/// positions on any number of threads. Positions hold it behind an [`Arc`].
pub struct EngineTables {
    magics: MagicTables,
    align: Vec<Bitboard>,
    zobrist: ZobristKeys,
}

static SHARED: OnceLock<Arc<EngineTables>> = OnceLock::new();

impl EngineTables {
    /// Builds tables with the default Zobrist seed.
    pub fn new() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }

    /// Builds tables whose Zobrist keys come from `seed`.
    pub fn with_seed(seed: u64) -> Self {
        let magics = MagicTables::new();
        let align = build_align_masks();
        tracing::debug!(
            slider_entries = magics.len(),
            align_entries = align.len(),
            seed,
            "built engine tables"
        );
        EngineTables {
            magics,
            align,
            zobrist: ZobristKeys::with_seed(seed),
        }
    }

    /// The process-wide default instance, built on first use.
    pub fn shared() -> Arc<EngineTables> {
        Arc::clone(SHARED.get_or_init(|| Arc::new(EngineTables::new())))
    }

    #[inline]
    pub fn magics(&self) -> &MagicTables {
        &self.magics
    }

    #[inline]
    pub fn zobrist(&self) -> &ZobristKeys {
        &self.zobrist
    }

    #[inline]
    pub fn rook_attacks(&self, sq: Square, occupied: Bitboard) -> Bitboard {
        self.magics.rook_attacks(sq, occupied)
    }

    #[inline]
    pub fn bishop_attacks(&self, sq: Square, occupied: Bitboard) -> Bitboard {
        self.magics.bishop_attacks(sq, occupied)
    }

    #[inline]
    pub fn queen_attacks(&self, sq: Square, occupied: Bitboard) -> Bitboard {
        self.magics.queen_attacks(sq, occupied)
    }

    /// The full line through `a` and `b`, or empty if they are not aligned.
    #[inline]
    pub fn align(&self, a: Square, b: Square) -> Bitboard {
        self.align[a.idx() * 64 + b.idx()]
    }
}

impl Default for EngineTables {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EngineTables {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineTables")
            .field("slider_entries", &self.magics.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_instance_is_reused() {
        let a = EngineTables::shared();
        let b = EngineTables::shared();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn alternate_seed_changes_only_the_keys() {
        let default = EngineTables::shared();
        let other = EngineTables::with_seed(1234);
        assert_ne!(default.zobrist(), other.zobrist());
        assert_eq!(default.magics().len(), other.magics().len());
        let d4 = Square::from_algebraic("d4").unwrap();
        assert_eq!(default.queen_attacks(d4, Bitboard::EMPTY), other.queen_attacks(d4, Bitboard::EMPTY));
    }

    #[test]
    fn tables_are_thread_safe() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<EngineTables>();
    }
}
