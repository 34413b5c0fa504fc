// Engine tuning constants

/// Default number of values per arena slab.
///
/// Large enough that typical inputs (a few thousand nodes) fit in one or
/// two slabs, small enough that a fresh context stays cheap to create.
pub const DEFAULT_SLAB_CAPACITY: usize = 1024;

/// Nonterminal name used in driver errors when none is configured.
pub const DEFAULT_NONTERMINAL: &str = "<input>";
