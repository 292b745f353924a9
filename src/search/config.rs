//! Search player configuration.

use serde::{Deserialize, Serialize};

/// Which recursion a search player runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    MinMax,
    #[default]
    AlphaBeta,
}

/// How long terminal positions stay valid in the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminalReuse {
    /// Terminal values are stored at searched depth 0 and only answer leaf
    /// queries; deeper queries re-evaluate the position.
    #[default]
    LeafOnly,
    /// Terminal values answer queries at any depth.
    AnyDepth,
}

/// How alpha-beta stores values produced under a cutoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CutoffCaching {
    /// Tag entries as exact, lower or upper bounds and honour the tag on probe.
    #[default]
    Bounded,
    /// Store every value as exact, bounds included.
    AsExact,
}

/// Configuration for a [`super::SearchPlayer`].
///
/// # Examples
///
/// ```
/// use duelist::search::{Algorithm, SearchConfig, TerminalReuse};
///
/// let config = SearchConfig::minmax()
///     .with_depth(4)
///     .with_symmetries(true)
///     .with_terminal_reuse(TerminalReuse::AnyDepth);
/// assert_eq!(config.algorithm, Algorithm::MinMax);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    pub algorithm: Algorithm,
    /// Maximum search depth in plies, counting the root move
    pub depth: u32,
    /// Enumerate symmetry-reduced transitions instead of every legal move
    pub symmetries: bool,
    pub terminal_reuse: TerminalReuse,
    pub cutoff_caching: CutoffCaching,
}

impl SearchConfig {
    pub const DEFAULT_DEPTH: u32 = 3;

    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            depth: Self::DEFAULT_DEPTH,
            symmetries: false,
            terminal_reuse: TerminalReuse::default(),
            cutoff_caching: CutoffCaching::default(),
        }
    }

    pub fn minmax() -> Self {
        Self::new(Algorithm::MinMax)
    }

    pub fn alpha_beta() -> Self {
        Self::new(Algorithm::AlphaBeta)
    }

    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_symmetries(mut self, symmetries: bool) -> Self {
        self.symmetries = symmetries;
        self
    }

    pub fn with_terminal_reuse(mut self, reuse: TerminalReuse) -> Self {
        self.terminal_reuse = reuse;
        self
    }

    /// Only affects [`Algorithm::AlphaBeta`]; minimax values are always exact.
    pub fn with_cutoff_caching(mut self, caching: CutoffCaching) -> Self {
        self.cutoff_caching = caching;
        self
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self::new(Algorithm::default())
    }
}
