//! Adversarial game-tree search
//!
//! Two engines share one transposition cache contract:
//!
//! - **Minimax** explores every move to a fixed depth and backs up the
//!   max/min of the static evaluation.
//! - **Alpha-beta** threads an `(alpha, beta)` window through the same
//!   recursion and stops a node's child loop once it can no longer affect
//!   an ancestor.
//!
//! Both are driven through [`SearchPlayer`], which owns the cache across
//! moves and implements [`crate::ports::Player`].
//!
//! ## Cache rule
//!
//! Entries are keyed by `(Role, Key)`. An entry computed with `d` plies left
//! answers any later query with `<= d` plies left. Terminal positions are
//! stored at depth 0 unless [`TerminalReuse::AnyDepth`] is selected.
//!
//! Minimax and alpha-beta pick the same action and value when both start
//! from an empty cache. A player whose cache has lived across earlier moves
//! can answer from deeper entries, so two long-lived players may disagree.

pub mod alphabeta;
pub mod cache;
pub mod config;
pub mod evaluation;
pub mod minmax;
pub mod player;
pub mod searcher;

pub use cache::{Bound, CacheEntry, EntryDepth, Role, TranspositionCache};
pub use config::{Algorithm, CutoffCaching, SearchConfig, TerminalReuse};
pub use evaluation::evaluate;
pub use player::{SearchPlayer, SearchState};
pub use searcher::{SearchOutcome, SearchStats};
