//! Alias resolution: from blocks to effective per-alias settings
// (c) 2024 Ross Younger
//!
//! Each pattern on each block is an _occurrence_ of an alias. Occurrences are processed in file order
//! (an included file's blocks at the point of the `Include`), and each one:
//!
//! 1. inherits the explicit settings of every earlier alias whose pattern matches it (first match wins);
//! 2. records its own settings as explicit, except for keys it has just inherited;
//! 3. donates its explicit settings to every earlier alias which its own pattern matches,
//!    where that alias has no value yet;
//! 4. merges into any earlier occurrence of the same alias (first value wins).
//!
//! Finally a built-in `Host *` block supplying `user` and `port` is processed the same way.

mod alias;
pub use alias::{Occurrence, ResolvedAlias};

mod index;
pub use index::{AliasIndex, FALLBACK_PATTERN, FALLBACK_PORT};
