/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

#![doc = include_str!("../README.md")]
#![deny(unstable_features)]
#![deny(trivial_casts)]
#![deny(unconditional_recursion)]
#![deny(clippy::empty_loop)]
#![deny(unreachable_code)]
#![deny(unreachable_pub)]
#![deny(unreachable_patterns)]
#![deny(unused_macro_rules)]
#![deny(unused_doc_comments)]

pub mod baseline;
pub mod bits;
pub mod mwhc;
pub mod spooky;
pub mod traits;
pub mod trie;

/// Prelude module to import everything from this crate.
pub mod prelude {
    pub use crate::baseline::*;
    pub use crate::bits::*;
    pub use crate::mwhc::*;
    pub use crate::traits::*;
    pub use crate::trie::*;
}
