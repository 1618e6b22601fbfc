//! ssh_config syntax: parsing, canonical serialization, include expansion and host matching
// (c) 2024 Ross Younger
//!
//! The file format is the OpenSSH client configuration format:
//!
//! ```text
//! # comments are kept
//! Include conf.d/*
//!
//! Host db1 db2
//!     HostName db.example.com
//!     User admin
//!
//! Host *
//!     ServerAliveInterval 30
//! ```
//!
//! Keywords are case-insensitive and are written back in lowercase.
//! `Match` blocks are not supported.

mod includes;
pub(crate) use includes::find_include_files;

mod lines;
pub(crate) use lines::canonical_value;

mod matching;
pub use matching::{pattern_matches, validate_pattern, validate_setting};

mod tree;
pub use tree::{Block, Node, SyntaxTree};
