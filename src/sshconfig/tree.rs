//! The block structure of an ssh config file
// (c) 2024 Ross Younger

use std::fmt::{self, Display, Write as _};

use anyhow::{Context, Result};

use super::lines::{canonical_value, join_args, parse_line, quote_arg, Line};

/// Pattern given to settings which appear before the first `Host` line
const IMPLICIT_PATTERN: &str = "*";

/// One item within a block
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A setting. The key is always lowercase.
    KeyValue {
        /// Setting name, lowercase
        key: String,
        /// Setting value, in canonical (re-quoted) form
        value: String,
    },
    /// An `Include` directive. Each path may be a glob.
    Include {
        /// The paths as written
        paths: Vec<String>,
    },
    /// A comment line (without its leading `#`)
    Comment(String),
}

impl Node {
    /// Constructs a key/value node, normalising the key and bringing the value into canonical form.
    ///
    /// The key is not checked; see [`validate_setting`](super::validate_setting).
    #[must_use]
    pub fn key_value(key: &str, value: &str) -> Self {
        Self::KeyValue {
            key: key.to_lowercase(),
            value: canonical_value(value),
        }
    }
}

/// A `Host` block: one or more patterns sharing a list of nodes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// The patterns on the `Host` line
    pub patterns: Vec<String>,
    /// Settings, includes and comments, in file order
    pub nodes: Vec<Node>,
    /// If set, this block holds the lines before the first `Host` and is written out without a header
    pub implicit: bool,
}

impl Block {
    /// Creates a single-pattern block
    #[must_use]
    pub fn new(pattern: &str, nodes: Vec<Node>) -> Self {
        Self {
            patterns: vec![pattern.to_owned()],
            nodes,
            implicit: false,
        }
    }

    fn implicit() -> Self {
        Self {
            patterns: vec![IMPLICIT_PATTERN.to_owned()],
            nodes: Vec::new(),
            implicit: true,
        }
    }

    /// Iterates over the key/value settings in this block
    pub fn settings(&self) -> impl Iterator<Item = (&str, &str)> {
        self.nodes.iter().filter_map(|n| match n {
            Node::KeyValue { key, value } => Some((key.as_str(), value.as_str())),
            _ => None,
        })
    }

    /// Iterates over every path named by `Include` directives in this block
    pub fn includes(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().flat_map(|n| match n {
            Node::Include { paths } => paths.iter().map(String::as_str).collect(),
            _ => Vec::new(),
        })
    }

    /// Does this block declare at least one setting?
    #[must_use]
    pub fn has_settings(&self) -> bool {
        self.settings().next().is_some()
    }
}

/// A parsed ssh config file.
///
/// `SyntaxTree::parse` and `Display` are inverses up to layout:
/// blank lines, indentation and keyword case are normalised on output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyntaxTree {
    /// The blocks, in file order
    pub blocks: Vec<Block>,
}

impl SyntaxTree {
    /// Parses ssh config text
    pub fn parse(input: &str) -> Result<Self> {
        let mut blocks = Vec::<Block>::new();
        let mut current = Block::implicit();
        for (i, raw) in input.lines().enumerate() {
            let line_number = i + 1;
            match parse_line(raw, line_number)? {
                Line::Empty => (),
                Line::Comment(text) => current.nodes.push(Node::Comment(text)),
                Line::Host { args, .. } => {
                    let finished = std::mem::replace(
                        &mut current,
                        Block {
                            patterns: args,
                            nodes: Vec::new(),
                            implicit: false,
                        },
                    );
                    if !finished.implicit || !finished.nodes.is_empty() {
                        blocks.push(finished);
                    }
                }
                Line::Match { line_number } => {
                    anyhow::bail!("Match directives are not supported (line {line_number})");
                }
                Line::Include { args, .. } => current.nodes.push(Node::Include { paths: args }),
                Line::Generic { keyword, args, .. } => current.nodes.push(Node::KeyValue {
                    key: keyword,
                    value: join_args(&args),
                }),
            }
        }
        if !current.implicit || !current.nodes.is_empty() {
            blocks.push(current);
        }
        Ok(Self { blocks })
    }

    /// Reads and parses a file, attaching the path to any error
    pub(crate) fn parse_named(input: &str, source: &str) -> Result<Self> {
        Self::parse(input).with_context(|| format!("parsing {source}"))
    }

    /// Is there anything in this tree?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

fn write_node(out: &mut String, node: &Node, indent: &str) -> fmt::Result {
    match node {
        Node::KeyValue { key, value } => writeln!(out, "{indent}{key} {value}"),
        Node::Include { paths } => {
            let paths = paths.iter().map(|p| quote_arg(p)).collect::<Vec<_>>();
            writeln!(out, "{indent}Include {}", paths.join(" "))
        }
        Node::Comment(text) if text.is_empty() => writeln!(out, "{indent}#"),
        Node::Comment(text) => writeln!(out, "{indent}# {text}"),
    }
}

impl Display for SyntaxTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        for (i, block) in self.blocks.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            let indent = if block.implicit {
                ""
            } else {
                let patterns = block.patterns.iter().map(|p| quote_arg(p));
                writeln!(out, "Host {}", patterns.collect::<Vec<_>>().join(" "))?;
                "    "
            };
            for node in &block.nodes {
                write_node(&mut out, node, indent)?;
            }
        }
        f.write_str(&out)
    }
}

///////////////////////////////////////////////////////////////////////////////////////
