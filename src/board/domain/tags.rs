//! Tag edit expressions.

use std::collections::BTreeSet;

/// Single operation of a tag edit expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagOp {
    /// Add the tag when absent.
    Add(String),
    /// Remove the tag when present.
    Remove(String),
}

/// Ordered sequence of tag operations.
///
/// Written as comma-separated tokens, each optionally prefixed with `+`
/// (add, the default) or `-` (remove): `"release,+qa,-draft"`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TagEdit {
    ops: Vec<TagOp>,
}

/// Outcome of applying a [`TagEdit`] to a tag set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagDiff {
    /// Tag set after every operation was applied.
    pub tags: BTreeSet<String>,
    /// Whether the resulting set differs from the original.
    pub changed: bool,
}

impl TagEdit {
    /// Parses a comma-separated tag edit expression.
    ///
    /// Blank tokens and tokens consisting only of a sign are ignored.
    #[must_use]
    pub fn parse(expression: &str) -> Self {
        let ops = expression
            .split(',')
            .filter_map(|token| {
                let trimmed = token.trim();
                let (remove, name) = match trimmed.strip_prefix('-') {
                    Some(rest) => (true, rest),
                    None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
                };
                let tag = name.trim();
                if tag.is_empty() {
                    return None;
                }
                Some(if remove {
                    TagOp::Remove(tag.to_owned())
                } else {
                    TagOp::Add(tag.to_owned())
                })
            })
            .collect();
        Self { ops }
    }

    /// Returns `true` when the expression holds no operations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Returns the operations in expression order.
    #[must_use]
    pub fn ops(&self) -> &[TagOp] {
        &self.ops
    }

    /// Applies the operations in order to a copy of `current`.
    #[must_use]
    pub fn apply(&self, current: &BTreeSet<String>) -> TagDiff {
        let mut tags = current.clone();
        for op in &self.ops {
            match op {
                TagOp::Add(tag) => {
                    tags.insert(tag.clone());
                }
                TagOp::Remove(tag) => {
                    tags.remove(tag);
                }
            }
        }
        let changed = tags != *current;
        TagDiff { tags, changed }
    }
}
