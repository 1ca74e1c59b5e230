//! Built-in aggregate functions and their metadata.
//!
//! Conventions:
//! - Formula keywords are matched lower-case (`sum`, `mult`).
//! - Every keyword maps to one [`Aggregate`]; several keywords may share one.
//! - If you add a keyword, add it to `AGGREGATE_BUILTINS`.

use regex::Regex;
use std::sync::OnceLock;

/// The fold applied to a formula's numeric operands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Aggregate {
    Sum,
    Product,
}

impl Aggregate {
    /// Result of folding no operands.
    pub fn identity(self) -> f64 {
        match self {
            Aggregate::Sum => 0.0,
            Aggregate::Product => 1.0,
        }
    }

    pub fn fold(self, acc: f64, operand: f64) -> f64 {
        match self {
            Aggregate::Sum => acc + operand,
            Aggregate::Product => acc * operand,
        }
    }
}

pub struct AggregateBuiltin {
    pub keyword: &'static str,
    pub aggregate: Aggregate,
    #[allow(dead_code)]
    pub description: &'static str,
}

pub const AGGREGATE_BUILTINS: &[AggregateBuiltin] = &[
    AggregateBuiltin {
        keyword: "sum",
        aggregate: Aggregate::Sum,
        description: "Sum of numeric values in a cell list or range",
    },
    AggregateBuiltin {
        keyword: "multiplication",
        aggregate: Aggregate::Product,
        description: "Product of numeric values in a cell list or range",
    },
    AggregateBuiltin {
        keyword: "mult",
        aggregate: Aggregate::Product,
        description: "Alias of multiplication",
    },
];

/// Find the builtin whose `keyword(` opens the (lower-cased) formula.
/// Returns the aggregate and the text after the opening parenthesis.
pub fn match_builtin(formula: &str) -> Option<(Aggregate, &str)> {
    AGGREGATE_BUILTINS.iter().find_map(|b| {
        formula
            .strip_prefix(b.keyword)
            .and_then(|rest| rest.strip_prefix('('))
            .map(|rest| (b.aggregate, rest))
    })
}

/// Regex that matches whitespace around argument punctuation.
pub fn punctuation_space_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\s*([(),])\s*").expect("punctuation regex must compile")
    })
}

/// Regex that matches the range argument form `sheet,(r1,c1),(r2,c2)`
/// once punctuation whitespace has been removed.
///
/// Captures:
/// - group 1: sheet name (may still carry stray parentheses)
/// - groups 2-3: first corner (1-indexed)
/// - groups 4-5: second corner (1-indexed)
pub fn range_args_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(.+?),\(([0-9]+),([0-9]+)\),\(([0-9]+),([0-9]+)\)$")
            .expect("range argument regex must compile")
    })
}

/// Regex that splits a cell list at each comma followed by `(`.
pub fn list_separator_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r",\(").expect("list separator regex must compile"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_builtin_splits_keyword() {
        assert_eq!(
            match_builtin("multiplication((1,1),(1,2))"),
            Some((Aggregate::Product, "(1,1),(1,2))"))
        );
        assert_eq!(match_builtin("mult(x)"), Some((Aggregate::Product, "x)")));
        assert_eq!(match_builtin("sum()"), Some((Aggregate::Sum, ")")));
    }

    #[test]
    fn test_match_builtin_requires_parenthesis() {
        assert_eq!(match_builtin("sum"), None);
        assert_eq!(match_builtin("summary(1)"), None);
        assert_eq!(match_builtin("avg((1,1))"), None);
    }

    #[test]
    fn test_identities() {
        assert_eq!(Aggregate::Sum.identity(), 0.0);
        assert_eq!(Aggregate::Product.identity(), 1.0);
        assert_eq!(Aggregate::Product.fold(3.0, 4.0), 12.0);
    }

    #[test]
    fn test_range_args_re() {
        let caps = range_args_re().captures("sheet2,(1,1),(2,2)").unwrap();
        assert_eq!(&caps[1], "sheet2");
        assert_eq!(&caps[5], "2");
        assert!(!range_args_re().is_match("sheet2,(1,1)"));
    }
}
