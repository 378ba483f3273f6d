//! Filepath: src/core/scorer.rs
//! Importance scoring: `S = w_p*P(i,n) + w_g*G(node) + w_t*T(node)`.

use regex::Regex;

use crate::dom::Node;

#[derive(Debug, Clone, Copy)]
pub struct Weights
{
    pub positional: f64,
    pub grep: f64,
    pub topology: f64,
}

impl Weights
{
    #[must_use]
    pub fn from_config() -> Self
    {
        let cfg = crate::config::load_config();
        Self { positional: cfg.weights.positional, grep: cfg.weights.grep, topology: cfg.weights.topology }
    }
}

/// U-curve positional weight: 1 at both ends, 0 in the middle, `n <= 1` => 1.
#[must_use]
pub fn positional_score(
    index: usize,
    n: usize,
) -> f64
{
    if n <= 1
    {
        return 1.0;
    }

    let theta = 2.0 * std::f64::consts::PI * index as f64 / (n - 1) as f64;
    (theta.cos() + 1.0) / 2.0
}

/// True if `content` or any descendant's content matches `pattern`.
#[must_use]
pub fn node_contains_match(
    node: &Node,
    pattern: &Regex,
) -> bool
{
    if pattern.is_match(&node.content)
    {
        return true;
    }

    node.children.iter().any(|child| node_contains_match(child, pattern))
}

/// `G(node)`: 1 if a pattern is given and it matches this node or a
/// descendant, else 0. No pattern is equivalent to no match.
#[must_use]
pub fn grep_score(
    node: &Node,
    pattern: Option<&Regex>,
) -> f64
{
    match pattern
    {
        Some(re) if node_contains_match(node, re) => 1.0,
        _ => 0.0,
    }
}

#[must_use]
pub fn importance_score(
    node: &Node,
    index: usize,
    n: usize,
    topology_score: f64,
    pattern: Option<&Regex>,
    weights: Weights,
) -> f64
{
    let p = positional_score(index, n);
    let g = grep_score(node, pattern);

    weights.positional * p + weights.grep * g + weights.topology * topology_score
}

/// Compile a pattern for `--grep`/`--separator-regex`, treating syntax
/// errors as "no pattern" rather than a failure (§7 invalid-regex policy).
#[must_use]
pub fn compile_pattern(raw: &str) -> Option<Regex>
{
    regex::RegexBuilder::new(raw).multi_line(true).build().ok()
}
