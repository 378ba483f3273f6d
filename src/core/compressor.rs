//! Filepath: src/core/compressor.rs
//! The recursive hierarchical compressor (§4.5): routes budget down the
//! DOM, invokes the format's LOD renderer at each leaf, and emits fold
//! markers where detail collapses.

use regex::Regex;

use crate::core::allocator::{
    select_lines_by_ucurve, softmax_allocate_with_redistribution, AllocInput,
};
use crate::core::scorer::{importance_score, Weights};
use crate::dom::Node;
use crate::formats::registry::FormatStrategy;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLine
{
    pub content: String,
    pub source_line: Option<usize>,
}

impl OutputLine
{
    fn plain(content: impl Into<String>) -> Self
    {
        Self { content: content.into(), source_line: None }
    }
}

pub struct CompressOptions<'a>
{
    pub pattern: Option<&'a Regex>,
    pub weights: Weights,
    pub temperature: f64,
    pub min_line_chars: usize,
}

const BUDGET_MARKER: &str = "...[truncated to fit budget]";

/// Compress `root` into a sequence of output lines within `budget` chars.
#[must_use]
pub fn compress(
    root: &Node,
    budget: i64,
    strategy: &dyn FormatStrategy,
    opts: &CompressOptions<'_>,
) -> Vec<OutputLine>
{
    compress_tree(root, budget, strategy, opts)
}

fn compress_tree(
    node: &Node,
    budget: i64,
    strategy: &dyn FormatStrategy,
    opts: &CompressOptions<'_>,
) -> Vec<OutputLine>
{
    if node.children.is_empty()
    {
        return render_leaf(node, budget, strategy);
    }

    let mut remaining = budget;
    let mut lines: Vec<OutputLine> = Vec::new();

    if !node.content.is_empty()
    {
        let content_len = node.content.chars().count() as i64;
        if content_len <= remaining
        {
            lines.push(OutputLine { content: node.content.clone(), source_line: node.source_line });
            remaining -= content_len;
        }
    }

    let n = node.children.len();
    let scores: Vec<f64> = node
        .children
        .iter()
        .enumerate()
        .map(|(i, child)| importance_score(child, i, n, strategy.rank(child), opts.pattern, opts.weights))
        .collect();

    let avg_per_child = if n > 0 { remaining.max(0) as f64 / n as f64 } else { 0.0 };
    let use_ucurve = avg_per_child < opts.min_line_chars as f64 && n > 50;

    let allocations = if use_ucurve
    {
        let content_lens: Vec<usize> = node.children.iter().map(|c| c.content.chars().count()).collect();
        let selection = select_lines_by_ucurve(&scores, &content_lens, remaining, opts.min_line_chars);
        let mut alloc = vec![0usize; n];
        for (idx, amount) in selection.allocations
        {
            alloc[idx] = amount;
        }
        alloc
    }
    else
    {
        let inputs: Vec<AllocInput> = node
            .children
            .iter()
            .zip(scores.iter())
            .map(|(child, &score)| AllocInput {
                score,
                content_len: child.content.chars().count(),
                is_container: !child.children.is_empty(),
            })
            .collect();
        softmax_allocate_with_redistribution(&inputs, remaining, opts.temperature)
    };

    let mut fold_count: usize = 0;

    for (child, &alloc) in node.children.iter().zip(allocations.iter())
    {
        let child_lines = compress_tree(child, alloc as i64, strategy, opts);

        if child_lines.is_empty()
        {
            fold_count += 1;
        }
        else
        {
            if fold_count > 0
            {
                lines.push(fold_marker(fold_count));
                fold_count = 0;
            }
            lines.extend(child_lines);
        }
    }

    if fold_count > 0
    {
        lines.push(fold_marker(fold_count));
    }

    let merged = merge_fold_markers(lines);
    enforce_budget(merged, budget)
}

fn render_leaf(
    node: &Node,
    budget: i64,
    strategy: &dyn FormatStrategy,
) -> Vec<OutputLine>
{
    if budget <= 0
    {
        return Vec::new();
    }

    match strategy.render(node, budget)
    {
        Some(content) => vec![OutputLine { content, source_line: node.source_line }],
        None => Vec::new(),
    }
}

fn fold_marker(count: usize) -> OutputLine
{
    OutputLine::plain(format!("[...{count} more...]"))
}

fn parse_more_marker(s: &str) -> Option<usize>
{
    let rest = s.strip_prefix("[...")?;
    let idx = rest.find(" more...]")?;
    rest[..idx].parse().ok()
}

fn parse_too_low_marker(s: &str) -> Option<usize>
{
    let rest = s.strip_prefix('[')?;
    let idx = rest.find(" items, budget too low]")?;
    rest[..idx].parse().ok()
}

fn fold_count_of(s: &str) -> Option<usize>
{
    parse_more_marker(s).or_else(|| parse_too_low_marker(s))
}

fn is_fold_marker(s: &str) -> bool
{
    fold_count_of(s).is_some()
}

/// Merge adjacent fold markers into one, and collapse an all-markers
/// output into the single `[K items, budget too low]` shape (§4.5 step 7).
fn merge_fold_markers(lines: Vec<OutputLine>) -> Vec<OutputLine>
{
    let mut result: Vec<OutputLine> = Vec::new();
    let mut pending: usize = 0;

    for line in lines
    {
        if let Some(count) = fold_count_of(&line.content)
        {
            pending += count;
        }
        else
        {
            if pending > 0
            {
                result.push(fold_marker(pending));
                pending = 0;
            }
            result.push(line);
        }
    }

    if pending > 0
    {
        result.push(fold_marker(pending));
    }

    let has_content = result.iter().any(|l| !is_fold_marker(&l.content));
    if !has_content && !result.is_empty()
    {
        let total: usize = result.iter().filter_map(|l| fold_count_of(&l.content)).sum();
        return vec![OutputLine::plain(format!("[{total} items, budget too low]"))];
    }

    result
}

/// Hard backstop: if the merged output still exceeds `budget`, keep
/// lines in order until the next would overrun, then append a marker.
fn enforce_budget(
    lines: Vec<OutputLine>,
    budget: i64,
) -> Vec<OutputLine>
{
    let budget = budget.max(0) as usize;
    let total: usize = lines.iter().map(|l| l.content.chars().count()).sum();

    if total <= budget
    {
        return lines;
    }

    let marker_len = BUDGET_MARKER.chars().count();
    let mut result = Vec::new();
    let mut used = 0usize;

    for line in lines
    {
        let len = line.content.chars().count();
        if used + len + marker_len <= budget
        {
            used += len;
            result.push(line);
        }
        else
        {
            break;
        }
    }

    if used + marker_len <= budget
    {
        result.push(OutputLine::plain(BUDGET_MARKER));
    }

    result
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::formats::text::TextStrategy;

    fn opts() -> CompressOptions<'static>
    {
        CompressOptions {
            pattern: None,
            weights: Weights { positional: 1.0, grep: 0.0, topology: 0.0 },
            temperature: 0.5,
            min_line_chars: 160,
        }
    }

    #[test]
    fn leaf_with_zero_budget_emits_nothing()
    {
        let node = Node::new("hello", "line");
        let strategy = TextStrategy;
        assert!(compress(&node, 0, &strategy, &opts()).is_empty());
    }

    #[test]
    fn budget_never_exceeded()
    {
        let mut root = Node::new("", "document");
        for i in 0..20
        {
            root.add_child(Node::new(format!("line number {i} with some text"), "line"));
        }
        let strategy = TextStrategy;
        let out = compress(&root, 50, &strategy, &opts());
        let total: usize = out.iter().map(|l| l.content.chars().count()).sum();
        assert!(total <= 50);
    }

    #[test]
    fn fold_markers_merge_and_never_sit_adjacent()
    {
        let mut root = Node::new("", "document");
        for i in 0..10
        {
            root.add_child(Node::new(format!("{i}"), "line"));
        }
        let strategy = TextStrategy;
        // A tiny budget forces most children to fold.
        let out = compress(&root, 5, &strategy, &opts());
        for pair in out.windows(2)
        {
            assert!(!(is_fold_marker(&pair[0].content) && is_fold_marker(&pair[1].content)));
        }
    }

    #[test]
    fn all_folded_collapses_to_budget_too_low()
    {
        let mut root = Node::new("", "document");
        for i in 0..5
        {
            root.add_child(Node::new(format!("some longer line of text {i}"), "line"));
        }
        let strategy = TextStrategy;
        let out = compress(&root, 0, &strategy, &opts());
        assert!(out.is_empty());
    }
}
