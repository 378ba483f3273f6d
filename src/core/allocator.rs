//! Filepath: src/core/allocator.rs
//! Budget allocation: temperature-controlled softmax plus excess
//! redistribution, and a U-curve line picker for dense flat lists (§4.3).

/// Per-child input to the allocator: its importance score, how much of
/// its own content it could actually use, and whether it is a container
/// (containers are excluded from excess reclamation since their budget
/// feeds descendants, not their own content).
#[derive(Debug, Clone, Copy)]
pub struct AllocInput
{
    pub score: f64,
    pub content_len: usize,
    pub is_container: bool,
}

/// Softmax-split `budget` across `scores`, floor to integers, and hand
/// out the leftover remainder to the top scorers in descending order
/// (cyclically if the remainder exceeds the number of scores).
///
/// `temperature <= 0` is winner-take-all with uniform tie sharing.
#[must_use]
pub fn softmax_allocate(
    scores: &[f64],
    total_budget: i64,
    temperature: f64,
) -> Vec<usize>
{
    let n = scores.len();

    if n == 0 || total_budget <= 0
    {
        return vec![0; n];
    }

    let budget = total_budget as usize;
    let max_score = scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

    let weights: Vec<f64> = if temperature <= 0.0
    {
        let is_max: Vec<bool> = scores.iter().map(|&s| s == max_score).collect();
        let winners = is_max.iter().filter(|&&b| b).count().max(1);
        is_max.iter().map(|&b| if b { 1.0 / winners as f64 } else { 0.0 }).collect()
    }
    else
    {
        let exps: Vec<f64> = scores.iter().map(|&s| ((s - max_score) / temperature).exp()).collect();
        let sum: f64 = exps.iter().sum();
        if sum <= 0.0
        {
            return vec![0; n];
        }
        exps.iter().map(|&e| e / sum).collect()
    };

    let mut alloc: Vec<usize> = weights.iter().map(|&w| (w * budget as f64).floor() as usize).collect();
    let used: usize = alloc.iter().sum();
    let mut remainder = budget.saturating_sub(used);

    if remainder > 0
    {
        let order = descending_by_score(scores);
        let mut i = 0;
        while remainder > 0
        {
            alloc[order[i % n]] += 1;
            remainder -= 1;
            i += 1;
        }
    }

    alloc
}

/// Softmax allocation followed by excess redistribution: a leaf that got
/// more than it can use keeps only `content_len`; the surplus is pooled
/// and re-offered, in score order, to leaves still short.
#[must_use]
pub fn softmax_allocate_with_redistribution(
    inputs: &[AllocInput],
    total_budget: i64,
    temperature: f64,
) -> Vec<usize>
{
    let scores: Vec<f64> = inputs.iter().map(|i| i.score).collect();
    let mut alloc = softmax_allocate(&scores, total_budget, temperature);

    let mut excess_pool: i64 = 0;
    for (i, input) in inputs.iter().enumerate()
    {
        if !input.is_container && alloc[i] > input.content_len
        {
            excess_pool += (alloc[i] - input.content_len) as i64;
            alloc[i] = input.content_len;
        }
    }

    if excess_pool > 0
    {
        let mut candidates: Vec<usize> = (0..inputs.len())
            .filter(|&i| !inputs[i].is_container && alloc[i] < inputs[i].content_len)
            .collect();
        candidates.sort_by(|&a, &b| scores[b].partial_cmp(&scores[a]).unwrap_or(std::cmp::Ordering::Equal));

        for idx in candidates
        {
            if excess_pool <= 0
            {
                break;
            }

            let need = (inputs[idx].content_len - alloc[idx]) as i64;
            let grant = need.min(excess_pool);
            alloc[idx] += grant as usize;
            excess_pool -= grant;
        }
    }

    alloc
}

fn descending_by_score(scores: &[f64]) -> Vec<usize>
{
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[b].partial_cmp(&scores[a]).unwrap_or(std::cmp::Ordering::Equal));
    order
}

/// Per-line character allocation for the U-curve fallback: the smaller
/// of what's affordable and twice the configured minimum line width.
#[must_use]
pub fn calculate_line_budget(
    num_lines: usize,
    total_budget: i64,
    min_chars_per_line: usize,
) -> usize
{
    if num_lines == 0 || total_budget <= 0
    {
        return 0;
    }

    let affordable = total_budget as usize / num_lines;
    let max_per_line = min_chars_per_line.saturating_mul(2);
    affordable.min(max_per_line)
}

const TARGET_MIN_LINES: usize = 20;
const HIGH_PRIORITY_FRACTION: f64 = 0.1;

#[derive(Debug, Clone)]
pub struct UcurveSelection
{
    /// `(child index, allocated chars)` pairs, in score-descending pick
    /// order. Any index not present got zero and folds.
    pub allocations: Vec<(usize, usize)>,
    pub chars_per_line: usize,
}

/// Select a subset of children to render fully when there are too many
/// of them to softmax-split sensibly. Children are considered in score
/// order; the top decile always gets something if it fits at all.
#[must_use]
pub fn select_lines_by_ucurve(
    scores: &[f64],
    content_lens: &[usize],
    budget: i64,
    min_chars_per_line: usize,
) -> UcurveSelection
{
    let n = scores.len();

    if n == 0 || budget <= 0
    {
        return UcurveSelection { allocations: Vec::new(), chars_per_line: 0 };
    }

    let order = descending_by_score(scores);

    let max_affordable_lines = (budget as usize) / min_chars_per_line.max(1);
    let target_lines = order.len().min(TARGET_MIN_LINES.max(max_affordable_lines));
    let chars_per_line = calculate_line_budget(target_lines, budget, min_chars_per_line);

    let high_priority_cutoff = ((n as f64 * HIGH_PRIORITY_FRACTION).ceil() as usize).max(1);

    let mut allocations = Vec::new();
    let mut remaining = budget;

    for (rank, &idx) in order.iter().enumerate()
    {
        if remaining <= 0
        {
            break;
        }

        let alloc = chars_per_line.min(content_lens[idx]).min(remaining as usize);
        let is_complete = alloc == content_lens[idx];
        let is_high_priority = rank < high_priority_cutoff;
        let min_threshold = if is_high_priority || is_complete { 1 } else { 20 };

        if alloc >= min_threshold
        {
            allocations.push((idx, alloc));
            remaining -= alloc as i64;
        }
    }

    UcurveSelection { allocations, chars_per_line }
}
