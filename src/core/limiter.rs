//! Filepath: src/core/limiter.rs
//! Output limiter (§4.8): enforce a hard character ceiling on the final
//! string with a bookend truncation and an advisory message block.

pub struct LimiterAdvisory<'a>
{
    pub shape: &'a str,
    pub range: Option<&'a str>,
    pub limit: usize,
}

/// Apply the final character ceiling. Passes `output` through unchanged
/// if it already fits; otherwise produces a head+marker+tail bookend and
/// appends an informational block.
#[must_use]
pub fn apply_output_limit(
    output: &str,
    limit: usize,
    advisory: &LimiterAdvisory<'_>,
) -> String
{
    if limit == 0
    {
        return output.to_string();
    }

    let char_len = output.chars().count();
    if char_len <= limit
    {
        return output.to_string();
    }

    let omitted = char_len - limit;
    let kb = omitted as f64 / 1024.0;
    let marker = format!("\n\n[...{kb:.1} KB OMITTED...]\n\n");
    let marker_len = marker.chars().count();

    let body = if limit < 100 + marker_len
    {
        take_chars(output, limit)
    }
    else
    {
        let remaining = limit - marker_len;
        let head_len = remaining - remaining / 2;
        let tail_len = remaining / 2;
        let head = take_chars(output, head_len);
        let tail = take_last_chars(output, tail_len);
        format!("{head}{marker}{tail}")
    };

    format!("{body}{}", advisory_block(char_len, limit, advisory))
}

fn advisory_block(
    actual: usize,
    limit: usize,
    advisory: &LimiterAdvisory<'_>,
) -> String
{
    let mut lines = vec![
        String::new(),
        format!("[output was {actual} chars, limited to {limit}]"),
        format!("[shape: {}]", advisory.shape),
    ];

    if let Some(range) = advisory.range
    {
        lines.push(format!("[range: {range}]"));
    }

    lines.push("[use --limit to raise the ceiling, or redirect to a file]".to_string());
    lines.join("\n")
}

fn take_chars(
    s: &str,
    n: usize,
) -> String
{
    s.chars().take(n).collect()
}

fn take_last_chars(
    s: &str,
    n: usize,
) -> String
{
    let total = s.chars().count();
    let skip = total.saturating_sub(n);
    s.chars().skip(skip).collect()
}
