//! Filepath: src/core/truncate.rs
//! Middle-out truncation with human-readable gap markers (§4.1).

/// Truncate `content` to at most `max_chars` Unicode scalar values.
///
/// Atomic content is tail-truncated only (head + ellipsis). Non-atomic
/// content is split around a gap marker reporting how much was dropped,
/// keeping both boundary contexts.
#[must_use]
pub fn truncate(
    content: &str,
    max_chars: usize,
    atomic: bool,
) -> String
{
    let char_len = content.chars().count();

    if char_len <= max_chars
    {
        return content.to_string();
    }

    if atomic
    {
        return truncate_atomic(content, max_chars);
    }

    let removed = char_len - max_chars;
    let marker = gap_marker(removed);
    let marker_len = marker.chars().count();

    if max_chars <= marker_len
    {
        return take_chars(&marker, max_chars);
    }

    if max_chars >= 40 + marker_len
    {
        let remaining = max_chars - marker_len;
        let head_len = remaining / 2;
        let tail_len = remaining - head_len;
        let head = take_chars(content, head_len);
        let tail = take_last_chars(content, tail_len);
        format!("{head}{marker}{tail}")
    }
    else
    {
        let head = take_chars(content, max_chars - marker_len);
        format!("{head}{marker}")
    }
}

fn truncate_atomic(
    content: &str,
    max_chars: usize,
) -> String
{
    const ELLIPSIS: &str = "...";
    let ellipsis_len = ELLIPSIS.chars().count();

    if max_chars <= ellipsis_len
    {
        return take_chars(ELLIPSIS, max_chars);
    }

    let head = take_chars(content, max_chars - ellipsis_len);
    format!("{head}{ELLIPSIS}")
}

fn gap_marker(removed: usize) -> String
{
    if removed < 100
    {
        "...".to_string()
    }
    else if removed < 1000
    {
        format!("...[+{removed} chars]...")
    }
    else
    {
        let kb = removed as f64 / 1024.0;
        format!("...[+{kb:.1} KB]...")
    }
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

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn fits_unchanged()
    {
        assert_eq!(truncate("short", 100, false), "short");
    }

    #[test]
    fn middle_out_keeps_head_and_tail()
    {
        let content = format!("start{}end", "x".repeat(200));
        let out = truncate(&content, 60, false);
        assert_eq!(out.chars().count(), 60);
        assert!(out.starts_with("start"));
        assert!(out.ends_with("end"));
        assert!(out.contains("[+"));
    }

    #[test]
    fn atomic_is_tail_truncated()
    {
        let content = format!("start{}end", "x".repeat(200));
        let out = truncate(&content, 50, true);
        assert_eq!(out.chars().count(), 50);
        assert!(out.starts_with("start"));
        assert!(out.ends_with("..."));
        assert!(!out.contains("end"));
        assert!(!out.contains("[+"));
    }

    #[test]
    fn tiny_budget_truncates_the_marker_itself()
    {
        let content = "x".repeat(500);
        let out = truncate(&content, 2, false);
        assert_eq!(out.chars().count(), 2);
    }

    #[test]
    fn idempotent()
    {
        let content = format!("start{}end", "x".repeat(500));
        let once = truncate(&content, 60, false);
        let twice = truncate(&once, 60, false);
        assert_eq!(once, twice);
    }

    #[test]
    fn removed_thresholds_pick_the_right_marker_shape()
    {
        let small_gap = format!("{}{}", "a".repeat(50), "b".repeat(40));
        let out = truncate(&small_gap, 80, false);
        assert!(out.contains("..."));
        assert!(!out.contains("[+"));

        let big_gap = "a".repeat(2000);
        let out = truncate(&big_gap, 100, false);
        assert!(out.contains("KB"));
    }
}
