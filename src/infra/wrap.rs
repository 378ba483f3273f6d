//! Filepath: src/infra/wrap.rs
//! Pre-compression line wrapping, address-based range selection, and
//! line-number prefixing for the raw-text pipeline (§6, §9).

use crate::core::compressor::OutputLine;

/// Wrap lines longer than `wrap_width` characters into fixed-width
/// segments, optionally prefixing each with a fractional address
/// `"L.PP: "` (or plain `"L: "` for lines that needed no wrapping).
#[must_use]
pub fn wrap_content(
    content: &str,
    wrap_width: usize,
    add_line_numbers: bool,
) -> String
{
    let mut out = Vec::new();

    for (i, line) in content.split('\n').enumerate()
    {
        let line_num = i + 1;
        let chars: Vec<char> = line.chars().collect();
        let line_len = chars.len();

        if line_len <= wrap_width || wrap_width == 0
        {
            if add_line_numbers
            {
                out.push(format!("{line_num}: {line}"));
            }
            else
            {
                out.push(line.to_string());
            }
            continue;
        }

        let num_segments = line_len.div_ceil(wrap_width);
        for seg_idx in 0..num_segments
        {
            let start = seg_idx * wrap_width;
            let end = (start + wrap_width).min(line_len);
            let segment: String = chars[start..end].iter().collect();
            let percentage = (start * 100) / line_len;

            if add_line_numbers
            {
                out.push(format!("{line_num}.{percentage:02}: {segment}"));
            }
            else
            {
                out.push(segment);
            }
        }
    }

    out.join("\n")
}

/// Prefix every line with a plain sequential `"N: "` address.
#[must_use]
pub fn add_line_numbers(content: &str) -> String
{
    content
        .split('\n')
        .enumerate()
        .map(|(i, line)| format!("{}: {line}", i + 1))
        .collect::<Vec<_>>()
        .join("\n")
}

fn parse_address(line: &str) -> Option<(f64, usize)>
{
    let colon = line.find(": ")?;
    let addr = &line[..colon];
    let value: f64 = addr.parse().ok()?;
    Some((value, colon + 2))
}

/// Keep only lines whose fractional/integer address prefix falls in
/// `[start, end]`. Lines with no recognizable prefix are kept only when
/// the range covers the document start (`start <= 1.0`).
#[must_use]
pub fn extract_fractional_range(
    content: &str,
    start: f64,
    end: f64,
) -> String
{
    content
        .split('\n')
        .filter(|line| match parse_address(line)
        {
            Some((addr, _)) => addr >= start && addr <= end,
            None => start <= 1.0,
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Keep only lines `[start, end]` (1-based, inclusive) by plain position.
#[must_use]
pub fn extract_integer_range(
    content: &str,
    start: usize,
    end: usize,
) -> Option<String>
{
    let lines: Vec<&str> = content.split('\n').collect();

    if start == 0 || start > lines.len()
    {
        return None;
    }

    let end = end.min(lines.len());
    Some(lines[start - 1..end].join("\n"))
}

/// Render `OutputLine`s with a `"N: "` prefix drawn from each line's
/// source line number, falling back to its sequential position.
#[must_use]
pub fn format_with_line_numbers(lines: &[OutputLine]) -> String
{
    lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let n = line.source_line.unwrap_or(i + 1);
            format!("{n}: {}", line.content)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn short_lines_pass_through_with_plain_numbers()
    {
        let out = wrap_content("abc\ndef", 10, true);
        assert_eq!(out, "1: abc\n2: def");
    }

    #[test]
    fn long_line_wraps_with_fractional_addresses()
    {
        let long = "x".repeat(25);
        let out = wrap_content(&long, 10, true);
        let lines: Vec<&str> = out.split('\n').collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("1.00: "));
        assert!(lines[1].starts_with("1.40: "));
    }

    #[test]
    fn fractional_range_keeps_matching_addresses()
    {
        let content = "1.00: a\n1.50: b\n2.00: c";
        let out = extract_fractional_range(content, 1.0, 1.75);
        assert_eq!(out, "1.00: a\n1.50: b");
    }

    #[test]
    fn integer_range_selects_by_position()
    {
        let content = "a\nb\nc\nd";
        assert_eq!(extract_integer_range(content, 2, 3).unwrap(), "b\nc");
    }

    #[test]
    fn integer_range_rejects_out_of_bounds_start()
    {
        assert!(extract_integer_range("a\nb", 5, 10).is_none());
    }

    #[test]
    fn source_line_numbers_take_priority_over_sequential()
    {
        let lines = vec![
            OutputLine { content: "x".to_string(), source_line: Some(42) },
            OutputLine { content: "y".to_string(), source_line: None },
        ];
        let out = format_with_line_numbers(&lines);
        assert_eq!(out, "42: x\n2: y");
    }
}
