//! Filepath: src/infra/reader.rs
//! Large-file head+tail reader aligned to line boundaries (§4.7).

use std::io::Read;
use std::path::Path;

use memchr::{memchr, memrchr};

pub struct ReadResult
{
    pub content: String,
    pub is_directory: bool,
}

/// Read `path` (or stdin when `None`), applying the head+tail windowing
/// policy to files over `max_file_size`. A directory short-circuits with
/// an empty, `is_directory = true` result — the caller hands it to the
/// folder strategy by path instead.
pub fn read_input(
    path: Option<&Path>,
    max_file_size: u64,
    head_bytes: u64,
    tail_bytes: u64,
) -> std::io::Result<ReadResult>
{
    let Some(path) = path
    else
    {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        return Ok(ReadResult { content: buf, is_directory: false });
    };

    if path.is_dir()
    {
        return Ok(ReadResult { content: String::new(), is_directory: true });
    }

    let file_size = std::fs::metadata(path)?.len();

    if file_size <= max_file_size
    {
        let bytes = std::fs::read(path)?;
        return Ok(ReadResult { content: String::from_utf8_lossy(&bytes).into_owned(), is_directory: false });
    }

    let bytes = std::fs::read(path)?;
    Ok(ReadResult { content: windowed_content(&bytes, head_bytes, tail_bytes), is_directory: false })
}

fn windowed_content(
    bytes: &[u8],
    head_bytes: u64,
    tail_bytes: u64,
) -> String
{
    let len = bytes.len();
    let head_end = (head_bytes as usize).min(len);
    let head_end = match memrchr(b'\n', &bytes[..head_end])
    {
        Some(pos) => pos + 1,
        None => head_end,
    };

    let tail_start_raw = len.saturating_sub(tail_bytes as usize);

    let (tail_start, skipped) = if tail_start_raw <= head_end
    {
        (head_end, 0usize)
    }
    else
    {
        let probe_end = (tail_start_raw + 1024).min(len);
        let advance = memchr(b'\n', &bytes[tail_start_raw..probe_end]).map(|p| p + 1).unwrap_or(0);
        let adjusted = tail_start_raw + advance;
        (adjusted, adjusted.saturating_sub(head_end))
    };

    let head = String::from_utf8_lossy(&bytes[..head_end]).into_owned();
    let tail = String::from_utf8_lossy(&bytes[tail_start.min(len)..]).into_owned();

    if skipped > 0
    {
        let mb = skipped as f64 / (1024.0 * 1024.0);
        format!("{head}\n[...{mb:.1} MB truncated...]\n\n{tail}")
    }
    else
    {
        format!("{head}{tail}")
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn small_buffer_has_no_gap()
    {
        let content = "one\ntwo\nthree\n";
        let out = windowed_content(content.as_bytes(), 1024, 1024);
        assert_eq!(out, content);
        assert!(!out.contains("truncated"));
    }

    #[test]
    fn large_buffer_keeps_first_and_last_lines_intact()
    {
        let mut content = String::new();
        for i in 0..5000
        {
            content.push_str(&format!("line {i}\n"));
        }
        let out = windowed_content(content.as_bytes(), 1024, 1024);
        assert!(out.starts_with("line 0\n"));
        assert!(out.trim_end().ends_with("line 4999"));
        assert!(out.contains("MB truncated"));
    }

    #[test]
    fn no_partial_lines_at_the_cut()
    {
        let mut content = String::new();
        for i in 0..2000
        {
            content.push_str(&format!("line-{i:04}\n"));
        }
        let out = windowed_content(content.as_bytes(), 2048, 2048);
        for line in out.lines()
        {
            assert!(line.is_empty() || line.starts_with("line-") || line.starts_with('['));
        }
    }
}
