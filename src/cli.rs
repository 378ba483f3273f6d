//! Filepath: src/cli.rs
//! Command-line orchestration (§6): argument parsing, shape/range
//! resolution, the structured-format pre-pass skip, dispatch into the
//! standard or custom-separator compression path, dedup, and the
//! output limiter. This module is the thin collaborator described in
//! §1 as out of core scope; it only hands shapes to and from the core.

use std::path::{Path, PathBuf};

use clap::Parser;

use crate::config::load_config;
use crate::core::compressor::{compress, CompressOptions, OutputLine};
use crate::core::dedupe::deduplicate_3grams;
use crate::core::limiter::{apply_output_limit, LimiterAdvisory};
use crate::core::scorer::{compile_pattern, importance_score, Weights};
use crate::core::truncate::truncate;
use crate::error::{AppError, Result};
use crate::formats::folder::FolderStrategy;
use crate::formats::registry::{build_default_registry, FormatStrategy};
use crate::formats::text::CustomSeparatorStrategy;
use crate::infra::reader::read_input;
use crate::infra::wrap::{add_line_numbers, extract_fractional_range, extract_integer_range, format_with_line_numbers, wrap_content};

const STRUCTURED_EXTENSIONS: &[&str] = &[".py", ".pyw", ".json", ".yaml", ".yml", ".toml"];
const DEFAULT_SHAPE: &str = "120:100";
const DEFAULT_LIMIT: usize = 10_000;

#[derive(Parser, Debug)]
#[command(name = "precis", about = "Compress a textual artifact into a bounded, human-scannable summary")]
pub struct Args
{
    /// Input file or directory. Reads stdin when omitted.
    pub file: Option<PathBuf>,

    /// Character budget as WIDTH:HEIGHT.
    #[arg(long, default_value = DEFAULT_SHAPE)]
    pub shape: String,

    /// Pre-wrap long lines at N columns before numbering/ranging.
    #[arg(long)]
    pub wrap: Option<usize>,

    /// Select lines whose address falls in A:B.
    #[arg(long)]
    pub range: Option<String>,

    /// Relevance pattern boosting matching nodes.
    #[arg(long)]
    pub grep: Option<String>,

    /// Chunk on a literal separator instead of newlines.
    #[arg(long)]
    pub separator: Option<String>,

    /// Chunk on a regex separator instead of newlines.
    #[arg(long = "separator-regex")]
    pub separator_regex: Option<String>,

    /// Suppress the "N: " line-number prefix.
    #[arg(long = "no-line-numbers")]
    pub no_line_numbers: bool,

    /// Apply the 3-gram deduplicator.
    #[arg(long)]
    pub deduplicate: bool,

    /// Output character ceiling (0 disables).
    #[arg(long, default_value_t = DEFAULT_LIMIT)]
    pub limit: usize,

    /// Force a format strategy by name or extension.
    #[arg(long = "type")]
    pub format_type: Option<String>,

    /// Run the external file profiler instead of compressing.
    #[arg(long)]
    pub profile: bool,

    /// Legacy: derive a square shape W=H=floor(sqrt(N)).
    #[arg(long, hide = true)]
    pub target: Option<usize>,

    /// Legacy: override the configured softmax temperature for this call.
    #[arg(long, hide = true)]
    pub temperature: Option<f64>,

    /// Increase log verbosity (stderr only, repeatable).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all but error-level logging.
    #[arg(short, long)]
    pub quiet: bool,
}

/// Run the whole CLI pipeline and return the final string to print.
/// User-input problems map to `AppError`; everything else is absorbed
/// per §7 and never reaches this boundary.
pub fn run(args: &Args) -> Result<String>
{
    if args.profile
    {
        let path = args.file.as_ref().ok_or(AppError::ProfileWithoutPath)?;
        return run_profile(path);
    }

    let (width, height) = resolve_shape(args)?;
    let range = args.range.as_deref().map(parse_range).transpose()?;

    let cfg = load_config();
    let read = read_input(args.file.as_deref(), cfg.io.max_file_size, cfg.io.head_bytes, cfg.io.tail_bytes)
        .map_err(|source| read_error(args.file.clone(), source))?;

    if read.is_directory
    {
        let path = args.file.as_ref().expect("is_directory implies a path was given");
        return compress_folder(path, width, height, args.limit);
    }

    let is_separator_mode = args.separator.is_some() || args.separator_regex.is_some();
    let filename = args.file.as_ref().and_then(|p| p.file_name()).map(|n| n.to_string_lossy().into_owned());
    let is_structured = is_structured_format(filename.as_deref(), args.format_type.as_deref());
    let line_numbers = !args.no_line_numbers;
    let pre_pass_applies = !is_separator_mode && !is_structured;

    let mut content = read.content;

    if pre_pass_applies
    {
        content = match args.wrap
        {
            Some(w) if w > 0 => wrap_content(&content, w, line_numbers),
            _ if line_numbers => add_line_numbers(&content),
            _ => content,
        };
    }

    if let Some((start, end)) = range
    {
        content = if pre_pass_applies
        {
            extract_fractional_range(&content, start, end)
        }
        else
        {
            extract_integer_range(&content, start.max(1.0) as usize, end as usize).unwrap_or_default()
        };
    }

    let use_source_lines = is_structured && line_numbers;

    let weights = Weights::from_config();
    let pattern = args.grep.as_deref().and_then(compile_pattern);
    let temperature = args.temperature.unwrap_or(cfg.compression.temperature);

    let output_lines = if is_separator_mode
    {
        let strategy = CustomSeparatorStrategy::new(args.separator.clone(), args.separator_regex.clone());
        compress_separator_mode(&content, &strategy, width, height, pattern.as_ref(), weights)
    }
    else
    {
        let registry = build_default_registry();
        let resolved = registry.resolve(&content, filename.as_deref(), args.format_type.as_deref());
        let root = resolved.strategy.parse(&content);

        let content_budget = std::cmp::max(1, (width * height) as i64 - height.saturating_sub(1) as i64);
        let opts = CompressOptions { pattern: pattern.as_ref(), weights, temperature, min_line_chars: cfg.compression.min_line_chars };
        compress(&root, content_budget, resolved.strategy, &opts)
    };

    let mut output = if use_source_lines
    {
        format_with_line_numbers(&output_lines)
    }
    else
    {
        output_lines.iter().map(|l| l.content.as_str()).collect::<Vec<_>>().join("\n")
    };

    if args.deduplicate || cfg.compression.deduplicate
    {
        let lines: Vec<String> = output.split('\n').map(str::to_string).collect();
        output = deduplicate_3grams(&lines).join("\n");
    }

    let shape_label = format!("{width}:{height}");
    let advisory = LimiterAdvisory { shape: &shape_label, range: args.range.as_deref(), limit: args.limit };
    Ok(apply_output_limit(&output, args.limit, &advisory))
}

fn compress_separator_mode(
    content: &str,
    strategy: &CustomSeparatorStrategy,
    width: usize,
    height: usize,
    pattern: Option<&regex::Regex>,
    weights: Weights,
) -> Vec<OutputLine>
{
    let root = strategy.parse(content);
    let n = root.children.len();

    let scored: Vec<(usize, f64)> = root
        .children
        .iter()
        .enumerate()
        .map(|(i, child)| (i, importance_score(child, i, n, strategy.rank(child), pattern, weights)))
        .collect();

    let mut by_score = scored;
    by_score.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    let mut chosen: Vec<usize> = by_score.into_iter().take(height).map(|(i, _)| i).collect();
    chosen.sort_unstable();

    chosen
        .into_iter()
        .map(|i| {
            let child = &root.children[i];
            let flattened = flatten_chunk(&child.content);
            OutputLine { content: truncate(&flattened, width, false), source_line: child.source_line }
        })
        .collect()
}

/// Collapse a chunk's embedded newlines to spaces so it becomes exactly
/// one output line, the way the custom-separator mode's ground truth does
/// before truncating to `width`.
fn flatten_chunk(content: &str) -> String
{
    content.trim().split('\n').map(str::trim).filter(|line| !line.is_empty()).collect::<Vec<_>>().join(" ")
}

fn compress_folder(
    path: &Path,
    width: usize,
    height: usize,
    limit: usize,
) -> Result<String>
{
    let root = FolderStrategy::parse_directory(path).map_err(|source| read_error(Some(path.to_path_buf()), source))?;
    let strategy = FolderStrategy;
    let cfg = load_config();
    let content_budget = std::cmp::max(1, (width * height) as i64 - height.saturating_sub(1) as i64);
    let opts = CompressOptions { pattern: None, weights: Weights::from_config(), temperature: cfg.compression.temperature, min_line_chars: cfg.compression.min_line_chars };
    let lines = compress(&root, content_budget, &strategy, &opts);
    let output = lines.iter().map(|l| l.content.as_str()).collect::<Vec<_>>().join("\n");

    let shape_label = format!("{width}:{height}");
    let advisory = LimiterAdvisory { shape: &shape_label, range: None, limit };
    Ok(apply_output_limit(&output, limit, &advisory))
}

fn is_structured_format(
    filename: Option<&str>,
    forced: Option<&str>,
) -> bool
{
    if let Some(forced) = forced
    {
        let lower = forced.to_lowercase();
        if lower == "python" || STRUCTURED_EXTENSIONS.iter().any(|e| lower == e[1..])
        {
            return true;
        }
    }

    let Some(name) = filename
    else
    {
        return false;
    };

    let lower = name.to_lowercase();
    STRUCTURED_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

fn resolve_shape(args: &Args) -> Result<(usize, usize)>
{
    if let Some(target) = args.target
    {
        let side = (target as f64).sqrt().floor() as usize;
        return Ok((side.max(1), side.max(1)));
    }

    parse_shape(&args.shape)
}

fn parse_shape(raw: &str) -> Result<(usize, usize)>
{
    let (w, h) = raw.split_once(':').ok_or_else(|| AppError::InvalidShape { raw: raw.to_string() })?;
    let width: usize = w.parse().map_err(|_| AppError::InvalidShape { raw: raw.to_string() })?;
    let height: usize = h.parse().map_err(|_| AppError::InvalidShape { raw: raw.to_string() })?;

    if width == 0 || height == 0
    {
        return Err(AppError::InvalidShape { raw: raw.to_string() });
    }

    Ok((width, height))
}

fn parse_range(raw: &str) -> Result<(f64, f64)>
{
    let (a, b) = raw.split_once(':').ok_or_else(|| AppError::InvalidRange { raw: raw.to_string() })?;
    let start: f64 = a.parse().map_err(|_| AppError::InvalidRange { raw: raw.to_string() })?;
    let end: f64 = b.parse().map_err(|_| AppError::InvalidRange { raw: raw.to_string() })?;

    if start > end
    {
        return Err(AppError::InvalidRange { raw: raw.to_string() });
    }

    Ok((start, end))
}

fn read_error(
    path: Option<PathBuf>,
    source: std::io::Error,
) -> AppError
{
    match path
    {
        Some(path) if source.kind() == std::io::ErrorKind::NotFound => AppError::PathNotFound { path },
        Some(path) => AppError::ReadFailed { path, source },
        None => AppError::ReadFailed { path: PathBuf::from("<stdin>"), source },
    }
}

/// Minimal external-collaborator profiler: report size, line count, and
/// resolved extension for `path` instead of running compression (§6).
fn run_profile(path: &Path) -> Result<String>
{
    let meta = std::fs::metadata(path).map_err(|source| read_error(Some(path.to_path_buf()), source))?;
    let content = std::fs::read_to_string(path).unwrap_or_default();
    let line_count = content.split('\n').count();
    let ext = path.extension().map(|e| e.to_string_lossy().into_owned()).unwrap_or_else(|| "(none)".to_string());

    Ok(format!(
        "profile: {}\n  size: {} bytes\n  lines: {line_count}\n  extension: {ext}",
        path.display(),
        meta.len(),
    ))
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn parse_shape_accepts_wxh()
    {
        assert_eq!(parse_shape("120:100").unwrap(), (120, 100));
    }

    #[test]
    fn parse_shape_rejects_zero()
    {
        assert!(parse_shape("0:10").is_err());
    }

    #[test]
    fn parse_shape_rejects_garbage()
    {
        assert!(parse_shape("abc").is_err());
    }

    #[test]
    fn parse_range_rejects_inverted_bounds()
    {
        assert!(parse_range("5:1").is_err());
    }

    #[test]
    fn structured_detection_covers_python_and_forward_looking_extensions()
    {
        assert!(is_structured_format(Some("mod.py"), None));
        assert!(is_structured_format(Some("data.yaml"), None));
        assert!(!is_structured_format(Some("notes.txt"), None));
    }

    #[test]
    fn target_legacy_flag_derives_square_shape()
    {
        let args = Args {
            file: None,
            shape: DEFAULT_SHAPE.to_string(),
            wrap: None,
            range: None,
            grep: None,
            separator: None,
            separator_regex: None,
            no_line_numbers: false,
            deduplicate: false,
            limit: DEFAULT_LIMIT,
            format_type: None,
            profile: false,
            target: Some(100),
            temperature: None,
            verbose: 0,
            quiet: false,
        };
        assert_eq!(resolve_shape(&args).unwrap(), (10, 10));
    }
}
