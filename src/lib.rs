//! **precis** — a pipe-friendly CLI compressor that takes a large
//! textual artifact (source file, log, markdown document, directory
//! tree) and produces a bounded-size, human-scannable summary sized to
//! a caller-specified width×height shape.
//!
//! The core pipeline: a format-agnostic document tree ([`dom`]), an
//! importance scorer blending position/relevance/topology
//! ([`core::scorer`]), a temperature-controlled budget allocator
//! ([`core::allocator`]), and a recursive compressor that routes budget
//! through the tree and asks each format's level-of-detail renderer for
//! the best representation that fits ([`core::compressor`]).

/// Document tree shared by every format strategy.
pub mod dom;
pub use dom::{Link, Node};

/// Typed errors for the user-input boundary (§7).
pub mod error;
pub use error::{AppError, Result};

/// Layered configuration: defaults < file < environment < flags.
pub mod config;
pub use config::{load_config, reset_config, Config};

/// Command-line orchestration: argument parsing and pipeline dispatch.
pub mod cli;

/// The compression pipeline: scoring, allocation, recursion, dedup, limiting.
pub mod core
{
    /// Importance scoring: positional + relevance + topology.
    pub mod scorer;
    pub use scorer::{compile_pattern, grep_score, importance_score, node_contains_match, positional_score, Weights};

    /// Middle-out truncation with human-readable gap markers.
    pub mod truncate;
    pub use truncate::truncate;

    /// Temperature-controlled softmax budget allocation.
    pub mod allocator;
    pub use allocator::{
        select_lines_by_ucurve, softmax_allocate, softmax_allocate_with_redistribution, AllocInput, UcurveSelection,
    };

    /// The recursive hierarchical compressor.
    pub mod compressor;
    pub use compressor::{compress, CompressOptions, OutputLine};

    /// 3-gram unicity filter over the final output.
    pub mod dedupe;
    pub use dedupe::deduplicate_3grams;

    /// Final character-budget safety net with an advisory block.
    pub mod limiter;
    pub use limiter::{apply_output_limit, LimiterAdvisory};
}

/// Format strategies: parse raw content into a DOM, rank its node
/// types, and render a level-of-detail representation at a leaf.
pub mod formats
{
    /// The strategy capability trait and the resolving registry.
    pub mod registry;
    pub use registry::{build_default_registry, FormatMatch, FormatRegistry, FormatStrategy};

    /// Filesystem directory walker.
    pub mod folder;
    pub use folder::FolderStrategy;

    /// ATX-heading nested tree with paragraphs and fenced code.
    pub mod markdown;
    pub use markdown::MarkdownStrategy;

    /// `[N]`-marker node splitter, content-detected.
    pub mod mindmap;
    pub use mindmap::MindMapStrategy;

    /// Tree-sitter-backed Python module/class/function signatures.
    pub mod python;
    pub use python::PythonStrategy;

    /// Blank-line sectioner (universal fallback) and the
    /// flag-selected custom-separator chunker.
    pub mod text;
    pub use text::{CustomSeparatorStrategy, TextStrategy};
}

/// Collaborators at the edge of the core: large-file windowing, the
/// wrap/range/line-number pre-pass, and Python docstring extraction.
pub mod infra
{
    /// Large-file head+tail reader aligned to line boundaries.
    pub mod reader;
    pub use reader::{read_input, ReadResult};

    /// Pre-wrap, address-based range selection, and line numbering.
    pub mod wrap;
    pub use wrap::{add_line_numbers, extract_fractional_range, extract_integer_range, format_with_line_numbers, wrap_content};

    /// PEP 257 docstring extraction shared by the Python strategy.
    pub mod pydoc;
    pub use pydoc::PyDocUtils;
}
