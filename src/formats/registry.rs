//! Filepath: src/formats/registry.rs
//! Format-strategy capability trait and the registry that resolves one
//! from a file extension, sniffed content, or an explicit override (§4.4).

use std::collections::HashMap;
use std::path::Path;

use crate::core::truncate::truncate;
use crate::dom::Node;

/// A format strategy: parse raw content into a DOM, score its node
/// types, and render a level-of-detail representation at a leaf.
///
/// Implementors are distinct value types, not subclasses of one another;
/// the compressor only ever depends on this trait.
pub trait FormatStrategy: Send + Sync
{
    /// Stable identifier, e.g. `"python"`.
    fn name(&self) -> &'static str;

    /// File extensions this strategy claims, each including the leading
    /// dot. Empty for content-detected or explicitly-selected formats.
    fn extensions(&self) -> &'static [&'static str]
    {
        &[]
    }

    /// Magic detection over raw content. Default: never matches.
    fn detect(
        &self,
        _content: &str,
    ) -> bool
    {
        false
    }

    /// Parse content into a root DOM. Must never panic on malformed
    /// input; degrade to a single text child instead (§7 parse policy).
    fn parse(
        &self,
        content: &str,
    ) -> Node;

    /// Topology score in `[0, 1]` for a node, keyed by its type.
    fn rank(
        &self,
        _node: &Node,
    ) -> f64
    {
        0.5
    }

    /// Best representation of `node` that fits in `budget` characters,
    /// or `None` to signal fold. The default middle-out truncates the
    /// raw content (§4.5 "Default renderer").
    fn render(
        &self,
        node: &Node,
        budget: i64,
    ) -> Option<String>
    {
        if budget <= 0
        {
            return None;
        }

        Some(truncate(&node.content, budget as usize, node.atomic))
    }
}

pub struct FormatMatch<'a>
{
    pub strategy: &'a dyn FormatStrategy,
    pub confidence: f64,
}

/// Owns every registered strategy and resolves lookups by name,
/// extension, or content sniff. Registration order decides extension
/// conflicts (first wins) and `detect()` scan order.
pub struct FormatRegistry
{
    strategies: Vec<Box<dyn FormatStrategy>>,
    by_extension: HashMap<String, usize>,
    by_name: HashMap<String, usize>,
}

impl FormatRegistry
{
    #[must_use]
    pub fn new() -> Self
    {
        Self { strategies: Vec::new(), by_extension: HashMap::new(), by_name: HashMap::new() }
    }

    pub fn register(
        &mut self,
        strategy: Box<dyn FormatStrategy>,
    )
    {
        let idx = self.strategies.len();
        self.by_name.insert(strategy.name().to_string(), idx);

        for ext in strategy.extensions()
        {
            self.by_extension.entry(normalize_ext(ext)).or_insert(idx);
        }

        self.strategies.push(strategy);
    }

    #[must_use]
    pub fn get_by_name(
        &self,
        name: &str,
    ) -> Option<&dyn FormatStrategy>
    {
        self.by_name.get(name).map(|&i| self.strategies[i].as_ref())
    }

    #[must_use]
    pub fn get_by_extension(
        &self,
        ext: &str,
    ) -> Option<&dyn FormatStrategy>
    {
        self.by_extension.get(&normalize_ext(ext)).map(|&i| self.strategies[i].as_ref())
    }

    /// Resolve a strategy for `content`, optionally named by `filename`.
    /// `force_type` (name or bare extension) wins outright; an unknown
    /// value falls through to the rest of this ladder rather than erroring.
    #[must_use]
    pub fn resolve(
        &self,
        content: &str,
        filename: Option<&str>,
        force_type: Option<&str>,
    ) -> FormatMatch<'_>
    {
        if let Some(forced) = force_type
        {
            if let Some(strategy) = self.get_by_name(forced).or_else(|| self.get_by_extension(forced))
            {
                return FormatMatch { strategy, confidence: 1.0 };
            }
        }

        if let Some(name) = filename
        {
            if let Some(ext) = extension_of(name)
            {
                if let Some(strategy) = self.get_by_extension(&ext)
                {
                    return FormatMatch { strategy, confidence: 1.0 };
                }
            }
        }

        for strategy in &self.strategies
        {
            if strategy.detect(content)
            {
                return FormatMatch { strategy: strategy.as_ref(), confidence: 0.8 };
            }
        }

        let text = self.get_by_name("text").expect("text strategy is always registered");
        FormatMatch { strategy: text, confidence: 0.1 }
    }
}

impl Default for FormatRegistry
{
    fn default() -> Self
    {
        Self::new()
    }
}

fn normalize_ext(ext: &str) -> String
{
    let dotted = if ext.starts_with('.') { ext.to_string() } else { format!(".{ext}") };
    dotted.to_lowercase()
}

fn extension_of(filename: &str) -> Option<String>
{
    let ext = Path::new(filename).extension()?;
    Some(format!(".{}", ext.to_string_lossy().to_lowercase()))
}

/// Build the registry with every in-scope strategy, in the order the
/// design fixes for extension-conflict and `detect()`-scan resolution.
#[must_use]
pub fn build_default_registry() -> FormatRegistry
{
    let mut registry = FormatRegistry::new();
    registry.register(Box::new(crate::formats::folder::FolderStrategy));
    registry.register(Box::new(crate::formats::markdown::MarkdownStrategy));
    registry.register(Box::new(
        crate::formats::python::PythonStrategy::new().expect("python grammar query must compile"),
    ));
    registry.register(Box::new(crate::formats::text::TextStrategy));
    registry.register(Box::new(crate::formats::mindmap::MindMapStrategy));
    registry
}

#[cfg(test)]
mod tests
{
    use super::*;

    struct Stub(&'static str, &'static [&'static str]);

    impl FormatStrategy for Stub
    {
        fn name(&self) -> &'static str
        {
            self.0
        }

        fn extensions(&self) -> &'static [&'static str]
        {
            self.1
        }

        fn parse(
            &self,
            content: &str,
        ) -> Node
        {
            Node::new(content, "document")
        }
    }

    #[test]
    fn first_registered_wins_extension_conflicts()
    {
        let mut registry = FormatRegistry::new();
        registry.register(Box::new(Stub("first", &[".txt"])));
        registry.register(Box::new(Stub("second", &[".txt"])));
        assert_eq!(registry.get_by_extension(".txt").unwrap().name(), "first");
    }

    #[test]
    fn resolve_falls_back_to_text_when_nothing_matches()
    {
        let registry = build_default_registry();
        let m = registry.resolve("just some prose", Some("file.unknownext"), None);
        assert_eq!(m.strategy.name(), "text");
    }

    #[test]
    fn resolve_honors_force_type()
    {
        let registry = build_default_registry();
        let m = registry.resolve("# heading", Some("file.py"), Some("markdown"));
        assert_eq!(m.strategy.name(), "markdown");
    }

    #[test]
    fn unknown_force_type_falls_through_instead_of_erroring()
    {
        let registry = build_default_registry();
        let m = registry.resolve("prose", Some("file.md"), Some("json"));
        assert_eq!(m.strategy.name(), "markdown");
    }
}
