//! Filepath: src/formats/text.rs
//! Plain-text sectioner (§4.4.1 item 4, the universal fallback) and the
//! custom-separator chunker (§4.4.1 item 5, selected only by explicit flag).

use regex::RegexBuilder;

use crate::config::load_config;
use crate::dom::Node;
use crate::formats::registry::FormatStrategy;

pub struct TextStrategy;

impl FormatStrategy for TextStrategy
{
    fn name(&self) -> &'static str
    {
        "text"
    }

    fn extensions(&self) -> &'static [&'static str]
    {
        &[".txt", ".text", ".log"]
    }

    fn parse(
        &self,
        content: &str,
    ) -> Node
    {
        let mut root = Node::new("", "document").with_name("document");
        let lines: Vec<&str> = content.split('\n').collect();

        let mut idx = 0usize;
        let mut line_no = 0usize;

        while line_no < lines.len()
        {
            while line_no < lines.len() && lines[line_no].trim().is_empty()
            {
                line_no += 1;
            }
            if line_no >= lines.len()
            {
                break;
            }

            let first = line_no + 1;
            let mut section = Node::new("", "section");

            while line_no < lines.len() && !lines[line_no].trim().is_empty()
            {
                let n = line_no + 1;
                section.add_child(Node::new(lines[line_no], "line").with_name(format!("L{n}")).with_source_line(n));
                line_no += 1;
            }

            let last = line_no;
            idx += 1;
            section.name = Some(format!("S{idx}:L{first}-{last}"));
            root.add_child(section);
        }

        root
    }

    fn rank(
        &self,
        node: &Node,
    ) -> f64
    {
        let cfg = load_config();
        match node.node_type.as_str()
        {
            "section" => cfg.text.section_score,
            "line" => cfg.text.line_score,
            _ => 0.5,
        }
    }
}

pub struct CustomSeparatorStrategy
{
    pub separator: Option<String>,
    pub separator_regex: Option<String>,
}

impl CustomSeparatorStrategy
{
    #[must_use]
    pub fn new(
        separator: Option<String>,
        separator_regex: Option<String>,
    ) -> Self
    {
        Self { separator, separator_regex }
    }
}

impl FormatStrategy for CustomSeparatorStrategy
{
    fn name(&self) -> &'static str
    {
        "text-custom"
    }

    fn parse(
        &self,
        content: &str,
    ) -> Node
    {
        let mut root = Node::new("", "document").with_name("document");

        let (pieces, is_fallback) = split_content(content, self.separator_regex.as_deref(), self.separator.as_deref());

        let mut idx = 0usize;
        for piece in pieces
        {
            if piece.trim().is_empty()
            {
                continue;
            }
            idx += 1;
            let node_type = if is_fallback { "chunk_fallback" } else { "chunk" };
            root.add_child(Node::new(piece, node_type).with_name(format!("C{idx}")));
        }

        root
    }

    fn rank(
        &self,
        node: &Node,
    ) -> f64
    {
        let cfg = load_config();
        match node.node_type.as_str()
        {
            "chunk" => cfg.text.section_score,
            "chunk_fallback" => cfg.text.line_score,
            _ => 0.5,
        }
    }
}

/// Returns the split pieces plus whether the plain-newline fallback fired.
fn split_content<'a>(
    content: &'a str,
    separator_regex: Option<&str>,
    separator: Option<&str>,
) -> (Vec<&'a str>, bool)
{
    if let Some(pattern) = separator_regex
    {
        if let Ok(re) = RegexBuilder::new(pattern).multi_line(true).build()
        {
            return (re.split(content).collect(), false);
        }
    }

    if let Some(sep) = separator
    {
        if !sep.is_empty()
        {
            return (content.split(sep).collect(), false);
        }
    }

    (content.split('\n').collect(), true)
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn text_strategy_splits_blank_line_sections()
    {
        let strategy = TextStrategy;
        let root = strategy.parse("a\nb\n\nc\n");
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.children[0].name.as_deref(), Some("S1:L1-2"));
        assert_eq!(root.children[0].children.len(), 2);
        assert_eq!(root.children[1].name.as_deref(), Some("S2:L4-4"));
    }

    #[test]
    fn custom_separator_splits_on_literal()
    {
        let strategy = CustomSeparatorStrategy::new(Some("---".to_string()), None);
        let root = strategy.parse("one---two---three");
        assert_eq!(root.children.len(), 3);
        assert_eq!(root.children[0].node_type, "chunk");
    }

    #[test]
    fn custom_separator_prefers_regex_when_valid() {
        let strategy = CustomSeparatorStrategy::new(Some("x".to_string()), Some(r"\d+".to_string()));
        let root = strategy.parse("a1b22c333d");
        assert_eq!(root.children.len(), 4);
    }

    #[test]
    fn custom_separator_falls_back_to_newlines_on_bad_regex_and_no_literal()
    {
        let strategy = CustomSeparatorStrategy::new(None, Some("(".to_string()));
        let root = strategy.parse("a\nb\nc");
        assert_eq!(root.children.len(), 3);
        assert_eq!(root.children[0].node_type, "chunk_fallback");
    }

    #[test]
    fn custom_separator_drops_blank_chunks()
    {
        let strategy = CustomSeparatorStrategy::new(Some(",".to_string()), None);
        let root = strategy.parse("a,,b");
        assert_eq!(root.children.len(), 2);
    }
}
