//! Filepath: src/formats/markdown.rs
//! Markdown format strategy (§4.4.1 item 2): ATX heading stack with
//! paragraphs and fenced code blocks attached to the nearest open heading.

use crate::core::truncate::truncate;
use crate::dom::Node;
use crate::formats::registry::FormatStrategy;

const PARAGRAPH_FLOOR: usize = 4;

pub struct MarkdownStrategy;

/// A heading still accumulating children, kept off the DOM until its
/// level is closed by a same-or-higher-level heading or end of input.
struct OpenNode
{
    level: usize,
    node_type: String,
    name: Option<String>,
    content: String,
    children: Vec<Node>,
}

impl OpenNode
{
    fn root() -> Self
    {
        Self { level: 0, node_type: "document".to_string(), name: Some("document".to_string()), content: String::new(), children: Vec::new() }
    }

    fn into_node(self) -> Node
    {
        let mut node = Node::new(self.content, self.node_type);
        if let Some(name) = self.name
        {
            node = node.with_name(name);
        }
        node.children = self.children;
        node
    }
}

fn close_top(stack: &mut Vec<OpenNode>)
{
    if let Some(top) = stack.pop()
    {
        let node = top.into_node();
        if let Some(parent) = stack.last_mut()
        {
            parent.children.push(node);
        }
        else
        {
            stack.push(OpenNode::root());
            stack[0].children.push(node);
        }
    }
}

fn heading_level(line: &str) -> Option<(usize, &str)>
{
    let hashes = line.chars().take_while(|c| *c == '#').count();
    if hashes == 0 || hashes > 6
    {
        return None;
    }

    let rest = &line[hashes..];
    if !(rest.starts_with(' ') || rest.starts_with('\t'))
    {
        return None;
    }

    let title = rest.trim();
    if title.is_empty()
    {
        return None;
    }

    Some((hashes, title))
}

fn is_fence(line: &str) -> bool
{
    line.trim_start().starts_with("```")
}

impl FormatStrategy for MarkdownStrategy
{
    fn name(&self) -> &'static str
    {
        "markdown"
    }

    fn extensions(&self) -> &'static [&'static str]
    {
        &[".md", ".markdown"]
    }

    fn parse(
        &self,
        content: &str,
    ) -> Node
    {
        let lines: Vec<&str> = content.split('\n').collect();
        let mut stack: Vec<OpenNode> = vec![OpenNode::root()];
        let mut paragraph: Vec<&str> = Vec::new();

        let flush_paragraph = |paragraph: &mut Vec<&str>, stack: &mut Vec<OpenNode>|
        {
            if paragraph.is_empty()
            {
                return;
            }
            let text = paragraph.join("\n");
            paragraph.clear();
            let node = Node::new(text, "paragraph");
            stack.last_mut().expect("root never popped").children.push(node);
        };

        let mut i = 0usize;
        while i < lines.len()
        {
            let line = lines[i];

            if is_fence(line)
            {
                flush_paragraph(&mut paragraph, &mut stack);
                let mut code_lines: Vec<&str> = Vec::new();
                i += 1;
                while i < lines.len() && !is_fence(lines[i])
                {
                    code_lines.push(lines[i]);
                    i += 1;
                }
                if i < lines.len()
                {
                    i += 1;
                }
                let node = Node::new(code_lines.join("\n"), "code").atomic();
                stack.last_mut().expect("root never popped").children.push(node);
                continue;
            }

            if let Some((level, title)) = heading_level(line)
            {
                flush_paragraph(&mut paragraph, &mut stack);

                while stack.len() > 1 && stack.last().expect("checked len").level >= level
                {
                    close_top(&mut stack);
                }

                stack.push(OpenNode {
                    level,
                    node_type: format!("h{level}"),
                    name: Some(title.to_string()),
                    content: line.to_string(),
                    children: Vec::new(),
                });

                i += 1;
                continue;
            }

            if line.trim().is_empty()
            {
                flush_paragraph(&mut paragraph, &mut stack);
            }
            else
            {
                paragraph.push(line);
            }

            i += 1;
        }

        flush_paragraph(&mut paragraph, &mut stack);

        while stack.len() > 1
        {
            close_top(&mut stack);
        }

        stack.pop().expect("root always present").into_node()
    }

    fn rank(
        &self,
        node: &Node,
    ) -> f64
    {
        match node.node_type.as_str()
        {
            "h1" => 0.9,
            "h2" => 0.84,
            "h3" => 0.78,
            "h4" => 0.72,
            "h5" => 0.66,
            "h6" => 0.6,
            "code" => 0.6,
            "paragraph" | "document" => 0.5,
            _ => 0.5,
        }
    }

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
        let budget = budget as usize;

        if node.content.chars().count() <= budget
        {
            return Some(node.content.clone());
        }

        match node.node_type.as_str()
        {
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" =>
            {
                let level: usize = node.node_type[1..].parse().unwrap_or(1);
                let name = node.name.as_deref().unwrap_or("");
                let bare = format!("{} {name}", "#".repeat(level));
                if bare.chars().count() <= budget
                {
                    Some(bare)
                }
                else if budget >= 4
                {
                    Some(truncate(&bare, budget, false))
                }
                else
                {
                    None
                }
            }
            "code" => None,
            "paragraph" =>
            {
                if budget < PARAGRAPH_FLOOR
                {
                    None
                }
                else
                {
                    Some(truncate(&node.content, budget, false))
                }
            }
            _ => Some(truncate(&node.content, budget, false)),
        }
    }
}
