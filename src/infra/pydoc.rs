//! Filepath: src/infra/pydoc.rs
//! PEP 257 docstring extraction shared by the Python format strategy.

use tree_sitter::Node;

pub struct PyDocUtils;

impl PyDocUtils
{
    /// Extract a PEP 257 docstring from a function, class, or module
    /// node, given that node's first statement may be a string literal.
    pub fn docstring_for(
        node: Node,
        bytes: &[u8],
    ) -> Option<String>
    {
        let body = node.child_by_field_name("body").unwrap_or(node);

        let suite = match body.kind()
        {
            "block" =>
            {
                Some(body)
            }
            _ => (0..body.child_count()).filter_map(|i| body.child(i)).find(|n| n.kind() == "block"),
        }?;

        let first = (0..suite.named_child_count())
            .filter_map(|i| suite.named_child(i))
            .find(|n| n.kind() == "expression_statement")?;

        let lit = first.named_child(0).filter(|n| n.kind() == "string")?;

        let raw = lit.utf8_text(bytes).ok()?;
        Some(Self::unquote_and_dedent(raw))
    }

    /// Strip any `r`/`u`/`f`/`b` string prefix, remove quotes, and dedent.
    pub fn unquote_and_dedent(s: &str) -> String
    {
        let up: String = s.chars().take(2).collect::<String>().to_uppercase();
        let first = up.chars().next();
        let second = up.chars().nth(1);
        let is_legal = |c: Option<char>| matches!(c, Some('R' | 'U' | 'F' | 'B'));

        let prefix_len = if is_legal(first) && is_legal(second)
        {
            2
        }
        else if is_legal(first)
        {
            1
        }
        else
        {
            0
        };

        let s = &s[prefix_len..];

        for q in [r#"""""#, r#"'''"#]
        {
            if s.starts_with(q) && s.ends_with(q) && s.len() >= 2 * q.len()
            {
                let inner = &s[q.len()..s.len() - q.len()];
                return Self::dedent(inner);
            }
        }

        if (s.starts_with('"') && s.ends_with('"')) || (s.starts_with('\'') && s.ends_with('\''))
        {
            let inner = &s[1..s.len() - 1];
            return inner.replace("\\n", "\n").replace("\\t", "\t").replace("\\\"", "\"").replace("\\'", "'");
        }

        s.to_string()
    }

    /// Remove the common leading-space indent shared by all non-empty lines.
    pub fn dedent(s: &str) -> String
    {
        let lines: Vec<&str> = s.lines().collect();

        let indent = lines
            .iter()
            .filter(|l| !l.trim().is_empty())
            .map(|l| l.chars().take_while(|c| *c == ' ').count())
            .min()
            .unwrap_or(0);

        lines
            .iter()
            .map(|l| if l.len() >= indent { &l[indent..] } else { *l })
            .collect::<Vec<&str>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn unquote_triple_double()
    {
        let out = PyDocUtils::unquote_and_dedent(r#""""Line1
Line2""""#);
        assert!(out.contains("Line1"));
        assert!(out.contains("Line2"));
    }

    #[test]
    fn unquote_single_quoted()
    {
        assert_eq!(PyDocUtils::unquote_and_dedent("'one line'"), "one line");
    }

    #[test]
    fn unquote_strips_raw_prefix()
    {
        assert_eq!(PyDocUtils::unquote_and_dedent(r#"r"raw text""#), "raw text");
    }

    #[test]
    fn dedent_removes_common_indent()
    {
        let out = PyDocUtils::dedent("    a\n    b\n      c");
        assert_eq!(out, "a\nb\n  c");
    }
}
