//! Markup templates → [`Document`].
//!
//! Understands just enough HTML for layout fixtures: nested elements,
//! quoted or bare attributes, self-closing tags and ignorable text. A
//! `style` attribute is also applied as inline declarations.

use flexout::{Document, NodeId};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::FixtureError;

static ATTRIBUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([^\s=/>"']+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+)))?"#).unwrap()
});

/// Token types produced by the tokenizer.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Token<'a> {
    Text(&'a str),
    /// `<name attrs>` or `<name attrs/>`
    Open {
        name: &'a str,
        attrs: &'a str,
        self_closing: bool,
    },
    Close(&'a str),
}

struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Tokenizer<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Result<Token<'a>, FixtureError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.input.len() {
            return None;
        }
        let remaining = &self.input[self.pos..];

        let Some(open) = remaining.find('<') else {
            self.pos = self.input.len();
            return Some(Ok(Token::Text(remaining)));
        };
        if open > 0 {
            self.pos += open;
            return Some(Ok(Token::Text(&remaining[..open])));
        }

        let Some(close) = find_tag_end(remaining) else {
            self.pos = self.input.len();
            return Some(Err(FixtureError::Template(format!(
                "unterminated tag at offset {}",
                self.pos
            ))));
        };
        self.pos += close + 1;

        let content = remaining[1..close].trim();
        if let Some(name) = content.strip_prefix('/') {
            return Some(Ok(Token::Close(name.trim())));
        }
        let (content, self_closing) = match content.strip_suffix('/') {
            Some(rest) => (rest.trim_end(), true),
            None => (content, false),
        };
        let name_end = content
            .find(|c: char| c.is_whitespace())
            .unwrap_or(content.len());
        let name = &content[..name_end];
        if name.is_empty() {
            return Some(Err(FixtureError::Template("empty tag name".to_string())));
        }
        Some(Ok(Token::Open {
            name,
            attrs: &content[name_end..],
            self_closing,
        }))
    }
}

/// Position of the `>` closing the tag at the start of `s`, skipping `>`
/// inside quoted attribute values.
fn find_tag_end(s: &str) -> Option<usize> {
    let mut quote = None;
    for (i, c) in s.char_indices() {
        match (quote, c) {
            (None, '"' | '\'') => quote = Some(c),
            (Some(q), _) if c == q => quote = None,
            (None, '>') => return Some(i),
            _ => {}
        }
    }
    None
}

fn parse_attributes(attrs: &str) -> Vec<(String, String)> {
    ATTRIBUTE
        .captures_iter(attrs)
        .map(|caps| {
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map_or("", |m| m.as_str());
            (caps[1].to_string(), value.to_string())
        })
        .collect()
}

/// Parses `template` into a fresh document. Returns the document and the
/// top-level elements, in order.
pub fn parse_template(template: &str) -> Result<(Document, Vec<NodeId>), FixtureError> {
    let mut doc = Document::new();
    let mut stack: Vec<(NodeId, String)> = Vec::new();
    let mut top = Vec::new();

    for token in Tokenizer::new(template) {
        match token? {
            Token::Text(_) => {}
            Token::Open {
                name,
                attrs,
                self_closing,
            } => {
                let node = doc.create_element(name);
                for (attr, value) in parse_attributes(attrs) {
                    if attr == "style" {
                        doc.set_inline_style(node, &value);
                    }
                    doc.set_attribute(node, &attr, &value);
                }
                match stack.last() {
                    Some((parent, _)) => doc.append_child(*parent, node),
                    None => {
                        doc.append_child(doc.root(), node);
                        top.push(node);
                    }
                }
                if !self_closing {
                    stack.push((node, name.to_string()));
                }
            }
            Token::Close(name) => match stack.pop() {
                Some((_, open)) if open == name => {}
                Some((_, open)) => {
                    return Err(FixtureError::Template(format!(
                        "expected </{}>, found </{}>",
                        open, name
                    )))
                }
                None => {
                    return Err(FixtureError::Template(format!(
                        "unexpected closing tag </{}>",
                        name
                    )))
                }
            },
        }
    }

    if let Some((_, open)) = stack.pop() {
        return Err(FixtureError::Template(format!("unclosed <{}>", open)));
    }
    Ok((doc, top))
}
