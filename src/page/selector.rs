//! The small CSS selector subset the page script relies on.
//!
//! Supported: type (`article`), class (`.movie-tile`), id (`#trailer`),
//! attribute presence and equality (`[data-dismiss="modal"]`), compounds of
//! those, the descendant combinator and comma separated groups.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use super::dom::{Dom, NodeId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,
    #[error("unexpected {found:?} in selector {selector:?}")]
    Unexpected { selector: String, found: char },
    #[error("unterminated attribute selector in {0:?}")]
    Unterminated(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct AttrMatch {
    name: String,
    value: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrMatch>,
}

impl Compound {
    fn matches(&self, dom: &Dom, node: NodeId) -> bool {
        let Some(el) = dom.element(node) else { return false };
        if self.tag.as_deref().is_some_and(|t| t != el.tag_name()) {
            return false;
        }
        if self.id.as_deref().is_some_and(|id| el.attr("id") != Some(id)) {
            return false;
        }
        if !self.classes.iter().all(|c| el.has_class(c)) {
            return false;
        }
        self.attrs.iter().all(|a| match (&a.value, el.attr(&a.name)) {
            (_, None) => false,
            (None, Some(_)) => true,
            (Some(want), Some(have)) => want == have,
        })
    }
}

/// Compounds joined by descendant combinators, leftmost first.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Complex(Vec<Compound>);

impl Complex {
    fn matches(&self, dom: &Dom, node: NodeId) -> bool {
        let Some((last, rest)) = self.0.split_last() else { return false };
        if !last.matches(dom, node) {
            return false;
        }
        // Nearest matching ancestor is enough with only descendant combinators
        let mut cursor = dom.parent(node);
        for compound in rest.iter().rev() {
            loop {
                let Some(n) = cursor else { return false };
                cursor = dom.parent(n);
                if compound.matches(dom, n) {
                    break;
                }
            }
        }
        true
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    group: Vec<Complex>,
    source: String,
}

impl Selector {
    fn single(compound: Compound, source: String) -> Self {
        Self { group: vec![Complex(vec![compound])], source }
    }

    pub fn class(class: &str) -> Self {
        Self::single(
            Compound { classes: vec![class.to_string()], ..Compound::default() },
            format!(".{class}"),
        )
    }

    pub fn id(id: &str) -> Self {
        Self::single(Compound { id: Some(id.to_string()), ..Compound::default() }, format!("#{id}"))
    }

    pub fn tag(tag: &str) -> Self {
        Self::single(
            Compound { tag: Some(tag.to_ascii_lowercase()), ..Compound::default() },
            tag.to_ascii_lowercase(),
        )
    }

    pub fn attr_eq(name: &str, value: &str) -> Self {
        Self::single(
            Compound {
                attrs: vec![AttrMatch { name: name.to_ascii_lowercase(), value: Some(value.to_string()) }],
                ..Compound::default()
            },
            format!("[{name}=\"{value}\"]"),
        )
    }

    /// `ancestor descendant`
    pub fn descendant(ancestor: Selector, descendant: Selector) -> Self {
        let mut group = Vec::new();
        for a in &ancestor.group {
            for d in &descendant.group {
                let mut parts = a.0.clone();
                parts.extend(d.0.iter().cloned());
                group.push(Complex(parts));
            }
        }
        Self { group, source: format!("{} {}", ancestor.source, descendant.source) }
    }

    /// `a, b, c`
    pub fn any(selectors: impl IntoIterator<Item = Selector>) -> Self {
        let mut group = Vec::new();
        let mut sources = Vec::new();
        for s in selectors {
            group.extend(s.group);
            sources.push(s.source);
        }
        Self { group, source: sources.join(", ") }
    }

    pub fn matches(&self, dom: &Dom, node: NodeId) -> bool {
        self.group.iter().any(|c| c.matches(dom, node))
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn take_ident(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut out = String::new();
    while let Some(&c) = chars.peek() {
        if !is_ident_char(c) {
            break;
        }
        out.push(c);
        chars.next();
    }
    out
}

fn parse_compound(text: &str, selector: &str) -> Result<Compound, SelectorError> {
    let unexpected = |found| SelectorError::Unexpected { selector: selector.to_string(), found };
    let mut compound = Compound::default();
    let mut chars = text.chars().peekable();

    let tag = take_ident(&mut chars);
    if !tag.is_empty() {
        compound.tag = Some(tag.to_ascii_lowercase());
    } else if chars.peek() == Some(&'*') {
        chars.next();
    }

    while let Some(c) = chars.next() {
        match c {
            '.' | '#' => {
                let ident = take_ident(&mut chars);
                if ident.is_empty() {
                    return Err(unexpected(c));
                }
                if c == '.' {
                    compound.classes.push(ident);
                } else {
                    compound.id = Some(ident);
                }
            }
            '[' => {
                let mut body = String::new();
                let mut closed = false;
                for c in chars.by_ref() {
                    if c == ']' {
                        closed = true;
                        break;
                    }
                    body.push(c);
                }
                if !closed {
                    return Err(SelectorError::Unterminated(selector.to_string()));
                }
                let (name, value) = match body.split_once('=') {
                    Some((n, v)) => (n, Some(v.trim().trim_matches(|q: char| q == '"' || q == '\'').to_string())),
                    None => (body.as_str(), None),
                };
                let name = name.trim();
                if name.is_empty() || !name.chars().all(is_ident_char) {
                    return Err(unexpected('['));
                }
                compound.attrs.push(AttrMatch { name: name.to_ascii_lowercase(), value });
            }
            other => return Err(unexpected(other)),
        }
    }
    Ok(compound)
}

impl FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut group = Vec::new();
        for part in s.split(',') {
            let compounds = part
                .split_ascii_whitespace()
                .map(|c| parse_compound(c, s))
                .collect::<Result<Vec<_>, _>>()?;
            if compounds.is_empty() {
                return Err(SelectorError::Empty);
            }
            group.push(Complex(compounds));
        }
        Ok(Self { group, source: s.trim().to_string() })
    }
}
