#![forbid(unsafe_code)]

//! A small CSS selector subset.
//!
//! Supported grammar:
//!
//! ```text
//! selector := compound ( WS+ compound )*
//! compound := tag? ( '#' ident | '.' ident | '[' ident ']' )*
//! ```
//!
//! Only the descendant combinator is supported. That covers every hook the
//! page contract uses (`#nav-toggle`, `.gallery img`, `nav a`, ...). The web
//! host hands [`Selector::as_str`] straight to `querySelectorAll`; the
//! in-memory DOM matches with [`Selector::matches`].

use core::fmt;

/// Selector parse error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorError {
    /// The input was empty or whitespace only.
    Empty,
    /// A character outside the supported grammar.
    UnexpectedChar { ch: char, offset: usize },
    /// `#`, `.` or `[` not followed by an identifier.
    MissingIdent { offset: usize },
    /// `[` without a matching `]`.
    UnclosedAttribute { offset: usize },
}

impl fmt::Display for SelectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty selector"),
            Self::UnexpectedChar { ch, offset } => {
                write!(f, "unexpected character {ch:?} at offset {offset}")
            }
            Self::MissingIdent { offset } => write!(f, "expected identifier at offset {offset}"),
            Self::UnclosedAttribute { offset } => {
                write!(f, "unclosed attribute selector at offset {offset}")
            }
        }
    }
}

impl std::error::Error for SelectorError {}

/// Element view used for matching.
pub trait SelectorTarget: Sized {
    /// Lowercase tag name.
    fn tag_name(&self) -> &str;
    fn attribute(&self, name: &str) -> Option<&str>;
    fn has_class(&self, class: &str) -> bool;
    fn parent(&self) -> Option<Self>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attributes: Vec<String>,
}

impl Compound {
    fn matches<T: SelectorTarget>(&self, el: &T) -> bool {
        if let Some(tag) = &self.tag
            && !el.tag_name().eq_ignore_ascii_case(tag)
        {
            return false;
        }
        if let Some(id) = &self.id
            && el.attribute("id") != Some(id.as_str())
        {
            return false;
        }
        self.classes.iter().all(|c| el.has_class(c))
            && self.attributes.iter().all(|a| el.attribute(a).is_some())
    }
}

/// A parsed selector. Keeps its source text for hosts with a native engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    source: String,
    compounds: Vec<Compound>,
}

impl Selector {
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        let mut compounds = Vec::new();
        let mut chars = input.char_indices().peekable();
        let mut current: Option<Compound> = None;

        while let Some(&(offset, ch)) = chars.peek() {
            match ch {
                c if c.is_whitespace() => {
                    chars.next();
                    if let Some(done) = current.take() {
                        compounds.push(done);
                    }
                }
                '#' | '.' => {
                    chars.next();
                    let ident = take_ident(&mut chars);
                    if ident.is_empty() {
                        return Err(SelectorError::MissingIdent { offset: offset + 1 });
                    }
                    let compound = current.get_or_insert_with(Compound::default);
                    if ch == '#' {
                        compound.id = Some(ident);
                    } else {
                        compound.classes.push(ident);
                    }
                }
                '[' => {
                    chars.next();
                    let ident = take_ident(&mut chars);
                    if ident.is_empty() {
                        return Err(SelectorError::MissingIdent { offset: offset + 1 });
                    }
                    match chars.next() {
                        Some((_, ']')) => {}
                        Some((at, other)) => {
                            return Err(SelectorError::UnexpectedChar { ch: other, offset: at });
                        }
                        None => return Err(SelectorError::UnclosedAttribute { offset }),
                    }
                    current
                        .get_or_insert_with(Compound::default)
                        .attributes
                        .push(ident);
                }
                c if is_ident_char(c) => {
                    if current.is_some() {
                        // Tag names only lead a compound (`a.x`, never `.x a` glued).
                        return Err(SelectorError::UnexpectedChar { ch: c, offset });
                    }
                    let tag = take_ident(&mut chars).to_ascii_lowercase();
                    current = Some(Compound {
                        tag: Some(tag),
                        ..Compound::default()
                    });
                }
                other => return Err(SelectorError::UnexpectedChar { ch: other, offset }),
            }
        }
        if let Some(done) = current.take() {
            compounds.push(done);
        }
        if compounds.is_empty() {
            return Err(SelectorError::Empty);
        }

        Ok(Self {
            source: input.trim().to_string(),
            compounds,
        })
    }

    /// Source text, suitable for `querySelector`/`querySelectorAll`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Match `el` against the selector, walking ancestors for descendant parts.
    #[must_use]
    pub fn matches<T: SelectorTarget>(&self, el: &T) -> bool {
        let Some((last, rest)) = self.compounds.split_last() else {
            return false;
        };
        if !last.matches(el) {
            return false;
        }

        let mut remaining = rest.iter().rev().peekable();
        let mut ancestor = el.parent();
        while let Some(wanted) = remaining.peek() {
            let Some(node) = ancestor else {
                return false;
            };
            if wanted.matches(&node) {
                remaining.next();
            }
            ancestor = node.parent();
        }
        true
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl core::str::FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn take_ident(chars: &mut core::iter::Peekable<core::str::CharIndices<'_>>) -> String {
    let mut ident = String::new();
    while let Some(&(_, c)) = chars.peek() {
        if !is_ident_char(c) {
            break;
        }
        ident.push(c);
        chars.next();
    }
    ident
}
