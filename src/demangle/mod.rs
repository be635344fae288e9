//! GNU (Itanium) demangling for symbol names recovered from the table.
//!
//! VxWorks images built with the GNU toolchain carry C++ names in mangled
//! form. Some of them were stored without the `_Z` prefix, so bodies that
//! look mangled are retried with it.

use serde::{Deserialize, Serialize};

/// A demangled signature split into its parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    /// Text before the name, e.g. `int` for templates with explicit returns
    pub return_type: Option<String>,
    /// Qualified name, e.g. `foo::bar` or `max<int>`
    pub name: String,
    /// Parameter list without the outer parentheses; `None` for data symbols
    pub parameters: Option<String>,
    /// The whole demangled text
    pub full: String,
}

impl Signature {
    /// Split demangled text into return type, name and parameters.
    ///
    /// Brackets are matched by depth, so parameter lists containing
    /// function pointers and names containing template arguments stay
    /// intact.
    pub fn parse(text: &str) -> Self {
        let (head, parameters) = match parameter_bounds(text) {
            Some((open, close)) => (&text[..open], Some(text[open + 1..close].to_string())),
            None => (text, None),
        };
        let head = head.trim_end();
        let start = name_start(head);
        let return_type = head[..start].trim();

        Signature {
            return_type: (!return_type.is_empty()).then(|| return_type.to_string()),
            name: head[start..].to_string(),
            parameters,
            full: text.to_string(),
        }
    }
}

/// Demangle an Itanium name; `None` when it is not one.
pub fn demangle_gnu(name: &str) -> Option<Signature> {
    if let Some(text) = demangle_itanium(name) {
        return Some(Signature::parse(&text));
    }
    if name.starts_with("_Z") || !looks_like_mangled_body(name) {
        return None;
    }
    demangle_itanium(&format!("_Z{}", name)).map(|text| Signature::parse(&text))
}

fn demangle_itanium(name: &str) -> Option<String> {
    if !name.starts_with("_Z") {
        return None;
    }
    let sym = cpp_demangle::Symbol::new(name).ok()?;
    Some(sym.to_string())
}

// `3foov`, `N3foo3barEv`
fn looks_like_mangled_body(name: &str) -> bool {
    match name.as_bytes().first() {
        Some(b) if b.is_ascii_digit() => true,
        Some(b'N') => name.len() > 1 && name.as_bytes()[1].is_ascii_digit(),
        _ => false,
    }
}

// Outer parameter list: the last `)` followed only by qualifiers, and
// its matching `(`.
fn parameter_bounds(text: &str) -> Option<(usize, usize)> {
    let close = text.rfind(')')?;
    let qualifiers_only = text[close + 1..]
        .split_whitespace()
        .all(|w| matches!(w, "const" | "volatile" | "&" | "&&"));
    if !qualifiers_only {
        return None;
    }
    let mut depth = 0usize;
    for (i, c) in text[..=close].char_indices().rev() {
        match c {
            ')' => depth += 1,
            '(' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some((i, close));
                }
            }
            _ => {}
        }
    }
    None
}

// Start of the last space-separated token outside any brackets.
fn name_start(head: &str) -> usize {
    let mut depth = 0usize;
    for (i, c) in head.char_indices().rev() {
        match c {
            '>' | ')' => depth += 1,
            '<' | '(' => depth = depth.saturating_sub(1),
            ' ' if depth == 0 => {
                // `operator new`, `operator delete[]`
                if head[..i].ends_with("operator") {
                    return name_start(&head[..i]);
                }
                return i + 1;
            }
            _ => {}
        }
    }
    0
}
