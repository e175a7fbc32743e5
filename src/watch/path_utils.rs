// src/watch/path_utils.rs

//! String-level path comparison used for routing events to watches.
//!
//! Every function here works on `/`-separated strings and never touches the
//! filesystem. Case folding is controlled by [`PathMatcher`], which is
//! configured once from the filesystem oracle (or the config override).

use std::borrow::Cow;

pub const DIRECTORY_SEPARATOR: char = '/';

/// Replace every `\` with `/`. Borrows the input when there is nothing to do.
pub fn normalize_separators(path: &str) -> Cow<'_, str> {
    if path.contains('\\') {
        Cow::Owned(path.replace('\\', "/"))
    } else {
        Cow::Borrowed(path)
    }
}

/// Strip trailing separators, keeping `/` and drive roots such as `C:/`.
pub fn trim_trailing_separators(path: &str) -> &str {
    let mut trimmed = path;
    while trimmed.len() > 1 && trimmed.ends_with(DIRECTORY_SEPARATOR) {
        let rest = &trimmed[..trimmed.len() - 1];
        if rest.ends_with(':') {
            break;
        }
        trimmed = rest;
    }
    trimmed
}

/// POSIX-style dirname over a `/`-separated path.
///
/// `parent_dir("/")` is `/`, `parent_dir("C:/")` is `C:/` and a bare name
/// has parent `.`, so an upward walk stops once the parent equals the path.
pub fn parent_dir(path: &str) -> &str {
    let trimmed = trim_trailing_separators(path);
    match trimmed.rfind(DIRECTORY_SEPARATOR) {
        None => {
            if trimmed.is_empty() {
                "."
            } else if trimmed.ends_with(':') {
                trimmed
            } else {
                "."
            }
        }
        Some(0) => "/",
        Some(i) if trimmed[..i].ends_with(':') => &trimmed[..=i],
        Some(i) => &trimmed[..i],
    }
}

/// Characters that are never case folded.
fn keeps_case(c: char) -> bool {
    matches!(
        c,
        'a'..='z' | '0'..='9' | '\\' | '/' | ':' | '-' | '_' | '.' | ' ' | '\u{0130}' | '\u{0131}' | '\u{00DF}'
    )
}

fn to_file_name_lower_case(path: &str) -> Cow<'_, str> {
    if path.chars().all(keeps_case) {
        return Cow::Borrowed(path);
    }
    let mut out = String::with_capacity(path.len());
    for c in path.chars() {
        if keeps_case(c) {
            out.push(c);
        } else {
            out.extend(c.to_lowercase());
        }
    }
    Cow::Owned(out)
}

/// Path comparison parameterized by the environment's case sensitivity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathMatcher {
    case_sensitive: bool,
}

impl PathMatcher {
    pub fn new(case_sensitive: bool) -> Self {
        Self { case_sensitive }
    }

    pub fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// Case-fold `path` unless the environment is case sensitive.
    pub fn canonicalize<'a>(&self, path: &'a str) -> Cow<'a, str> {
        if self.case_sensitive {
            Cow::Borrowed(path)
        } else {
            to_file_name_lower_case(path)
        }
    }

    /// Separator-normalized, trailing-trimmed, case-folded form.
    pub fn canonical_form(&self, path: &str) -> String {
        let normalized = normalize_separators(path);
        let trimmed = trim_trailing_separators(&normalized);
        self.canonicalize(trimmed).into_owned()
    }

    pub fn is_same_path(&self, a: &str, b: &str) -> bool {
        a == b || self.canonical_form(a) == self.canonical_form(b)
    }

    /// True if `child` is `parent` or lies anywhere beneath it.
    pub fn contains(&self, parent: &str, child: &str) -> bool {
        if self.is_same_path(parent, child) {
            return true;
        }

        let parent = normalize_separators(parent);
        let child = normalize_separators(child);
        let parent = trim_trailing_separators(&parent);
        let child = trim_trailing_separators(&child);

        if is_prefix_dir(parent, child) {
            return true;
        }
        let parent = self.canonicalize(parent);
        let child = self.canonicalize(child);
        is_prefix_dir(&parent, &child)
    }
}

/// `child` is strictly longer, starts with `parent`, and the next character
/// is a separator (or `parent` is itself a root ending in one).
fn is_prefix_dir(parent: &str, child: &str) -> bool {
    if child.len() <= parent.len() || !child.starts_with(parent) {
        return false;
    }
    parent.ends_with(DIRECTORY_SEPARATOR) || child.as_bytes()[parent.len()] == b'/'
}
