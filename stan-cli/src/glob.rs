//! Expansion of file name patterns given on the command line.
//!
//! `*` and `?` match within a single path component, `**` matches across
//! components. Patterns without wildcards are taken literally, whether the
//! file exists or not.

use anyhow::{Context, Result};
use regex::Regex;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const WILDCARDS: [char; 2] = ['*', '?'];

fn has_wildcard(s: &str) -> bool {
    s.contains(WILDCARDS)
}

/// Translate the wildcard part of a pattern into an anchored regex over
/// `/`-separated relative paths.
fn pattern_regex(pattern: &str) -> Result<Regex> {
    let mut re = String::from("^");
    let mut rest = pattern;

    while let Some(c) = rest.chars().next() {
        if let Some(r) = rest.strip_prefix("**/") {
            re.push_str("(?:[^/]*/)*");
            rest = r;
            continue;
        }
        if let Some(r) = rest.strip_prefix("**") {
            re.push_str(".*");
            rest = r;
            continue;
        }

        match c {
            '*' => re.push_str("[^/]*"),
            '?' => re.push_str("[^/]"),
            c => re.push_str(&regex::escape(c.encode_utf8(&mut [0; 4]))),
        }
        rest = &rest[c.len_utf8()..];
    }

    re.push('$');
    Regex::new(&re).with_context(|| format!("invalid pattern '{pattern}'"))
}

/// Split into the directory to walk from and the wildcard remainder.
fn split_base(pattern: &str) -> (PathBuf, String) {
    let parts: Vec<&str> = pattern.split('/').collect();
    let literal = parts.iter().take_while(|p| !has_wildcard(p)).count();

    let joined = parts[..literal].join("/");
    let base = match literal {
        0 => PathBuf::from("."),
        // Only the empty component before a leading slash.
        _ if joined.is_empty() => PathBuf::from("/"),
        _ => PathBuf::from(joined),
    };
    (base, parts[literal..].join("/"))
}

/// Files below `base` whose `/`-joined relative path matches `re`.
/// `max_depth` counts path components below `base`.
fn walk(base: &Path, max_depth: Option<usize>, re: &Regex) -> Vec<String> {
    let mut walker = WalkDir::new(base).min_depth(1);
    if let Some(depth) = max_depth {
        walker = walker.max_depth(depth);
    }

    let mut out = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("skipping below {}: {e}", base.display());
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let Ok(rel) = entry.path().strip_prefix(base) else {
            continue;
        };
        let rel = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        if re.is_match(&rel) {
            out.push(rel);
        }
    }
    out
}

/// Expand one pattern into the sorted list of matching files.
pub fn expand(pattern: &str) -> Result<Vec<PathBuf>> {
    let pattern = pattern.replace('\\', "/");
    if !has_wildcard(&pattern) {
        return Ok(vec![PathBuf::from(pattern)]);
    }

    let (base, rest) = split_base(&pattern);
    let re = pattern_regex(&rest)?;
    let max_depth = (!rest.contains("**")).then(|| rest.split('/').count());

    let mut matches = walk(&base, max_depth, &re);
    matches.sort();

    log::debug!("'{pattern}' matched {} file(s) below {}", matches.len(), base.display());

    let files = matches
        .into_iter()
        .map(|rel| if base == Path::new(".") { PathBuf::from(rel) } else { base.join(rel) })
        .collect();
    Ok(files)
}

/// Expand all patterns, keeping the first occurrence of each file.
pub fn expand_all<S: AsRef<str>>(patterns: &[S]) -> Result<Vec<PathBuf>> {
    let mut seen = HashSet::new();
    let mut files = Vec::new();
    for pattern in patterns {
        for file in expand(pattern.as_ref())? {
            if seen.insert(file.clone()) {
                files.push(file);
            }
        }
    }
    Ok(files)
}
