// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 The gitbook2mkdocs contributors

//! MkDocs navigation built from a GitBook `SUMMARY.md`.
//!
//! GitBook describes its table of contents as a nested bullet list of
//! links. MkDocs wants the same tree as a `nav:` list of single-key
//! mappings. Conversion happens in three steps:
//!
//! 1. [`parse_summary`] extracts one [`NavEntry`] per link line
//! 2. [`build_nav`] folds the entries into a [`NavNode`] forest, using
//!    indentation (two spaces per level) to decide nesting
//! 3. [`render_yaml`] or [`render_json`] prints the forest
//!
//! # Example
//!
//! ```
//! use gitbook2mkdocs::nav::summary_to_nav;
//!
//! let summary = "\
//! Table of contents
//!
//! - [Home](README.md)
//! - [Guide](guide.md)
//!   - [Intro](guide/intro.md)
//! - [API](api.md)
//! ";
//!
//! assert_eq!(
//!     summary_to_nav(summary).unwrap(),
//!     "nav:\n  - Home: index.md\n  - Guide:\n    - Intro: guide/intro.md\n  - API: api.md\n"
//! );
//! ```

use crate::lines::split_lines;
use regex::Regex;
use serde::ser::{Serialize, SerializeMap, Serializer};
use snafu::prelude::*;
use std::fmt::Write;
use std::sync::LazyLock;

/// A bullet line holding nothing but a single markdown link.
static LINK_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*[*+-]\s+\[([^\]]+)\]\(([^)]+)\)\s*$").expect("summary link regex")
});

/// Error type for navigation building failures.
#[derive(Debug, Snafu)]
pub enum NavError {
    /// An entry is indented more than one level past anything it could
    /// attach to.
    #[snafu(display(
        "line {line}: \"{title}\" is at indent level {level}, but the deepest level it can nest under is {deepest}"
    ))]
    IndentJump {
        /// 1-based line number in the summary.
        line: usize,
        /// Title of the offending entry.
        title: String,
        /// Indent level of the offending entry.
        level: usize,
        /// Deepest level that was open when the entry was reached.
        deepest: usize,
    },

    /// The navigation could not be serialized as JSON.
    #[snafu(display("failed to serialize navigation: {source}"))]
    Json {
        /// The underlying serialization error.
        source: serde_json::Error,
    },
}

/// One link line of a summary file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavEntry {
    /// 1-based line number in the summary.
    pub line: usize,

    /// Nesting depth: leading spaces divided by two.
    pub level: usize,

    /// Link text, trimmed.
    pub title: String,

    /// Link target after [`normalize_href`].
    pub href: String,
}

/// A node of the MkDocs navigation tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavNode {
    /// A page, rendered as `- Title: path`.
    Page {
        /// Display title.
        title: String,
        /// Path relative to the docs directory.
        path: String,
    },

    /// A section with children, rendered as `- Title:` and a nested list.
    Section {
        /// Display title.
        title: String,
        /// Nested entries in summary order.
        children: Vec<Self>,
    },
}

impl NavNode {
    /// Returns the node's display title.
    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            Self::Page { title, .. } | Self::Section { title, .. } => title,
        }
    }

    /// Turns a page into an empty section, dropping its path.
    ///
    /// MkDocs sections have no page of their own. Sections are unchanged.
    fn make_section(&mut self) {
        if let Self::Page { title, .. } = self {
            *self = Self::Section {
                title: std::mem::take(title),
                children: Vec::new(),
            };
        }
    }

    fn children_mut(&mut self) -> Option<&mut Vec<Self>> {
        match self {
            Self::Section { children, .. } => Some(children),
            Self::Page { .. } => None,
        }
    }
}

impl Serialize for NavNode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_key(self.title())?;
        match self {
            Self::Page { path, .. } => map.serialize_value(path)?,
            Self::Section { children, .. } => map.serialize_value(children)?,
        }
        map.end()
    }
}

/// Rewrites GitBook link targets to their MkDocs equivalents.
///
/// A `README.md` page (at any depth) becomes `index.md`, and a leading
/// `./` is removed.
#[must_use]
pub fn normalize_href(href: &str) -> String {
    let href = if href == "README.md" {
        "index.md".to_owned()
    } else if let Some(dir) = href.strip_suffix("/README.md") {
        format!("{dir}/index.md")
    } else {
        href.to_owned()
    };

    match href.strip_prefix("./") {
        Some(rest) => rest.to_owned(),
        None => href,
    }
}

/// Parses a single summary line, returning `None` unless it is a bullet
/// holding exactly one link.
fn parse_line(line_no: usize, line: &str) -> Option<NavEntry> {
    let caps = LINK_LINE_RE.captures(line)?;
    let indent = line.len() - line.trim_start_matches(' ').len();

    Some(NavEntry {
        line: line_no,
        level: indent / 2,
        title: caps[1].trim().to_owned(),
        href: normalize_href(caps[2].trim()),
    })
}

/// Extracts the navigation entries from a summary file, in order.
///
/// Headings, prose, blank lines and bullets with anything besides a link
/// are ignored.
#[must_use]
pub fn parse_summary(text: &str) -> Vec<NavEntry> {
    split_lines(text)
        .into_iter()
        .enumerate()
        .filter_map(|(i, line)| parse_line(i + 1, line))
        .collect()
}

/// Navigation forest under construction.
///
/// The insertion point is always reached by following the last node of each
/// list `depth` times from the roots, so the depth is the only cursor state.
#[derive(Debug, Default)]
struct NavTree {
    roots: Vec<NavNode>,
    depth: usize,
}

impl NavTree {
    fn list_at(roots: &mut Vec<NavNode>, depth: usize) -> Option<&mut Vec<NavNode>> {
        let mut list = roots;
        for _ in 0..depth {
            list = list.last_mut()?.children_mut()?;
        }
        Some(list)
    }

    /// Adds one entry, returning the updated tree.
    fn insert(mut self, entry: &NavEntry) -> Result<Self, NavError> {
        let deepest = self.depth;
        let jump = || IndentJumpSnafu {
            line: entry.line,
            title: entry.title.as_str(),
            level: entry.level,
            deepest,
        };

        self.depth = self.depth.min(entry.level);
        while self.depth < entry.level {
            Self::list_at(&mut self.roots, self.depth)
                .and_then(|list| list.last_mut())
                .context(jump())?
                .make_section();
            self.depth += 1;
        }

        Self::list_at(&mut self.roots, self.depth)
            .context(jump())?
            .push(NavNode::Page {
                title: entry.title.clone(),
                path: entry.href.clone(),
            });
        Ok(self)
    }
}

/// Builds the navigation forest from parsed entries.
///
/// Each entry may be at most one level deeper than the one before it; a
/// shallower entry closes the deeper lists. An entry that gains children
/// turns into a section.
///
/// # Errors
///
/// Returns [`NavError::IndentJump`] when an entry skips a nesting level,
/// including a first entry that is indented at all.
pub fn build_nav(entries: &[NavEntry]) -> Result<Vec<NavNode>, NavError> {
    entries
        .iter()
        .try_fold(NavTree::default(), NavTree::insert)
        .map(|tree| tree.roots)
}

/// Renders the forest as an MkDocs `nav:` block, one line per node.
#[must_use]
pub fn render_yaml(nav: &[NavNode]) -> String {
    let mut out = String::from("nav:\n");
    render_list(&mut out, nav, 1);
    out
}

fn render_list(out: &mut String, nodes: &[NavNode], depth: usize) {
    let indent = "  ".repeat(depth);
    for node in nodes {
        match node {
            NavNode::Page { title, path } => writeln!(out, "{indent}- {title}: {path}").unwrap(),
            NavNode::Section { title, children } => {
                writeln!(out, "{indent}- {title}:").unwrap();
                render_list(out, children, depth + 1);
            }
        }
    }
}

/// Renders the forest as a pretty-printed `{"nav": [...]}` JSON document.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn render_json(nav: &[NavNode]) -> Result<String, NavError> {
    #[derive(serde::Serialize)]
    struct NavDocument<'a> {
        nav: &'a [NavNode],
    }

    let mut json = serde_json::to_string_pretty(&NavDocument { nav }).context(JsonSnafu)?;
    json.push('\n');
    Ok(json)
}

/// Converts summary text straight to a rendered `nav:` block.
///
/// # Errors
///
/// Returns an error if the summary's indentation skips a level.
pub fn summary_to_nav(summary: &str) -> Result<String, NavError> {
    let entries = parse_summary(summary);
    let nav = build_nav(&entries)?;
    Ok(render_yaml(&nav))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(title: &str, path: &str) -> NavNode {
        NavNode::Page {
            title: title.into(),
            path: path.into(),
        }
    }

    fn section(title: &str, children: Vec<NavNode>) -> NavNode {
        NavNode::Section {
            title: title.into(),
            children,
        }
    }

    #[test]
    fn parses_link_lines_with_any_bullet() {
        let entries = parse_summary("* [A](a.md)\n+ [B](b.md)\n- [C](c.md)\n");
        let titles: Vec<_> = entries.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, ["A", "B", "C"]);
        assert!(entries.iter().all(|e| e.level == 0));
    }

    #[test]
    fn ignores_non_link_lines() {
        let summary = "\
# Summary

Some prose.
- plain bullet
- [Link](a.md) trailing text
## Section
-[NoSpace](b.md)
- [Ok](ok.md)
";
        let entries = parse_summary(summary);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "Ok");
        assert_eq!(entries[0].line, 8);
    }

    #[test]
    fn trims_title_and_href() {
        let entries = parse_summary("  -   [ Spaced ]( spaced.md )  ");
        assert_eq!(
            entries,
            [NavEntry {
                line: 1,
                level: 1,
                title: "Spaced".into(),
                href: "spaced.md".into(),
            }]
        );
    }

    #[test]
    fn level_is_half_the_leading_spaces() {
        let entries = parse_summary("- [A](a.md)\n  - [B](b.md)\n   - [C](c.md)\n    - [D](d.md)\n");
        let levels: Vec<_> = entries.iter().map(|e| e.level).collect();
        assert_eq!(levels, [0, 1, 1, 2]);
    }

    #[test]
    fn line_separator_starts_a_new_line() {
        let entries = parse_summary("- [A](a.md)\u{2028}  - [B](b.md)\u{85}- [C](c.md)");
        let levels: Vec<_> = entries.iter().map(|e| (e.title.as_str(), e.level, e.line)).collect();
        assert_eq!(levels, [("A", 0, 1), ("B", 1, 2), ("C", 0, 3)]);
    }

    #[test]
    fn normalizes_readme_and_dot_slash() {
        assert_eq!(normalize_href("README.md"), "index.md");
        assert_eq!(normalize_href("guide/README.md"), "guide/index.md");
        assert_eq!(normalize_href("./x.md"), "x.md");
        assert_eq!(normalize_href("./guide/README.md"), "guide/index.md");
        assert_eq!(normalize_href("NOTREADME.md"), "NOTREADME.md");
        assert_eq!(normalize_href("guide.md"), "guide.md");
    }

    #[test]
    fn builds_flat_list() {
        let entries = parse_summary("- [A](a.md)\n- [B](b.md)\n");
        assert_eq!(
            build_nav(&entries).unwrap(),
            [page("A", "a.md"), page("B", "b.md")]
        );
    }

    #[test]
    fn page_with_children_becomes_section() {
        let entries = parse_summary(
            "- [Guide](guide.md)\n  - [Intro](guide/intro.md)\n    - [Deep](guide/deep.md)\n- [API](api.md)\n",
        );
        assert_eq!(
            build_nav(&entries).unwrap(),
            [
                section(
                    "Guide",
                    vec![section("Intro", vec![page("Deep", "guide/deep.md")])]
                ),
                page("API", "api.md"),
            ]
        );
    }

    #[test]
    fn returns_several_levels_at_once() {
        let entries = parse_summary("- [A](a.md)\n  - [B](b.md)\n    - [C](c.md)\n- [D](d.md)\n");
        let nav = build_nav(&entries).unwrap();
        assert_eq!(nav.len(), 2);
        assert_eq!(nav[1], page("D", "d.md"));
    }

    #[test]
    fn siblings_after_return_attach_to_new_parent() {
        let entries =
            parse_summary("- [A](a.md)\n  - [A1](a1.md)\n- [B](b.md)\n  - [B1](b1.md)\n");
        assert_eq!(
            build_nav(&entries).unwrap(),
            [
                section("A", vec![page("A1", "a1.md")]),
                section("B", vec![page("B1", "b1.md")]),
            ]
        );
    }

    #[test]
    fn skipped_level_is_an_error() {
        let entries = parse_summary("- [A](a.md)\n      - [C](c.md)\n");
        let err = build_nav(&entries).unwrap_err();
        match err {
            NavError::IndentJump {
                line,
                title,
                level,
                deepest,
            } => {
                assert_eq!(line, 2);
                assert_eq!(title, "C");
                assert_eq!(level, 3);
                assert_eq!(deepest, 0);
            }
            other => panic!("Expected IndentJump, got {other:?}"),
        }
    }

    #[test]
    fn indented_first_entry_is_an_error() {
        let entries = parse_summary("  - [A](a.md)\n");
        assert!(matches!(
            build_nav(&entries),
            Err(NavError::IndentJump { line: 1, .. })
        ));
    }

    #[test]
    fn empty_summary_builds_empty_nav() {
        assert!(build_nav(&parse_summary("# Summary\n")).unwrap().is_empty());
        assert_eq!(summary_to_nav("").unwrap(), "nav:\n");
    }

    #[test]
    fn renders_yaml() {
        let summary = "- [Home](README.md)\n- [Guide](guide.md)\n  - [Intro](guide/intro.md)\n- [API](api.md)\n";
        assert_eq!(
            summary_to_nav(summary).unwrap(),
            "nav:\n  - Home: index.md\n  - Guide:\n    - Intro: guide/intro.md\n  - API: api.md\n"
        );
    }

    #[test]
    fn nested_readme_renders_as_index() {
        let summary = "- [Guide](guide.md)\n  - [Overview](./guide/README.md)\n";
        assert_eq!(
            summary_to_nav(summary).unwrap(),
            "nav:\n  - Guide:\n    - Overview: guide/index.md\n"
        );
    }

    #[test]
    fn renders_json() {
        let nav = [
            page("Home", "index.md"),
            section("Guide", vec![page("Intro", "guide/intro.md")]),
        ];
        let json: serde_json::Value = serde_json::from_str(&render_json(&nav).unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "nav": [
                    { "Home": "index.md" },
                    { "Guide": [ { "Intro": "guide/intro.md" } ] }
                ]
            })
        );
    }

    #[test]
    fn json_keys_are_node_titles() {
        let nav = [section("Guide", vec![page("Intro", "intro.md")])];
        let json: serde_json::Value = serde_json::from_str(&render_json(&nav).unwrap()).unwrap();
        assert_eq!(json["nav"][0]["Guide"][0]["Intro"], "intro.md");
    }

    #[test]
    fn node_title() {
        assert_eq!(page("A", "a.md").title(), "A");
        assert_eq!(section("B", Vec::new()).title(), "B");
    }
}
