// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 The gitbook2mkdocs contributors

//! Rewriting of GitBook-specific markup into MkDocs-compatible markdown.
//!
//! GitBook exports carry Liquid-style directive blocks and a few rendering
//! artifacts that MkDocs does not understand. [`clean_text`] runs a fixed
//! sequence of passes over a page; each pass sees the output of the
//! previous one:
//!
//! 1. `&#xNAN;` entities become paragraph breaks
//! 2. `{% code ... %}` blocks become plain fenced code blocks
//! 3. `{% embed url="..." %}` blocks become `<video>` or `<iframe>` elements
//!    followed by a link
//! 4. `{% hint style="..." %}` blocks become `!!!` admonitions
//! 5. A backslash followed by whitespace becomes a single newline
//! 6. Runs of four or more newlines collapse to three
//!
//! Directive matching is lazy: a block ends at the nearest matching closing
//! tag, so nested blocks of the same kind are not supported. Malformed or
//! unclosed directives are left as they are.
//!
//! [`clean_dir`] applies the passes to every `.md` file below a directory
//! and rewrites only the files whose content changed.
//!
//! # Example
//!
//! ```
//! use gitbook2mkdocs::cleaner::clean_text;
//!
//! let page = "{% code title=\"x\" %}\nfoo\nbar\n{% endcode %}";
//! assert_eq!(clean_text(page), "\n\n```\nfoo\nbar\n```\n\n");
//! ```

use crate::lines::split_lines;
use regex::{Captures, Regex};
use snafu::{ensure, prelude::*};
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use walkdir::WalkDir;

/// Entity GitBook leaves behind where it meant a paragraph break.
const NAN_ENTITY: &str = "&#xNAN;";

/// Title used for embeds that have no text between their tags.
const DEFAULT_EMBED_TITLE: &str = "Embedded content";

/// File extensions (lowercase) rendered with a native `<video>` element.
const VIDEO_EXTENSIONS: [&str; 3] = [".mp4", ".webm", ".ogg"];

static CODE_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\{%\s*code[^%]*%\}\s*(.*?)\s*\{%\s*endcode\s*%\}").expect("code block regex")
});

static EMBED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)\{%\s*embed\s+url="([^"]+)"\s*%\}\s*(.*?)\s*\{%\s*endembed\s*%\}"#)
        .expect("embed regex")
});

static HINT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)\{%\s*hint\s+style="([^"]+)"\s*%\}\s*(.*?)\s*\{%\s*endhint\s*%\}"#)
        .expect("hint regex")
});

static BACKSLASH_BREAK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\\s+").expect("backslash break regex"));

static EXCESS_NEWLINES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{4,}").expect("newline run regex"));

/// Error type for directory cleaning failures.
#[derive(Debug, Snafu)]
pub enum CleanError {
    /// The docs root does not exist or is not a directory.
    #[snafu(display("{} is not a directory", path.display()))]
    NotADirectory {
        /// The path that was expected to be a directory.
        path: PathBuf,
    },

    /// A markdown file could not be read.
    #[snafu(display("failed to read {}: {source}", path.display()))]
    ReadFile {
        /// The file being read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A cleaned markdown file could not be written back.
    #[snafu(display("failed to write {}: {source}", path.display()))]
    WriteFile {
        /// The file being replaced.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

/// Whether [`clean_dir`] writes its results back to disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanMode {
    /// Replace every file whose content changed.
    Write,
    /// Only report which files would change.
    DryRun,
}

/// Outcome of cleaning a directory tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanReport {
    /// Number of markdown files examined.
    pub scanned: usize,

    /// Files whose content changed (or would change in dry-run mode),
    /// in traversal order.
    pub changed: Vec<PathBuf>,
}

impl CleanReport {
    /// Returns the `(changed, scanned)` counts.
    #[must_use]
    pub fn counts(&self) -> (usize, usize) {
        (self.changed.len(), self.scanned)
    }
}

/// Cleans a single page of GitBook markdown.
///
/// Running this on its own output yields the same text again, as long as
/// the input's directive blocks were well formed.
#[must_use]
pub fn clean_text(text: &str) -> String {
    let mut result = text.replace(NAN_ENTITY, "\n\n");

    result = convert_code_blocks(&result);
    result = convert_embeds(&result);
    result = convert_hints(&result);
    result = convert_backslash_breaks(&result);
    result = collapse_newlines(&result);

    result
}

fn convert_code_blocks(text: &str) -> String {
    CODE_BLOCK_RE
        .replace_all(text, |caps: &Captures| {
            format!("\n\n```\n{}\n```\n\n", caps[1].trim())
        })
        .into_owned()
}

fn convert_embeds(text: &str) -> String {
    EMBED_RE
        .replace_all(text, |caps: &Captures| convert_embed(&caps[1], &caps[2]))
        .into_owned()
}

fn convert_hints(text: &str) -> String {
    HINT_RE
        .replace_all(text, |caps: &Captures| convert_hint(&caps[1], &caps[2]))
        .into_owned()
}

fn convert_backslash_breaks(text: &str) -> String {
    BACKSLASH_BREAK_RE.replace_all(text, "\n").into_owned()
}

fn collapse_newlines(text: &str) -> String {
    EXCESS_NEWLINES_RE.replace_all(text, "\n\n\n").into_owned()
}

/// Renders one embed as an HTML media element plus a plain link.
///
/// Direct video files get a `<video>` player; anything else is framed.
fn convert_embed(url: &str, title: &str) -> String {
    let title = match title.trim() {
        "" => DEFAULT_EMBED_TITLE,
        t => t,
    };
    let url = url.trim();
    let lower = url.to_lowercase();

    if VIDEO_EXTENSIONS.iter().any(|ext| lower.ends_with(ext)) {
        format!(
            "\n\n<video controls style=\"max-width: 100%;\" src=\"{url}\"></video>\n\n\
             [{title}]({url})\n\n"
        )
    } else {
        format!(
            "\n\n<iframe src=\"{url}\" style=\"width: 100%; height: 600px; border: 0;\" \
             loading=\"lazy\" allowfullscreen></iframe>\n\n\
             [{title}]({url})\n\n"
        )
    }
}

/// Renders one hint as a Material admonition with a four-space indented body.
fn convert_hint(style: &str, body: &str) -> String {
    let kind = admonition_kind(style);
    let indented = split_lines(body.trim())
        .into_iter()
        .map(|line| format!("    {line}"))
        .collect::<Vec<_>>()
        .join("\n");

    format!("\n\n!!! {kind}\n{indented}\n\n")
}

/// Maps a GitBook hint style onto an admonition type, defaulting to `note`.
fn admonition_kind(style: &str) -> &'static str {
    match style.trim().to_lowercase().as_str() {
        "info" => "info",
        "warning" => "warning",
        "danger" => "danger",
        "success" => "tip",
        _ => "note",
    }
}

/// Decodes bytes as UTF-8, dropping any invalid sequences.
///
/// Unlike [`String::from_utf8_lossy`], nothing is substituted for the
/// invalid bytes.
#[must_use]
pub fn decode_lossy(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        out.push_str(chunk.valid());
    }
    out
}

/// Collects every `.md` file below `root`, sorted by file name at each level.
///
/// Symlinks to files count as files. Entries that cannot be read are skipped.
#[must_use]
pub fn collect_markdown_files(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.path().is_file())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "md"))
        .map(walkdir::DirEntry::into_path)
        .collect()
}

/// Cleans every markdown file below `root`.
///
/// Files are only rewritten when cleaning changed them, so untouched pages
/// keep their modification times. Each rewrite replaces the file in a single
/// rename.
///
/// # Errors
///
/// Returns an error if `root` is not a directory, or if a markdown file
/// cannot be read or written back.
pub fn clean_dir(root: &Path, mode: CleanMode) -> Result<CleanReport, CleanError> {
    ensure!(root.is_dir(), NotADirectorySnafu { path: root });

    let files = collect_markdown_files(root);
    let mut report = CleanReport {
        scanned: files.len(),
        changed: Vec::new(),
    };

    for path in files {
        let bytes = std::fs::read(&path).context(ReadFileSnafu { path: &path })?;
        let original = decode_lossy(&bytes);
        let cleaned = clean_text(&original);

        if cleaned == original {
            continue;
        }
        if mode == CleanMode::Write {
            replace_file(&path, &cleaned).context(WriteFileSnafu { path: &path })?;
        }
        report.changed.push(path);
    }

    Ok(report)
}

/// Replaces `path` with `contents` via a temporary sibling file.
///
/// A symlinked `path` keeps its link; the target file is replaced.
fn replace_file(path: &Path, contents: &str) -> std::io::Result<()> {
    let target = std::fs::canonicalize(path)?;
    let dir = target.parent().unwrap_or_else(|| Path::new("."));
    let permissions = std::fs::metadata(&target)?.permissions();

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(contents.as_bytes())?;
    tmp.as_file().set_permissions(permissions)?;
    tmp.persist(&target).map_err(|e| e.error)?;
    Ok(())
}
