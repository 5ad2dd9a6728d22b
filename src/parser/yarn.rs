//! Parsers for the two yarn lockfile dialects.
//!
//! Yarn classic ("v1") and yarn berry ("v2+") write mutually incompatible
//! lockfile grammars, but both are line-oriented: a block is a header line
//! listing one or more `name@range` specifiers, followed by two-space
//! indented metadata lines, with a blank line between blocks. Parsing is
//! fail-closed: either the whole file conforms to the detected dialect and
//! every block comes out, or nothing does. Partial output is never
//! surfaced.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::warn;

use super::integrity::{extract_checksum, extract_integrity, AllowedHashes};
use super::manifest::{self, ManifestDeps};
use super::scan::{Cursor, Mismatch, Scanner, Step};
use super::types::{DependencyRecord, Ecosystem, RawBlock};

/// Banner yarn classic writes at the top of every lockfile, byte for byte.
pub const YARN_CLASSIC_BANNER: &str =
    "# THIS IS AN AUTOGENERATED FILE. DO NOT EDIT THIS FILE DIRECTLY.\n# yarn lockfile v1\n\n\n";

/// Banner yarn berry writes, including the fixed metadata stanza.
pub const YARN_BERRY_BANNER: &str = "# This file is generated by running \"yarn install\" inside your project.\n# Manual changes might be lost - proceed with caution!\n\n__metadata:\n  version: 6\n  cacheKey: 8\n\n";

/// Which lockfile dialect a file is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockfileFormat {
    /// yarn v1 (`yarn.lock` with the "yarn lockfile v1" banner).
    Classic,
    /// yarn v2+ (berry, with the `__metadata` stanza).
    Berry,
}

impl LockfileFormat {
    /// Returns a short label for the dialect.
    pub fn label(&self) -> &'static str {
        match self {
            LockfileFormat::Classic => "yarn classic",
            LockfileFormat::Berry => "yarn berry",
        }
    }
}

/// Errors that can occur during lockfile parsing.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Failed to read the lockfile from disk.
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    /// The file starts with neither dialect's banner.
    #[error("Lockfile header matches no known yarn dialect")]
    UnknownFormat,

    /// The text does not conform to the detected dialect's grammar.
    #[error("Grammar mismatch: {0}")]
    Grammar(#[from] Mismatch),
}

/// Result type alias for parser operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Classifies lockfile text by its banner.
///
/// Exact prefix match only: yarn writes these banners byte for byte, and a
/// file starting with anything else is some other format entirely, so there
/// is no heuristic fallback.
pub fn detect_format(text: &str) -> ParseResult<LockfileFormat> {
    if text.starts_with(YARN_CLASSIC_BANNER) {
        Ok(LockfileFormat::Classic)
    } else if text.starts_with(YARN_BERRY_BANNER) {
        Ok(LockfileFormat::Berry)
    } else {
        Err(ParseError::UnknownFormat)
    }
}

fn unquote(value: &str) -> String {
    value.trim_matches('"').to_string()
}

/// One classic specifier: optional `@` scope marker, name up to the first
/// unscoped `@`, then the version range. Bare specifiers end the range at
/// the `:` that opens the metadata block; quoted ones end at the closing
/// quote or a comma.
fn source_v1(sc: &Scanner<'_>, cur: Cursor, quoted: bool) -> Step<(String, String)> {
    let (scoped, cur) = sc.literal_opt(cur, "@");
    let (name, cur) = sc.until_any(cur, &['@'], true)?;
    let range_ends: &[char] = if quoted { &['"', ','] } else { &['"', ',', ':'] };
    let (range, cur) = sc.take_some(cur, range_ends)?;
    let package = if scoped {
        format!("@{name}")
    } else {
        name.to_string()
    };
    Ok(((package, range.to_string()), cur))
}

fn quoted_source_v1(sc: &Scanner<'_>, cur: Cursor) -> Step<(String, String)> {
    let ((), cur) = sc.literal(cur, "\"")?;
    let (pair, cur) = source_v1(sc, cur, true)?;
    let ((), cur) = sc.literal(cur, "\"")?;
    Ok((pair, cur))
}

/// A classic header: specifiers, each quoted or bare, joined by `", "`.
fn sources_v1(sc: &Scanner<'_>, cur: Cursor) -> Step<Vec<(String, String)>> {
    sc.sep_by(cur, ", ", |sc, cur| {
        sc.either(cur, quoted_source_v1, |sc, cur| source_v1(sc, cur, false))
    })
}

/// One berry specifier. The range carries a protocol prefix (`npm:`,
/// `workspace:`, ...) separated from it by a colon, which is split off and
/// discarded.
fn source_v2(sc: &Scanner<'_>, cur: Cursor) -> Step<(String, String)> {
    let (scoped, cur) = sc.literal_opt(cur, "@");
    let (name, cur) = sc.until_any(cur, &['@'], true)?;
    let (_protocol, cur) = sc.until_any(cur, &[':'], true)?;
    let (range, cur) = sc.until_any(cur, &['"', ','], false)?;
    let package = if scoped {
        format!("@{name}")
    } else {
        name.to_string()
    };
    Ok(((package, range.to_string()), cur))
}

/// A berry header: the whole comma-separated specifier list sits inside a
/// single pair of quotes.
fn sources_v2(sc: &Scanner<'_>, cur: Cursor) -> Step<Vec<(String, String)>> {
    let ((), cur) = sc.literal(cur, "\"")?;
    let (sources, cur) = sc.sep_by(cur, ", ", source_v2)?;
    let ((), cur) = sc.literal(cur, "\"")?;
    Ok((sources, cur))
}

fn leading_spaces(sc: &Scanner<'_>, mut cur: Cursor) -> (usize, Cursor) {
    let mut count = 0;
    loop {
        let (seen, next) = sc.literal_opt(cur, " ");
        if !seen {
            return (count, cur);
        }
        count += 1;
        cur = next;
    }
}

/// Consumes a non-empty line without interpreting it. Failing on an empty
/// line is what stops the metadata scan at the blank line between blocks.
fn skip_line(sc: &Scanner<'_>, cur: Cursor) -> Step<Option<(String, String)>> {
    let (_, cur) = sc.take_some(cur, &['\n'])?;
    Ok((None, cur))
}

/// One classic metadata line. Only lines indented by exactly two spaces are
/// interpreted; deeper indentation belongs to nested stanzas this parser
/// does not model. A `:` right after the key marks such a stanza header and
/// drops the line; otherwise the key is separated from its value by one
/// space, with surrounding quotes stripped.
fn key_value_v1(sc: &Scanner<'_>, cur: Cursor) -> Step<Option<(String, String)>> {
    let (indent, cur) = leading_spaces(sc, cur);
    if indent != 2 {
        return skip_line(sc, cur);
    }
    let (key, cur) = sc.take_some(cur, &[' ', ':'])?;
    if sc.peek(cur) == Some(':') {
        return skip_line(sc, cur);
    }
    let ((), cur) = sc.literal(cur, " ")?;
    let (value, cur) = sc.take_some(cur, &['\n'])?;
    Ok((Some((key.to_string(), unquote(value))), cur))
}

/// One berry metadata line. Same indentation rule as classic, but the key
/// is always followed by a literal `:`; a newline right after it means the
/// key opens a nested stanza and the line is dropped.
fn key_value_v2(sc: &Scanner<'_>, cur: Cursor) -> Step<Option<(String, String)>> {
    let (indent, cur) = leading_spaces(sc, cur);
    if indent != 2 {
        return skip_line(sc, cur);
    }
    let (key, cur) = sc.take_some(cur, &[':'])?;
    let ((), cur) = sc.literal(cur, ":")?;
    if sc.peek(cur) == Some('\n') {
        return Ok((None, cur));
    }
    let ((), cur) = sc.literal(cur, " ")?;
    let (value, cur) = sc.take_some(cur, &['\n'])?;
    Ok((Some((key.to_string(), unquote(value))), cur))
}

/// One dependency block: header, `:`, newline, then metadata lines
/// separated by single newlines. The line number is taken at the header.
fn block(sc: &Scanner<'_>, cur: Cursor, format: LockfileFormat) -> Step<RawBlock> {
    let line_number = cur.line;
    let (sources, cur) = match format {
        LockfileFormat::Classic => sources_v1(sc, cur)?,
        LockfileFormat::Berry => sources_v2(sc, cur)?,
    };
    let ((), cur) = sc.literal(cur, ":\n")?;
    let (lines, cur) = sc.sep_by(cur, "\n", |sc, cur| match format {
        LockfileFormat::Classic => key_value_v1(sc, cur),
        LockfileFormat::Berry => key_value_v2(sc, cur),
    })?;

    // Explicit insert-or-overwrite: the last occurrence of a key wins.
    let mut fields = HashMap::new();
    for (key, value) in lines.into_iter().flatten() {
        fields.insert(key, value);
    }

    Ok((
        RawBlock {
            line_number,
            sources,
            fields,
        },
        cur,
    ))
}

/// Parses the whole file into blocks: banner, blocks separated by one blank
/// line, optional trailing newline, nothing else.
fn parse_blocks(text: &str, format: LockfileFormat) -> Result<Vec<RawBlock>, Mismatch> {
    let banner = match format {
        LockfileFormat::Classic => YARN_CLASSIC_BANNER,
        LockfileFormat::Berry => YARN_BERRY_BANNER,
    };
    let sc = Scanner::new(text);
    sc.anchored(|sc, cur| {
        let ((), cur) = sc.literal(cur, banner)?;
        let (blocks, cur) = sc.sep_by(cur, "\n\n", |sc, cur| block(sc, cur, format))?;
        let (_, cur) = sc.literal_opt(cur, "\n");
        Ok((blocks, cur))
    })
}

fn block_hashes(format: LockfileFormat, block: &RawBlock) -> AllowedHashes {
    match format {
        LockfileFormat::Classic => {
            extract_integrity(block.fields.get("integrity").map(String::as_str))
        }
        LockfileFormat::Berry => {
            extract_checksum(block.fields.get("checksum").map(String::as_str))
        }
    }
}

/// Turns raw blocks into records, in file order. Blocks without sources or
/// without a pinned version are dropped silently; the first alias names the
/// record.
fn assemble(
    format: LockfileFormat,
    blocks: Vec<RawBlock>,
    manifest: Option<&ManifestDeps>,
) -> Vec<DependencyRecord> {
    let mut records = Vec::new();
    for block in blocks {
        if block.sources.is_empty() {
            continue;
        }
        let Some(version) = block.version() else {
            continue;
        };
        records.push(DependencyRecord {
            package: block.sources[0].0.clone(),
            version: version.to_string(),
            ecosystem: Ecosystem::Npm,
            allowed_hashes: block_hashes(format, &block),
            resolved_url: block.fields.get("resolved").cloned(),
            transitivity: manifest::classify(manifest, &block.sources),
            line_number: block.line_number,
        });
    }
    records
}

/// Parses lockfile text into dependency records.
///
/// Strict: an unrecognized banner or any grammar violation surfaces as an
/// error. Use [`parse_file`] for the lenient entry point that degrades to
/// an empty record list.
pub fn parse_str(
    text: &str,
    manifest: Option<&ManifestDeps>,
) -> ParseResult<Vec<DependencyRecord>> {
    let format = detect_format(text)?;
    let blocks = parse_blocks(text, format)?;
    Ok(assemble(format, blocks, manifest))
}

/// Parses a lockfile from disk, classifying against an optional manifest.
///
/// Only a failure to read the lockfile itself is fatal. An unrecognized or
/// malformed lockfile yields an empty record list with a warning, and a
/// missing or unreadable manifest leaves every record `unknown`.
pub fn parse_file(
    lockfile: &Path,
    manifest_path: Option<&Path>,
) -> ParseResult<Vec<DependencyRecord>> {
    let text = fs::read_to_string(lockfile)?;
    let manifest = manifest::load_opt(manifest_path);
    match parse_str(&text, manifest.as_ref()) {
        Ok(records) => Ok(records),
        Err(err) => {
            warn!(path = %lockfile.display(), %err, "lockfile not parsed, emitting no records");
            Ok(Vec::new())
        }
    }
}
