//! Output filename derivation.
//!
//! Source names are stripped of their extension and of a fixed catalogue of
//! noise phrases common in downloaded media titles, then run through the
//! selected naming template with the output format's extension. Cleaning is
//! idempotent and never yields an empty name.

use std::path::Path;

use crate::models::{NamingConvention, OutputFormat};

/// Noise phrases removed from track names, in application order.
///
/// Wrapped forms come before the bare phrases. Resolution markers
/// (hd/4k/1080p/720p) are removed only in wrapped form.
const NOISE_PHRASES: &[&str] = &[
    "(official video)",
    "(official audio)",
    "(official music video)",
    "(music video)",
    "(lyric video)",
    "(lyrics)",
    "(hd)",
    "(4k)",
    "(1080p)",
    "(720p)",
    "[official video]",
    "[official audio]",
    "[official music video]",
    "[music video]",
    "[lyric video]",
    "[lyrics]",
    "[hd]",
    "[4k]",
    "[1080p]",
    "[720p]",
    "official video",
    "official audio",
    "official music video",
    "music video",
    "lyric video",
    "lyrics",
];

/// Derive the output filename for a source file name.
///
/// Strips the extension, cleans the name, applies the naming template, and
/// appends the output format's extension.
pub fn output_filename(
    source_name: &str,
    convention: NamingConvention,
    format: OutputFormat,
) -> String {
    let stem = strip_extension(source_name);
    let clean = clean_name(stem);
    let templated = match convention {
        NamingConvention::SuffixDjOpt => format!("{} - DJ OPT", clean),
        NamingConvention::PrefixDjOpt => format!("DJ OPT - {}", clean),
        NamingConvention::SuffixOptimized => format!("{} (Optimized)", clean),
        NamingConvention::UnderscoreDjOpt => format!("{}_DJ_OPT", clean),
    };
    format!("{}.{}", templated, format.extension())
}

/// Clean an extension-stripped track name.
///
/// Removes the noise catalogue (case-insensitive, tolerant of repeated
/// whitespace inside a phrase), collapses whitespace, and trims separator
/// dashes. Falls back to the input when cleaning strips everything, so the
/// result is never empty for a non-empty input.
pub fn clean_name(stem: &str) -> String {
    let mut name = collapse_whitespace(stem);
    loop {
        let next = collapse_whitespace(&strip_noise(&name));
        if next == name {
            break;
        }
        name = next;
    }
    let trimmed = name.trim_matches(|c: char| c == '-' || c.is_whitespace());

    if trimmed.is_empty() {
        stem.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Strip the file extension from a name, if any.
fn strip_extension(name: &str) -> &str {
    Path::new(name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(name)
}

fn strip_noise(input: &str) -> String {
    let mut name = input.to_string();
    for phrase in NOISE_PHRASES {
        while let Some((start, end)) = find_phrase(&name, phrase) {
            name.replace_range(start..end, "");
        }
    }
    name
}

fn collapse_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Find `phrase` in `haystack`, ASCII case-insensitive, with each space in
/// the phrase matching a whitespace run. Returns the matched byte range.
///
/// Phrases are pure ASCII, so match boundaries always fall on UTF-8 char
/// boundaries.
fn find_phrase(haystack: &str, phrase: &str) -> Option<(usize, usize)> {
    let bytes = haystack.as_bytes();
    let words: Vec<&[u8]> = phrase.split(' ').map(str::as_bytes).collect();

    'scan: for start in 0..bytes.len() {
        let mut pos = start;
        for (wi, word) in words.iter().enumerate() {
            if wi > 0 {
                let ws_start = pos;
                while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
                    pos += 1;
                }
                if pos == ws_start {
                    continue 'scan;
                }
            }
            if pos + word.len() > bytes.len() || !bytes[pos..pos + word.len()].eq_ignore_ascii_case(word) {
                continue 'scan;
            }
            pos += word.len();
        }
        return Some((start, pos));
    }
    None
}
