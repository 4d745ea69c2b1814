//! Release name parser - derives quality and encoding from free-text titles.
//!
//! Matching is plain case-insensitive substring search, not tokenized, so a
//! stray "x1080px" still counts as 1080P.

use once_cell::sync::Lazy;
use regex_lite::Regex;

use super::Quality;

static QUALITY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)2160p|4k|1080p|720p|480p").unwrap());

static BASE_TYPE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)bluray|web-dl|webrip|hdrip|dvdrip").unwrap());

static HEVC_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)x265|hevc").unwrap());

static X264_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)x264").unwrap());

/// Base type used when a name names none.
const DEFAULT_BASE_TYPE: &str = "WEBRip";

/// Quality and encoding derived from a release name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTitle {
    pub quality: Quality,
    pub encoding_tag: String,
}

/// Parse a release name. Never fails; unknown parts fall back to
/// `UNKNOWN` / `WEBRIP`.
pub fn parse_title(raw_name: &str) -> ParsedTitle {
    ParsedTitle {
        quality: parse_quality(raw_name),
        encoding_tag: format!(
            "{}{}",
            parse_base_type(raw_name),
            codec_suffix(raw_name)
        ),
    }
}

/// First quality token in the name, leftmost wins.
pub fn parse_quality(raw_name: &str) -> Quality {
    QUALITY_RE
        .find(raw_name)
        .map(|m| Quality::from_label(m.as_str()))
        .unwrap_or(Quality::Unknown)
}

/// Upper-cased source/container type, e.g. "BLURAY" or "WEB-DL".
pub fn parse_base_type(raw_name: &str) -> String {
    BASE_TYPE_RE
        .find(raw_name)
        .map(|m| m.as_str())
        .unwrap_or(DEFAULT_BASE_TYPE)
        .to_uppercase()
}

/// " (HEVC)", " (X264)" or nothing. HEVC wins when both appear.
pub fn codec_suffix(raw_name: &str) -> &'static str {
    if HEVC_RE.is_match(raw_name) {
        " (HEVC)"
    } else if X264_RE.is_match(raw_name) {
        " (X264)"
    } else {
        ""
    }
}
