use std::collections::{BTreeSet, HashSet};
use std::sync::LazyLock;

use pib_core::domain::DsmEntry;
use pib_core::profiles::CriteriaProfile;
use regex::Regex;

use super::synonym_expansions;
use crate::retrieve::tokenize;

/// How far above a "Diagnostic Criteria" line the section title may sit.
const HEADING_LOOKBACK: usize = 8;
const MAX_HEADING_CHARS: usize = 90;
/// All-caps lines longer than this are banners or table headers, not titles.
const MAX_SHOUTING_CHARS: usize = 32;
const MAX_CRITERIA_CHARS: usize = 2400;

static BLOCK_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<\s*(br|/p|/div|/li|/tr|/h[1-6])\b[^>]*>").expect("valid block tag pattern")
});
// Only real tags and comments; a bare `<` or `>` in text ("BMI < 17") is content.
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<!--.*?-->|</?[A-Za-z][^>]*>").expect("valid tag pattern")
});
static DIAGNOSTIC_CRITERIA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)diagnostic\s+criteria").expect("valid trigger pattern"));
static SECTION_STOP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(diagnostic features|associated features|prevalence|development and course|risk and prognostic|culture-related|sex- and gender-related|gender-related|differential diagnosis|comorbidity|coding and recording|recording procedures|specifiers|functional consequences)\b",
    )
    .expect("valid section stop pattern")
});
static ENUMERATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\(?[A-Za-z0-9]{1,3}[.)]|[-*•–])(\s|$)").expect("valid enumeration pattern")
});

fn decode_entities(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// Corpus lines with markup removed and whitespace collapsed; blank lines become "".
fn normalized_lines(raw: &str) -> Vec<String> {
    let text = raw.replace("\r\n", "\n").replace('\r', "\n");
    let text = BLOCK_TAG_RE.replace_all(&text, "\n");
    let text = TAG_RE.replace_all(&text, " ");
    let text = decode_entities(&text);

    text.split('\n')
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .collect()
}

/// Heuristic section-title test.
///
/// A title is at most 90 characters, contains an uppercase letter, is not an enumerated
/// criterion, and does not end like a sentence. All-caps lines only qualify when short.
pub(crate) fn is_heading_like(line: &str) -> bool {
    let len = line.chars().count();
    if len == 0 || len > MAX_HEADING_CHARS {
        return false;
    }
    if DIAGNOSTIC_CRITERIA_RE.is_match(line) || ENUMERATION_RE.is_match(line) {
        return false;
    }
    if line.ends_with(['.', ':', ';', ',', '?', '!']) {
        return false;
    }
    if !line.chars().any(char::is_uppercase) {
        return false;
    }
    line.chars().any(char::is_lowercase) || len <= MAX_SHOUTING_CHARS
}

fn resolve_heading(lines: &[String], trigger: usize) -> Option<&str> {
    lines[trigger.saturating_sub(HEADING_LOOKBACK)..trigger]
        .iter()
        .rev()
        .find(|line| is_heading_like(line))
        .map(String::as_str)
}

/// Criteria body following a trigger line, up to the first section boundary.
fn collect_criteria(following: &[String]) -> String {
    let mut buffer: Vec<&str> = Vec::new();
    let mut buffered_chars = 0usize;
    let mut blank_run = 0u32;

    for line in following {
        if line.is_empty() {
            if !buffer.is_empty() {
                blank_run += 1;
                if blank_run >= 2 {
                    break;
                }
            }
            continue;
        }
        blank_run = 0;

        if SECTION_STOP_RE.is_match(line) {
            break;
        }
        if !buffer.is_empty() && is_heading_like(line) {
            break;
        }

        if !buffer.is_empty() {
            buffered_chars += 1;
        }
        buffered_chars += line.chars().count();
        buffer.push(line);
        if buffered_chars > MAX_CRITERIA_CHARS {
            break;
        }
    }

    buffer.join("\n").trim().to_string()
}

fn entry_keywords(title: &str, text: &str, profile: &CriteriaProfile) -> BTreeSet<String> {
    let combined = format!("{title} {text}");
    let mut keywords: BTreeSet<String> = tokenize(&combined).into_iter().collect();
    keywords.extend(synonym_expansions(&combined.to_lowercase(), profile));
    keywords
}

/// Extract "diagnostic criteria" sections from a reference corpus.
///
/// Each line mentioning diagnostic criteria is attributed to the nearest title-like line
/// within eight lines above it. The first section per title (case-insensitive) wins; later
/// duplicates, sections without a title and sections with no body are skipped. Entry ids
/// are `dsm_1`, `dsm_2`, ... in emission order.
pub fn build_dsm_index(raw: &str, profile: &CriteriaProfile) -> Vec<DsmEntry> {
    let lines = normalized_lines(raw);
    let mut entries: Vec<DsmEntry> = Vec::new();
    let mut seen_titles: HashSet<String> = HashSet::new();

    for (i, line) in lines.iter().enumerate() {
        if !DIAGNOSTIC_CRITERIA_RE.is_match(line) {
            continue;
        }
        let Some(title) = resolve_heading(&lines, i) else {
            tracing::trace!(line = i, "criteria trigger without a heading");
            continue;
        };
        let title_key = title.to_lowercase();
        if seen_titles.contains(&title_key) {
            tracing::trace!(line = i, title, "duplicate criteria section");
            continue;
        }

        let text = collect_criteria(&lines[i + 1..]);
        if text.is_empty() {
            continue;
        }

        seen_titles.insert(title_key);
        let keywords = entry_keywords(title, &text, profile);
        entries.push(DsmEntry {
            id: format!("dsm_{}", entries.len() + 1),
            title: title.to_string(),
            text,
            keywords,
        });
    }

    tracing::debug!(lines = lines.len(), entries = entries.len(), "built criteria index");
    entries
}
