use regex_lite::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;
use tracing::debug;
use url::{Host, Url};

static URL_CANDIDATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\b(?:https?://|www\.)[^\s<>"'`]+"#).expect("URL candidate pattern is valid")
});

const TRAILING_PUNCTUATION: &[char] = &[
    '.', ',', ';', ':', '!', '?', '\'', '"', ']', '}', '>', '，', '。', '、', '；', '：', '！', '？',
    '」', '』', '】', '（', '「', '『', '【',
];

// Separators that can glue two pasted links together.
const JOIN_SEPARATORS: &[char] = &[',', ';', '，', '；', '、'];

const URL_STARTS: &[&str] = &["http://", "https://", "www."];

/// Finds URLs embedded in free-form text.
///
/// Recognizes `http://` and `https://` URLs as well as bare `www.` hosts, which
/// are returned with an `http://` prefix. Duplicates are collapsed to their first
/// occurrence; otherwise URLs come back in the order they appear.
///
/// Any Unicode whitespace ends a URL, and the host ends at the first non-ASCII
/// character, so text like `看看https://example.com吧` yields `https://example.com`.
#[derive(Clone, Debug, Default)]
pub struct UrlExtractor;

impl UrlExtractor {
    pub fn new() -> Self {
        Self
    }

    pub fn extract(&self, text: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut urls = Vec::new();

        // regex-lite only knows ASCII whitespace; NBSP and U+3000 are split here.
        for token in text.split(char::is_whitespace).filter(|t| !t.is_empty()) {
            for candidate in URL_CANDIDATE.find_iter(token) {
                for piece in split_joined(candidate.as_str()) {
                    let Some(url) = normalize_candidate(piece) else {
                        debug!(candidate = %piece, "Discarding URL candidate");
                        continue;
                    };
                    if seen.insert(url.clone()) {
                        urls.push(url);
                    }
                }
            }
        }

        debug!(count = urls.len(), "Extracted URLs from text");
        urls
    }

    pub fn contains_url(&self, text: &str) -> bool {
        !self.extract(text).is_empty()
    }
}

/// Shorthand for `UrlExtractor::new().extract(text)`.
pub fn extract_urls(text: &str) -> Vec<String> {
    UrlExtractor::new().extract(text)
}

fn starts_url(s: &str) -> bool {
    URL_STARTS.iter().any(|start| {
        s.get(..start.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(start))
    })
}

// "https://a.com,https://b.com" is what a paste of several links looks like,
// so split wherever a separator or a non-ASCII character is directly followed
// by a new URL start.
fn split_joined(candidate: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut start = 0;

    for (i, c) in candidate.char_indices() {
        if i > start && (JOIN_SEPARATORS.contains(&c) || !c.is_ascii()) {
            let next = i + c.len_utf8();
            if starts_url(&candidate[next..]) {
                pieces.push(&candidate[start..i]);
                start = next;
            }
        }
    }
    pieces.push(&candidate[start..]);
    pieces
}

// Hosts are ASCII here; anything else in the authority is the surrounding text.
fn cut_host(candidate: &str) -> &str {
    let authority_start = match candidate.find("://") {
        Some(i) if i <= "https".len() => i + 3,
        _ => 0,
    };

    for (i, c) in candidate[authority_start..].char_indices() {
        if matches!(c, '/' | '?' | '#') {
            break;
        }
        if !c.is_ascii() {
            return &candidate[..authority_start + i];
        }
    }
    candidate
}

fn trim_trailing(candidate: &str) -> &str {
    let mut s = candidate;
    while let Some(last) = s.chars().next_back() {
        let strip = match last {
            ')' => s.matches('(').count() < s.matches(')').count(),
            '）' => s.matches('（').count() < s.matches('）').count(),
            c => TRAILING_PUNCTUATION.contains(&c),
        };
        if !strip {
            break;
        }
        s = &s[..s.len() - last.len_utf8()];
    }
    s
}

fn normalize_candidate(candidate: &str) -> Option<String> {
    let trimmed = trim_trailing(cut_host(candidate));
    let text = if trimmed
        .get(..4)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("www."))
    {
        format!("http://{trimmed}")
    } else {
        trimmed.to_string()
    };

    let parsed = Url::parse(&text).ok()?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return None;
    }

    let plausible_host = match parsed.host()? {
        Host::Domain(domain) => {
            domain.eq_ignore_ascii_case("localhost")
                || (domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.'))
        }
        Host::Ipv4(_) | Host::Ipv6(_) => true,
    };

    plausible_host.then_some(text)
}
