use crate::error::Result;
use regex::Regex;

/// Mojibake emoji fragments seen in archived bodies
const EMOJI_ARTIFACTS: &[&str] = &[
    "\u{f0}\u{178}\u{a7}",
    "\u{f0}\u{178}\u{203a}\u{a0}",
    "\u{f0}\u{178}\u{a6}\u{2030}",
];

/// Mis-decoded byte sequences and their ASCII-safe replacements.
/// The apostrophe and left-quote forms must be repaired before the bare
/// two-character right-quote form, which is a prefix of both.
const MOJIBAKE_REPAIRS: &[(&str, &str)] = &[
    ("\u{e2}\u{20ac}\u{2122}", "'"),
    ("\u{e2}\u{20ac}\u{153}", "\""),
    ("\u{e2}\u{20ac}", "\""),
];

/// Cleans one free-text field: strips markup, repairs encoding artifacts,
/// drops markdown decoration, filters characters, and collapses whitespace.
///
/// Never fails on malformed input; `normalize(None)` is the empty string.
#[derive(Debug)]
pub struct TextNormalizer {
    block_re: Regex,
    void_re: Regex,
    tag_re: Regex,
    link_re: Regex,
    bold_re: Regex,
    emphasis_re: Regex,
    allowlist_re: Regex,
}

impl TextNormalizer {
    /// Create a normalizer. With `extended_punctuation` the character
    /// allowlist also retains colon, hyphen, and pipe, which line re-wrapping
    /// configurations rely on.
    pub fn new(extended_punctuation: bool) -> Result<Self> {
        let allowlist = if extended_punctuation {
            r"[^A-Za-z0-9\s.:\-|]"
        } else {
            r"[^A-Za-z0-9\s.]"
        };

        Ok(Self {
            // Headings and tables carry no useful free text; drop them wholesale
            block_re: Regex::new(r"(?is)<(?:h[1-6]|table)\b[^>]*>.*?</(?:h[1-6]|table)\s*>")?,
            void_re: Regex::new(r"(?i)<(?:hr|img)\b[^>]*>")?,
            tag_re: Regex::new(r"<[^>]+>")?,
            link_re: Regex::new(r"\[([^\]]+)\]\([^)]+\)")?,
            bold_re: Regex::new(r"\*\*([^*]+)\*\*")?,
            emphasis_re: Regex::new(r"\*([^*]+)\*")?,
            allowlist_re: Regex::new(allowlist)?,
        })
    }

    /// Normalize one free-text field
    pub fn normalize(&self, raw: Option<&str>) -> String {
        self.normalize_wrapped(raw, None)
    }

    /// Normalize and, if a width is given, greedily re-wrap the result into
    /// lines no wider than `max_width`, never splitting a word
    pub fn normalize_wrapped(&self, raw: Option<&str>, max_width: Option<usize>) -> String {
        let raw = match raw {
            Some(raw) => raw,
            None => return String::new(),
        };

        let text = self.block_re.replace_all(raw, " ");
        let text = self.void_re.replace_all(&text, " ");
        // Element boundaries become a single space so words never concatenate
        // across removed tags
        let text = self.tag_re.replace_all(&text, " ");

        let mut text = text.into_owned();
        for (broken, repaired) in MOJIBAKE_REPAIRS {
            text = text.replace(broken, repaired);
        }

        let text = self.link_re.replace_all(&text, "$1");
        let text = self.bold_re.replace_all(&text, "$1");
        let text = self.emphasis_re.replace_all(&text, "$1");

        let mut text = text.into_owned();
        for artifact in EMOJI_ARTIFACTS {
            text = text.replace(artifact, "");
        }

        // Coarse strip of residual multi-byte garbage; this is not a decoder
        text.retain(|c| c.is_ascii());

        let text = self.allowlist_re.replace_all(&text, "");
        let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");

        match max_width {
            Some(width) => wrap(&collapsed, width),
            None => collapsed,
        }
    }
}

/// Greedy word wrap; a word longer than the width gets its own line
fn wrap(text: &str, width: usize) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if !current.is_empty() && current.len() + 1 + word.len() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines.join("\n")
}
