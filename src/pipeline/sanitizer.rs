//! Markdown-to-speech sanitizer.
//!
//! Rewrites model output into plain text that a speech synthesizer can read
//! aloud. The passes run in a fixed order: later passes assume earlier ones
//! have already reduced the text to plain runs (emphasis unwrapping must see
//! intact spans before list markers are stripped, newline collapsing must run
//! after every line-oriented pass).
//!
//! Malformed input degrades gracefully: an unterminated fence, emphasis span
//! or link stays in the output as literal characters.

use crate::defaults::CODE_BLOCK_PLACEHOLDER;

/// Rewrites `text` into a speech-safe plain-text form.
///
/// Returns an empty string when nothing speakable remains. Interior
/// whitespace collapses to single spaces; a leading or trailing run survives
/// as one space so that consecutive stream segments concatenate cleanly.
pub fn sanitize(text: &str) -> String {
    let text = replace_code_fences(text);
    let text = strip_table_rows(&text);
    let text = rewrite_links(&text);
    let text = strip_raw_urls(&text);
    let text = unwrap_spans(&text, "**", '*');
    let text = unwrap_spans(&text, "*", '*');
    let text = unwrap_spans(&text, "`", '`');
    let text = strip_heading_markers(&text);
    let text = strip_bullet_markers(&text);
    let text = strip_numbered_markers(&text);
    let text = strip_pictographs(&text);
    let text = collapse_newlines(&text);
    let text = collapse_whitespace(&text);
    if text.trim().is_empty() { String::new() } else { text }
}

/// Replaces each fenced code block with the spoken placeholder.
///
/// Fences are matched non-greedily; a fence with no closing delimiter is
/// left untouched.
fn replace_code_fences(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(open) = rest.find("```") {
        match rest[open + 3..].find("```") {
            Some(close) => {
                out.push_str(&rest[..open]);
                out.push_str(CODE_BLOCK_PLACEHOLDER);
                rest = &rest[open + 3 + close + 3..];
            }
            None => break,
        }
    }
    out.push_str(rest);
    out
}

/// Removes pipe-delimited table rows.
///
/// A row is a line with two pipes and at least one character between them;
/// everything from the first pipe through the last is dropped.
fn strip_table_rows(text: &str) -> String {
    map_lines(text, |line| {
        if let (Some(first), Some(last)) = (line.find('|'), line.rfind('|'))
            && last > first + 1
        {
            let mut kept = String::with_capacity(line.len());
            kept.push_str(&line[..first]);
            kept.push_str(&line[last + 1..]);
            return kept;
        }
        line.to_string()
    })
}

/// Rewrites `[label](url)` to `label`.
fn rewrite_links(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(open) = rest.find('[') {
        if let Some(close) = rest[open + 1..].find(']')
            && close > 0
        {
            let label_end = open + 1 + close;
            let after = &rest[label_end + 1..];
            if let Some(stripped) = after.strip_prefix('(')
                && let Some(paren) = stripped.find(')')
                && paren > 0
            {
                out.push_str(&rest[..open]);
                out.push_str(&rest[open + 1..label_end]);
                rest = &stripped[paren + 1..];
                continue;
            }
        }
        // Not a link — the bracket stays literal.
        out.push_str(&rest[..=open]);
        rest = &rest[open + 1..];
    }
    out.push_str(rest);
    out
}

/// Removes raw `http(s)://` URLs through the next whitespace.
fn strip_raw_urls(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = find_scheme(rest) {
        let scheme_len = if rest[start..].starts_with("https://") {
            8
        } else {
            7
        };
        let after = &rest[start + scheme_len..];
        let url_len = after.find(char::is_whitespace).unwrap_or(after.len());
        if url_len == 0 {
            // A bare scheme with nothing attached is not a URL.
            out.push_str(&rest[..start + scheme_len]);
        } else {
            out.push_str(&rest[..start]);
        }
        rest = &after[url_len..];
    }
    out.push_str(rest);
    out
}

fn find_scheme(s: &str) -> Option<usize> {
    match (s.find("http://"), s.find("https://")) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

/// Unwraps `<delim>content<delim>` spans, keeping only the content.
///
/// Content must be non-empty and free of `forbidden` (the delimiter
/// character), matching the way emphasis actually nests in markdown. On any
/// failed match the delimiter character stays literal and scanning resumes
/// one character later, so stray markers survive unchanged.
fn unwrap_spans(text: &str, delim: &str, forbidden: char) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(open) = rest.find(delim) {
        let content = &rest[open + delim.len()..];
        match content.find(forbidden) {
            Some(stop) if stop > 0 && content[stop..].starts_with(delim) => {
                out.push_str(&rest[..open]);
                out.push_str(&content[..stop]);
                rest = &content[stop + delim.len()..];
            }
            _ => {
                out.push_str(&rest[..=open]);
                rest = &rest[open + 1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Strips up to six leading `#` markers (plus following whitespace) per line.
fn strip_heading_markers(text: &str) -> String {
    map_lines(text, |line| {
        let hashes = line.chars().take_while(|&c| c == '#').count().min(6);
        if hashes == 0 {
            return line.to_string();
        }
        line[hashes..].trim_start().to_string()
    })
}

/// Strips a leading `-` or `*` bullet marker (plus following whitespace) per line.
fn strip_bullet_markers(text: &str) -> String {
    map_lines(text, |line| {
        if let Some(rest) = line.strip_prefix(['-', '*'])
            && rest.starts_with(char::is_whitespace)
        {
            return rest.trim_start().to_string();
        }
        line.to_string()
    })
}

/// Strips a leading `N.` numbered-list marker (plus following whitespace) per line.
fn strip_numbered_markers(text: &str) -> String {
    map_lines(text, |line| {
        let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
        if digits > 0
            && let Some(rest) = line[digits..].strip_prefix('.')
            && rest.starts_with(char::is_whitespace)
        {
            return rest.trim_start().to_string();
        }
        line.to_string()
    })
}

/// True for code points a synthesizer cannot speak: pictographs, symbol and
/// dingbat blocks, variation selectors, and the zero-width joiner.
fn is_pictograph(c: char) -> bool {
    matches!(c,
        '\u{1F300}'..='\u{1F9FF}'
            | '\u{2600}'..='\u{26FF}'
            | '\u{2700}'..='\u{27BF}'
            | '\u{FE00}'..='\u{FE0F}'
            | '\u{200D}')
}

fn strip_pictographs(text: &str) -> String {
    text.chars().filter(|c| !is_pictograph(*c)).collect()
}

/// Collapses newline runs: two or more become a spoken pause (". "), a
/// single newline becomes a space.
fn collapse_newlines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\n' {
            out.push(c);
            continue;
        }
        let mut run = 1;
        while chars.peek() == Some(&'\n') {
            chars.next();
            run += 1;
        }
        if run >= 2 {
            out.push_str(". ");
        } else {
            out.push(' ');
        }
    }
    out
}

/// Collapses every whitespace run into a single space.
///
/// Leading and trailing runs survive as one space each; stream segments are
/// concatenated downstream and must keep their word boundaries.
fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_run = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !in_run {
                out.push(' ');
            }
            in_run = true;
        } else {
            out.push(c);
            in_run = false;
        }
    }
    out
}

fn map_lines(text: &str, f: impl Fn(&str) -> String) -> String {
    let mut out = String::with_capacity(text.len());
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&f(line));
    }
    out
}
