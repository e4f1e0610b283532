//! Text helpers shared by the scorers and every pattern.
//!
//! Everything here is a pure function over `&str`: tokenization, stop word
//! filtering, sentence splitting, section detection, code-aware prose
//! rewriting and markdown rendering.
//! Patterns compose these helpers instead of inheriting them.

/// English stop words, used to separate content words from noise.
const STOPWORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "nor", "for", "yet", "so", "i", "you", "he", "she", "it",
    "we", "they", "me", "him", "her", "us", "them", "my", "your", "his", "its", "our", "their",
    "mine", "yours", "hers", "ours", "theirs", "this", "that", "these", "those", "who", "whom",
    "which", "what", "whose", "is", "am", "are", "was", "were", "be", "been", "being", "have",
    "has", "had", "having", "do", "does", "did", "doing", "will", "would", "shall", "should",
    "can", "could", "may", "might", "must", "in", "on", "at", "to", "from", "by", "with", "about",
    "against", "between", "into", "through", "during", "before", "after", "above", "below", "up",
    "down", "out", "off", "over", "under", "again", "further", "here", "there", "where", "when",
    "why", "how", "all", "each", "every", "both", "few", "more", "most", "other", "some", "any",
    "no", "not", "only", "own", "same", "than", "too", "very", "just", "also", "now", "then",
    "once", "always", "never", "if", "because", "as", "until", "while", "although", "though",
    "yes", "maybe", "of", "s", "t", "ve", "re", "ll", "d", "m",
];

/// Check if a word (any case) is a stop word
pub fn is_stopword(word: &str) -> bool {
    let lower = word.to_lowercase();
    STOPWORDS.contains(&lower.as_str())
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '\''
}

/// Tokenize text into words, dropping punctuation
pub fn words(text: &str) -> Vec<&str> {
    text.split(|c: char| !is_word_char(c) && c != '-')
        .map(|w| w.trim_matches(|c: char| c == '-' || c == '\''))
        .filter(|w| !w.is_empty())
        .collect()
}

pub fn word_count(text: &str) -> usize {
    words(text).len()
}

/// Number of words that carry meaning (not stop words)
pub fn content_word_count(text: &str) -> usize {
    words(text).into_iter().filter(|w| !is_stopword(w)).count()
}

/// Split text into trimmed sentences.
///
/// A sentence ends at `.`, `!` or `?` followed by whitespace (or end of input),
/// and at every line break. Markdown bullet markers are kept as-is.
pub fn sentences(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\n' {
            push_sentence(&mut out, &mut current);
            continue;
        }
        current.push(c);
        if matches!(c, '.' | '!' | '?') {
            let at_boundary = chars.peek().map_or(true, |next| next.is_whitespace());
            if at_boundary {
                push_sentence(&mut out, &mut current);
            }
        }
    }
    push_sentence(&mut out, &mut current);
    out
}

fn push_sentence(out: &mut Vec<String>, current: &mut String) {
    let trimmed = current.trim();
    if !trimmed.is_empty() {
        out.push(trimmed.to_string());
    }
    current.clear();
}

/// Strip trailing sentence punctuation
pub fn strip_terminal_punctuation(sentence: &str) -> &str {
    sentence.trim_end_matches(|c: char| matches!(c, '.' | '!' | '?' | ',' | ';' | ':'))
}

/// Whole-phrase, boundary-aware search in an already lowercased haystack.
///
/// `"or"` does not match inside `"for"`; multi-word phrases match verbatim.
pub fn contains_phrase(lower: &str, phrase: &str) -> bool {
    count_phrase(lower, phrase) > 0
}

/// Number of boundary-aware occurrences of `phrase` in `lower`
pub fn count_phrase(lower: &str, phrase: &str) -> usize {
    if phrase.is_empty() {
        return 0;
    }
    let mut count = 0;
    let mut start = 0;
    while let Some(pos) = lower[start..].find(phrase) {
        let begin = start + pos;
        let end = begin + phrase.len();
        let before_ok = lower[..begin]
            .chars()
            .next_back()
            .map_or(true, |c| !is_word_char(c));
        let after_ok = lower[end..].chars().next().map_or(true, |c| !is_word_char(c));
        if before_ok && after_ok {
            count += 1;
        }
        start = end;
    }
    count
}

/// True if any of the phrases occurs in `lower`
pub fn contains_any(lower: &str, phrases: &[&str]) -> bool {
    phrases.iter().any(|p| contains_phrase(lower, p))
}

/// How many distinct phrases of the list occur in `lower`
pub fn count_distinct(lower: &str, phrases: &[&str]) -> usize {
    phrases.iter().filter(|p| contains_phrase(lower, p)).count()
}

/// Phrases of the list that occur in `lower`, in list order
pub fn matching<'a>(lower: &str, phrases: &[&'a str]) -> Vec<&'a str> {
    phrases
        .iter()
        .copied()
        .filter(|p| contains_phrase(lower, p))
        .collect()
}

/// Detect a section introduced by a markdown heading (`# Name`, `## Name`, ...)
/// or a label line (`Name:`), case-insensitively.
pub fn has_section(text: &str, name: &str) -> bool {
    let name = name.to_lowercase();
    text.lines().any(|line| {
        let line = line.trim().to_lowercase();
        let heading = line.trim_start_matches('#');
        if heading.len() != line.len() {
            return heading.trim().strip_prefix(name.as_str()).is_some_and(|rest| {
                rest.is_empty() || rest.starts_with(|c: char| c == ':' || c.is_whitespace())
            });
        }
        line.starts_with(&name) && line[name.len()..].trim_start().starts_with(':')
    })
}

/// True if any line is a markdown heading
pub fn has_heading(text: &str) -> bool {
    text.lines().any(|l| l.trim_start().starts_with('#'))
}

fn is_list_line(line: &str) -> bool {
    let line = line.trim_start();
    if line.starts_with("- ") || line.starts_with("* ") {
        return true;
    }
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    digits > 0 && line[digits..].starts_with(". ")
}

/// True if the text contains at least one bullet or numbered list line
pub fn has_list(text: &str) -> bool {
    text.lines().any(is_list_line)
}

/// Remove a leading `- `, `* ` or `1. ` list marker
pub fn strip_list_marker(line: &str) -> &str {
    let line = line.trim_start();
    if let Some(rest) = line.strip_prefix("- ").or_else(|| line.strip_prefix("* ")) {
        return rest.trim_start();
    }
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        if let Some(rest) = line[digits..].strip_prefix(". ") {
            return rest.trim_start();
        }
    }
    line
}

/// Headings or lists anywhere in the text
pub fn has_markdown_structure(text: &str) -> bool {
    has_heading(text) || has_list(text)
}

/// Render a markdown section with one bullet per item
pub fn render_section(heading: &str, items: &[String]) -> String {
    let mut block = format!("## {}\n", heading);
    for item in items {
        block.push_str("\n- ");
        block.push_str(item);
    }
    block
}

/// Append a rendered block after the prompt, separated by a blank line
pub fn append_block(prompt: &str, block: &str) -> String {
    let body = prompt.trim_end();
    if body.is_empty() {
        return block.to_string();
    }
    format!("{}\n\n{}", body, block)
}

/// Markers standing in for inline code spans while prose is rewritten
const SPAN_OPEN: char = '\u{E000}';
const SPAN_CLOSE: char = '\u{E001}';

fn is_fence(line: &str) -> bool {
    let line = line.trim_start();
    line.starts_with("```") || line.starts_with("~~~")
}

/// True if any line opens or closes a fenced code block
pub fn has_code_fence(text: &str) -> bool {
    text.lines().any(is_fence)
}

/// Replace each `` `code` `` span with a numbered marker
fn mask_inline_code(line: &str) -> (String, Vec<&str>) {
    let mut masked = String::with_capacity(line.len());
    let mut spans = Vec::new();
    let mut rest = line;
    while let Some(start) = rest.find('`') {
        let after = &rest[start + 1..];
        let Some(len) = after.find('`') else { break };
        masked.push_str(&rest[..start]);
        masked.push(SPAN_OPEN);
        masked.push_str(&spans.len().to_string());
        masked.push(SPAN_CLOSE);
        spans.push(&rest[start..start + len + 2]);
        rest = &after[len + 1..];
    }
    masked.push_str(rest);
    (masked, spans)
}

fn unmask_inline_code(text: &str, spans: &[&str]) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find(SPAN_OPEN) {
        let after = &rest[start + SPAN_OPEN.len_utf8()..];
        let Some(end) = after.find(SPAN_CLOSE) else { break };
        let marker_end = start + SPAN_OPEN.len_utf8() + end + SPAN_CLOSE.len_utf8();
        match after[..end].parse::<usize>().ok().and_then(|i| spans.get(i)) {
            Some(span) => {
                out.push_str(&rest[..start]);
                out.push_str(span);
            }
            None => out.push_str(&rest[..marker_end]),
        }
        rest = &rest[marker_end..];
    }
    out.push_str(rest);
    out
}

/// Rewrite the prose of a prompt line by line, leaving code alone.
///
/// Lines inside ```` ``` ```` or `~~~` fences (fence lines included) pass
/// through byte for byte. Inline `` `code` `` spans are hidden from `rewrite`
/// behind markers and restored afterwards. Returning `None` drops the line.
pub fn rewrite_prose(text: &str, mut rewrite: impl FnMut(&str) -> Option<String>) -> String {
    let mut out = Vec::new();
    let mut in_fence = false;
    for line in text.split('\n') {
        if is_fence(line) {
            in_fence = !in_fence;
            out.push(line.to_string());
            continue;
        }
        if in_fence {
            out.push(line.to_string());
            continue;
        }
        let (masked, spans) = mask_inline_code(line);
        if let Some(rewritten) = rewrite(&masked) {
            out.push(unmask_inline_code(&rewritten, &spans));
        }
    }
    out.join("\n")
}

/// Uppercase the first character
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Collapse runs of spaces and tabs inside each line, keep line structure
pub fn collapse_spaces(text: &str) -> String {
    text.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Keep at most `max` items
pub fn cap<T>(mut items: Vec<T>, max: usize) -> Vec<T> {
    items.truncate(max);
    items
}
