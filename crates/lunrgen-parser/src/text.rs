//! Plain-text helpers shared by the parsers.

/// Inline elements whose tags are dropped without leaving a word break.
const INLINE_TAGS: &[&str] = &[
    "a", "abbr", "b", "cite", "code", "em", "i", "kbd", "mark", "q", "s", "small", "span",
    "strong", "sub", "sup", "u",
];

/// Collapse every run of whitespace into a single space and trim the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Strip HTML tags, comments, and `<script>`/`<style>` contents.
///
/// Block-level tags leave a space behind so that words from adjacent blocks
/// do not run together. A `<` that does not open a tag is kept as text.
pub fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;

    while let Some(start) = rest.find('<') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];

        if let Some(after) = tail.strip_prefix("<!--") {
            rest = after.find("-->").map_or("", |end| &after[end + 3..]);
            out.push(' ');
            continue;
        }

        let opens_tag = tail[1..]
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '/' || c == '!');
        let Some(end) = tail.find('>').filter(|_| opens_tag) else {
            out.push('<');
            rest = &tail[1..];
            continue;
        };

        let tag = &tail[1..end];
        let name = tag_name(tag);
        rest = &tail[end + 1..];

        if matches!(name.as_str(), "script" | "style") && !tag.starts_with('/') {
            let closing = format!("</{name}");
            let remaining = rest;
            rest = remaining
                .to_ascii_lowercase()
                .find(&closing)
                .and_then(|pos| {
                    remaining[pos..]
                        .find('>')
                        .map(|e| &remaining[pos + e + 1..])
                })
                .unwrap_or("");
            out.push(' ');
            continue;
        }

        if !INLINE_TAGS.contains(&name.as_str()) {
            out.push(' ');
        }
    }

    out.push_str(rest);
    out
}

fn tag_name(tag: &str) -> String {
    tag.trim_start_matches('/')
        .chars()
        .take_while(char::is_ascii_alphanumeric)
        .collect::<String>()
        .to_ascii_lowercase()
}

/// Decode the common named entities and numeric character references.
///
/// Unknown entities are left as they are.
pub fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];

        let decoded = tail
            .find(';')
            .filter(|&semi| semi <= 10)
            .and_then(|semi| decode_entity(&tail[1..semi]).map(|c| (c, semi)));

        match decoded {
            Some((c, semi)) => {
                out.push(c);
                rest = &tail[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

fn decode_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let num = name.strip_prefix('#')?;
            let code = match num.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => num.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  a \n\n b\t c  "), "a b c");
        assert_eq!(collapse_whitespace(" \n "), "");
    }

    #[test]
    fn test_strip_tags_blocks_leave_space() {
        let html = "<h2>Introduction</h2><p>In this <em>vignette</em></p>";
        assert_eq!(
            collapse_whitespace(&strip_tags(html)),
            "Introduction In this vignette"
        );
    }

    #[test]
    fn test_strip_tags_inline_no_space() {
        assert_eq!(strip_tags("bal<strong>seq</strong>"), "balseq");
        assert_eq!(strip_tags("line<br/>break"), "line break");
    }

    #[test]
    fn test_strip_tags_drops_script_style_and_comments() {
        let html = "a<script type=\"x\">var s = '<p>';</script>b<STYLE>p{}</STYLE>c<!-- note -->d";
        assert_eq!(collapse_whitespace(&strip_tags(html)), "a b c d");
    }

    #[test]
    fn test_strip_tags_keeps_comparison() {
        assert_eq!(strip_tags("n < N and p > 0"), "n < N and p > 0");
        assert_eq!(strip_tags("x <1"), "x <1");
    }

    #[test]
    fn test_decode_entities() {
        assert_eq!(decode_entities("a &amp; b &lt;c&gt;"), "a & b <c>");
        assert_eq!(decode_entities("Till&#233; &#x2014; ok"), "Tillé — ok");
        assert_eq!(decode_entities("AT&T &bogus; &"), "AT&T &bogus; &");
    }
}
