//! Text-fragment URLs (`#anchor:~:text=start,end`).

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use url::Url;

const TEXT_DIRECTIVE: &str = ":~:text=";

/// Selections up to this many words are quoted whole
const MAX_EXACT_WORDS: usize = 8;

/// Words kept from each end of a longer selection
const EDGE_WORDS: usize = 4;

/// Characters escaped inside a text directive. `-`, `,` and `&` are
/// directive syntax, so only the unreserved marks stay literal.
const DIRECTIVE_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC.remove(b'.').remove(b'_').remove(b'~');

/// Remove a `:~:text=` directive and everything after it from the fragment.
/// A trailing `&` left before the directive goes too, and the fragment is
/// dropped entirely when nothing remains.
pub fn strip_text_directive(url: &mut Url) {
    let Some(fragment) = url.fragment() else {
        return;
    };
    let Some(index) = fragment.find(TEXT_DIRECTIVE) else {
        return;
    };

    let anchor = fragment[..index].strip_suffix('&').unwrap_or(&fragment[..index]);
    if anchor.is_empty() {
        url.set_fragment(None);
    } else {
        let anchor = anchor.to_string();
        url.set_fragment(Some(&anchor));
    }
}

/// Directive (`text=...`) that highlights `text`, or `None` when it has no
/// words.
pub fn text_directive(text: &str) -> Option<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return None;
    }

    if words.len() <= MAX_EXACT_WORDS {
        return Some(format!("text={}", encode(&words.join(" "))));
    }

    let start = words[..EDGE_WORDS].join(" ");
    let end = words[words.len() - EDGE_WORDS..].join(" ");
    Some(format!("text={},{}", encode(&start), encode(&end)))
}

/// `url` with any existing text directive replaced by one for `text`.
/// Without usable text the URL comes back stripped.
pub fn with_text_directive(url: &Url, text: &str) -> Url {
    let mut target = url.clone();
    strip_text_directive(&mut target);

    if let Some(directive) = text_directive(text) {
        let anchor = target.fragment().unwrap_or("").to_string();
        target.set_fragment(Some(&format!("{anchor}:~:{directive}")));
    }

    target
}

fn encode(text: &str) -> String {
    utf8_percent_encode(text, DIRECTIVE_ENCODE_SET).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    fn stripped(s: &str) -> String {
        let mut u = url(s);
        strip_text_directive(&mut u);
        u.to_string()
    }

    #[test]
    fn test_strip_directive_only() {
        assert_eq!(
            stripped("https://example.com/page#:~:text=hello"),
            "https://example.com/page"
        );
    }

    #[test]
    fn test_strip_keeps_anchor() {
        assert_eq!(
            stripped("https://example.com/page#intro:~:text=hello,world"),
            "https://example.com/page#intro"
        );
        assert_eq!(
            stripped("https://example.com/page#intro&:~:text=hello"),
            "https://example.com/page#intro"
        );
    }

    #[test]
    fn test_strip_leaves_other_urls() {
        assert_eq!(stripped("https://example.com/page#intro"), "https://example.com/page#intro");
        assert_eq!(stripped("https://example.com/?q=1"), "https://example.com/?q=1");
    }

    #[test]
    fn test_short_directive() {
        assert_eq!(
            text_directive("  Hello,   brave-new world "),
            Some("text=Hello%2C%20brave%2Dnew%20world".to_string())
        );
        assert_eq!(text_directive(" \n "), None);
    }

    #[test]
    fn test_long_directive_uses_range() {
        let text = "one two three four five six seven eight nine ten";
        assert_eq!(
            text_directive(text),
            Some("text=one%20two%20three%20four,seven%20eight%20nine%20ten".to_string())
        );
    }

    #[test]
    fn test_with_text_directive() {
        let source = url("https://example.com/post#part:~:text=old");
        assert_eq!(
            with_text_directive(&source, "new text").as_str(),
            "https://example.com/post#part:~:text=new%20text"
        );
        assert_eq!(
            with_text_directive(&url("https://example.com/post"), "x").as_str(),
            "https://example.com/post#:~:text=x"
        );
        assert_eq!(
            with_text_directive(&source, "").as_str(),
            "https://example.com/post#part"
        );
    }
}
