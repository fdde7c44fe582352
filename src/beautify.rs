//! Streaming re-indenter for the markup the renderer emits.
//!
//! This is not a general XML pretty-printer. It splits on tag delimiters,
//! tracks nesting depth from tag shapes alone, and passes CDATA runs through
//! untouched.

use once_cell::sync::Lazy;
use regex::Regex;

pub const DEFAULT_INDENT: &str = "    ";

const VERBATIM_START: &str = "<![CDATA[";
const VERBATIM_END: &str = "]]>";

static TAG_SPLIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"</?[^>]+>").unwrap());
static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>!]+>").unwrap());
static DECLARATION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<\?[^?>]+\?>").unwrap());
static CLOSING_TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"</+[^>]+>").unwrap());
static SELF_CLOSING_TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+/>").unwrap());
static SPACE_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"  +").unwrap());

/// Splits `markup` right before and after every tag, dropping
/// whitespace-only pieces.
fn split_on_tags(markup: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut last = 0;
    for tag in TAG_SPLIT_RE.find_iter(markup) {
        tokens.push(&markup[last..tag.start()]);
        tokens.push(tag.as_str());
        last = tag.end();
    }
    tokens.push(&markup[last..]);
    tokens.retain(|token| !token.trim().is_empty());
    tokens
}

fn is_closing_tag(token: &str) -> bool {
    CLOSING_TAG_RE.is_match(token)
}

fn is_opening_tag(token: &str) -> bool {
    TAG_RE.is_match(token)
        && !is_closing_tag(token)
        && !SELF_CLOSING_TAG_RE.is_match(token)
        && !DECLARATION_RE.is_match(token)
}

/// Re-indents `markup` with `indent` per nesting level, one tag or text run
/// per line.
///
/// Tokens from a `<![CDATA[` marker up to the matching `]]>` are concatenated
/// and emitted as a single line without any re-indentation. A run that is
/// never closed is emitted as-is at the end.
pub fn beautify(markup: &str, indent: &str) -> String {
    let mut depth: isize = 0;
    let mut verbatim = false;
    let mut deferred = String::new();
    let mut lines: Vec<String> = Vec::new();

    for token in split_on_tags(markup) {
        let trimmed = token.trim();
        if trimmed.starts_with(VERBATIM_START) {
            verbatim = true;
        }
        if trimmed.ends_with(VERBATIM_END) {
            if !verbatim {
                tracing::warn!(token = trimmed, "verbatim end marker without a start marker");
            }
            verbatim = false;
            deferred.push_str(token);
            lines.push(std::mem::take(&mut deferred));
            continue;
        }
        if verbatim {
            deferred.push_str(token);
            continue;
        }

        // only the first run of repeated spaces is collapsed
        let item = SPACE_RUN_RE.replace(trimmed, " ");

        if is_closing_tag(&item) {
            depth -= 1;
        }
        lines.push(format!("{}{}", indent.repeat(depth.max(0) as usize), item));
        if is_opening_tag(&item) {
            depth += 1;
        }
    }

    if !deferred.is_empty() {
        tracing::warn!("unterminated verbatim block at end of markup");
        lines.push(deferred);
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn self_closing_does_not_nest() {
        assert_eq!(beautify("<g><rect/></g>", "  "), "<g>\n  <rect/>\n</g>");
    }

    #[test]
    fn text_content_sits_one_level_in() {
        assert_eq!(
            beautify(r#"<svg><g transform="translate(0,0)"><text x="1">hi</text></g></svg>"#, DEFAULT_INDENT),
            [
                "<svg>",
                "    <g transform=\"translate(0,0)\">",
                "        <text x=\"1\">",
                "            hi",
                "        </text>",
                "    </g>",
                "</svg>",
            ]
            .join("\n")
        );
    }

    #[test]
    fn whitespace_between_tags_is_dropped() {
        assert_eq!(beautify("  <a>\n   \n<b/>  </a>\n", "\t"), "<a>\n\t<b/>\n</a>");
    }

    #[test]
    fn only_first_space_run_collapses() {
        assert_eq!(
            beautify("<rect  id=\"a\"   class=\"b\"/>", "  "),
            "<rect id=\"a\"   class=\"b\"/>"
        );
    }

    #[test]
    fn declarations_and_comments_do_not_nest() {
        assert_eq!(
            beautify("<?xml version=\"1.0\"?><!-- note --><svg><g/></svg>", "  "),
            "<?xml version=\"1.0\"?>\n<!-- note -->\n<svg>\n  <g/>\n</svg>"
        );
    }

    #[test]
    fn cdata_passes_through_unchanged() {
        let markup = "<defs><style><![CDATA[\n  g.port > text {\n    font-size: 8px;\n  }\n]]></style></defs>";
        assert_eq!(
            beautify(markup, "  "),
            [
                "<defs>",
                "  <style>",
                "<![CDATA[\n  g.port > text {\n    font-size: 8px;\n  }\n]]>",
                "  </style>",
                "</defs>",
            ]
            .join("\n")
        );
    }

    #[test]
    fn single_token_cdata_is_one_line() {
        assert_eq!(
            beautify("<style><![CDATA[a{b:c}]]></style>", "  "),
            "<style>\n<![CDATA[a{b:c}]]>\n</style>"
        );
    }

    #[test]
    fn consecutive_cdata_blocks_do_not_leak() {
        let markup = "<a><![CDATA[one]]></a><b><![CDATA[two]]></b>";
        assert_eq!(
            beautify(markup, "  "),
            "<a>\n<![CDATA[one]]>\n</a>\n<b>\n<![CDATA[two]]>\n</b>"
        );
    }

    #[test]
    fn unterminated_cdata_is_flushed_at_end() {
        assert_eq!(
            beautify("<a><![CDATA[x > y<b>", "  "),
            "<a>\n<![CDATA[x > y<b>"
        );
    }

    #[test]
    fn extra_closing_tags_do_not_indent_negatively() {
        assert_eq!(beautify("</a></b><c/>", "  "), "</a>\n</b>\n<c/>");
    }

    #[test]
    fn reindenting_is_idempotent() {
        let raw = r#"<svg width="10"><defs/><g transform="translate(0,0)"><rect id="a"/><g><text>t</text></g></g></svg>"#;
        let once = beautify(raw, DEFAULT_INDENT);
        let flattened: String = once.lines().map(str::trim).collect();
        assert_eq!(beautify(&flattened, DEFAULT_INDENT), once);
    }
}
