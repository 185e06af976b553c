//! `<url>[description^]` link references.

use std::sync::LazyLock;

use guideconverter_shared::{GuideConverterError, Result};
use regex::{Captures, Regex};
use url::Url;

/// Marker of an AsciiDoc link that opens in a new window.
pub(crate) const LINK_MARKER: &str = "^]";

/// Punctuation that makes a line a sentence rather than a bare reference.
const SENTENCE_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?'];

/// `[link:]<target>[<description>^…]`. The target is the token before `[`:
/// an absolute URL or a site-relative path.
static LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:link:)?(?P<url>[^\s\[\]()]+)\[(?P<desc>[^\]\^]*)\^[^\]]*\]",
    )
    .expect("valid regex")
});

/// A rewritten link line.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum LinkLine {
    /// Every reference became `[description](url)`.
    Inline { line: String, links: usize },
    /// A `localhost` reference became a `curl` command. `before` and `after`
    /// are the text around it. When `sentence` is set the text is rejoined and
    /// the command follows it; otherwise the command takes the reference's
    /// place.
    Command {
        before: String,
        after: String,
        url: String,
        sentence: bool,
        links: usize,
    },
}

/// Rewrite the link references in a line containing [`LINK_MARKER`].
pub(crate) fn rewrite(line: &str) -> Result<LinkLine> {
    let cleaned = line.replace(['{', '}'], "");

    let Some(first_local) = LINK_RE
        .captures_iter(&cleaned)
        .find(|caps| is_localhost(&caps["url"]))
    else {
        let links = LINK_RE.find_iter(&cleaned).count();
        if links == 0 {
            return Err(GuideConverterError::malformed(format!(
                "no link reference in '{line}'"
            )));
        }
        return Ok(LinkLine::Inline {
            line: inline_links(&cleaned),
            links,
        });
    };

    let Some(whole) = first_local.get(0) else {
        return Err(GuideConverterError::malformed(format!(
            "no link reference in '{line}'"
        )));
    };
    let url = first_local["url"].to_string();
    let before = inline_links(&cleaned[..whole.start()]);
    let after = inline_links(&cleaned[whole.end()..]);
    let sentence = before.contains(SENTENCE_PUNCTUATION) || after.contains(SENTENCE_PUNCTUATION);
    let links = LINK_RE.find_iter(&cleaned).count();

    Ok(LinkLine::Command {
        before,
        after,
        url,
        sentence,
        links,
    })
}

/// The fenced `curl` block for a local endpoint.
pub(crate) fn curl_block(url: &str) -> Vec<String> {
    vec![
        "```".to_string(),
        format!("curl {url}"),
        "```".to_string(),
        "{: codeblock}".to_string(),
        String::new(),
    ]
}

/// Join the text around a removed reference into one sentence.
pub(crate) fn rebuild_sentence(before: &str, after: &str) -> String {
    let before = before.trim_end();
    let after = after.trim_start();
    let needs_space = !before.is_empty()
        && !after.is_empty()
        && !after.starts_with(SENTENCE_PUNCTUATION);
    if needs_space {
        format!("{before} {after}")
    } else {
        format!("{before}{after}")
    }
}

fn inline_links(text: &str) -> String {
    LINK_RE
        .replace_all(text, |caps: &Captures| {
            format!("[{}]({})", &caps["desc"], &caps["url"])
        })
        .into_owned()
}

fn is_localhost(url: &str) -> bool {
    match Url::parse(url) {
        Ok(parsed) => parsed.host_str() == Some("localhost"),
        // Unparsable ports left behind by attribute placeholders.
        Err(_) => url
            .split_once("://")
            .is_some_and(|(_, rest)| rest.starts_with("localhost")),
    }
}
