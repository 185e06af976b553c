//! `#Create` / `#Update` / `#Replace` file-operation directives.
//!
//! A directive either names its file inline (``#Create `pom.xml` ``) or is an
//! instruction sentence whose file path follows on the next non-blank line:
//!
//! ```text
//! #Create the `SystemResource` class.#
//! `src/main/java/io/openliberty/sample/system/SystemResource.java`
//! ```
//!
//! Expansion produces an editor pointer to the file under `start/` and the
//! finished file's content, fetched from the guide's `finish/` directory.

use guideconverter_shared::{GuideConverterError, GuideRef, Result};

use crate::state::DirectiveKind;

/// First characters of block markup (`[role=…]`, `|===`, `====`) that never
/// start a file path.
const BLOCK_MARKERS: &[char] = &['[', '|', '='];

/// Where a directive's file path comes from.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum DirectiveTarget {
    /// The path was on the directive line itself.
    Inline(String),
    /// The directive is an instruction; the path is on a following line.
    Pending { instruction: String },
}

/// Split a directive line into its target.
pub(crate) fn parse(line: &str, kind: DirectiveKind) -> DirectiveTarget {
    let body = line.trim().trim_start_matches('#');
    let body = body.strip_suffix(" +").unwrap_or(body);
    let body = body.trim_end().trim_end_matches('#').trim();

    let rest = body
        .strip_prefix(&kind.marker()[1..])
        .unwrap_or(body)
        .replace('`', "");
    let rest = strip_touch(rest.trim());

    if !rest.is_empty() && !rest.contains(char::is_whitespace) {
        return DirectiveTarget::Inline(rest.to_string());
    }

    DirectiveTarget::Pending {
        instruction: body.to_string(),
    }
}

/// Read the file path from a continuation line.
pub(crate) fn parse_path(line: &str) -> Result<String> {
    let path = line.replace('`', "");
    let path = strip_touch(path.trim());

    if path.is_empty()
        || path.contains(char::is_whitespace)
        || path.starts_with(BLOCK_MARKERS)
        || !path.contains(char::is_alphanumeric)
    {
        return Err(GuideConverterError::malformed(format!(
            "expected a file path after directive, got '{line}'"
        )));
    }

    Ok(path.to_string())
}

/// Drop the shell `touch ` some guides put in front of a new file's path.
fn strip_touch(path: &str) -> &str {
    path.strip_prefix("touch ").map_or(path, str::trim)
}

/// The editor pointer shown before the file content.
pub(crate) fn pointer_block(guide: &GuideRef, path: &str) -> Vec<String> {
    vec![
        String::new(),
        format!("> [File -> Open]{}/start/{path}", guide.name),
        String::new(),
        String::new(),
    ]
}

/// Fence the fetched file, dropping comment and preprocessor lines.
pub(crate) fn snippet_block(lines: Vec<String>) -> Vec<String> {
    let mut block = vec!["```".to_string()];
    block.extend(lines.into_iter().filter(|line| keep_snippet_line(line)));
    block.extend(["```".to_string(), "{: codeblock}".to_string(), String::new()]);
    block
}

fn keep_snippet_line(line: &str) -> bool {
    let compact = line.replace(' ', "");
    !(compact.starts_with('/')
        || line.starts_with('*')
        || line.starts_with(" *")
        || line.starts_with('#'))
}
