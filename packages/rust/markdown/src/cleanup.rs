//! Serializer: join the converted lines and tidy the document.
//!
//! Each cleanup pass is a function `&str -> String` applied in sequence.

const FENCE: &str = "```";

/// Consecutive blank lines kept outside fenced code.
const MAX_BLANK_RUN: usize = 2;

/// Join converted lines into the final Markdown document.
pub(crate) fn serialize(lines: &[String]) -> String {
    let mut result = lines.join("\n");

    result = strip_leading_blank_lines(&result);
    result = normalize_whitespace(&result);
    result = clean_blank_lines(&result);
    result = ensure_trailing_newline(&result);

    result
}

// ---------------------------------------------------------------------------
// Pass 1: Drop blank lines before the title
// ---------------------------------------------------------------------------

fn strip_leading_blank_lines(md: &str) -> String {
    md.trim_start_matches(['\n', ' ']).to_string()
}

// ---------------------------------------------------------------------------
// Pass 2: Normalize whitespace
// ---------------------------------------------------------------------------

/// Clean up trailing whitespace on lines. Fenced code is left as fetched.
fn normalize_whitespace(md: &str) -> String {
    let mut in_code_block = false;

    md.lines()
        .map(|line| {
            if is_fence(line) {
                in_code_block = !in_code_block;
                return line.trim_end();
            }
            if in_code_block { line } else { line.trim_end() }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

// ---------------------------------------------------------------------------
// Pass 3: Clean up excessive blank lines
// ---------------------------------------------------------------------------

/// Collapse runs of 3+ blank lines into exactly 2, outside fenced code.
fn clean_blank_lines(md: &str) -> String {
    let mut kept: Vec<&str> = Vec::new();
    let mut in_code_block = false;
    let mut blank_run = 0;

    for line in md.lines() {
        if is_fence(line) {
            in_code_block = !in_code_block;
        }
        if in_code_block || !line.is_empty() {
            blank_run = 0;
            kept.push(line);
            continue;
        }

        blank_run += 1;
        if blank_run <= MAX_BLANK_RUN {
            kept.push(line);
        }
    }

    kept.join("\n")
}

fn is_fence(line: &str) -> bool {
    line.trim_start().starts_with(FENCE)
}

// ---------------------------------------------------------------------------
// Pass 4: Ensure trailing newline
// ---------------------------------------------------------------------------

/// Ensure the file ends with exactly one newline.
fn ensure_trailing_newline(md: &str) -> String {
    let trimmed = md.trim_end_matches('\n');
    format!("{trimmed}\n")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_blank_lines_collapses_excess() {
        let input = "Line 1\n\n\n\n\nLine 2";
        let result = clean_blank_lines(input);
        assert_eq!(result, "Line 1\n\n\nLine 2");
    }

    #[test]
    fn clean_blank_lines_keeps_double() {
        let input = "Line 1\n\nLine 2";
        let result = clean_blank_lines(input);
        assert_eq!(result, input);
    }

    #[test]
    fn normalize_whitespace_trims_trailing() {
        let input = "Line 1   \nLine 2\t\nLine 3";
        let result = normalize_whitespace(input);
        assert_eq!(result, "Line 1\nLine 2\nLine 3");
    }

    #[test]
    fn fenced_code_keeps_whitespace() {
        let input = "text  \n```\nfn main() {  \n\n\n\n\n}\n```  \nafter";
        assert_eq!(
            normalize_whitespace(input),
            "text\n```\nfn main() {  \n\n\n\n\n}\n```\nafter"
        );
        assert_eq!(clean_blank_lines(input), input);
    }

    #[test]
    fn blank_runs_collapse_again_after_fence() {
        let input = "```\ncode\n```\n\n\n\n\nnext";
        assert_eq!(clean_blank_lines(input), "```\ncode\n```\n\n\nnext");
    }

    #[test]
    fn leading_blank_lines_removed() {
        assert_eq!(strip_leading_blank_lines("\n\n# Title"), "# Title");
    }

    #[test]
    fn ensure_trailing_newline_normalizes_multiple() {
        let input = "Content\n\n\n";
        let result = ensure_trailing_newline(input);
        assert_eq!(result, "Content\n");
    }

    #[test]
    fn serialize_full_document() {
        let lines: Vec<String> = ["", "# Title  ", "", "", "", "", "## Section", "text", "", ""]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(serialize(&lines), "# Title\n\n\n## Section\ntext\n");
    }
}
