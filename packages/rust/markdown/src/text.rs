//! Line-level text normalization for prose lines.

use std::sync::LazyLock;

use guideconverter_shared::Substitutions;
use regex::Regex;

/// Mis-decoded byte sequences and their intended text, applied in order.
const ENCODING_FIXES: &[(&str, &str)] = &[
    ("â””â", "|"),
    ("”€â”€", "__"),
    ("â”œâ", "  |"),
    ("â”‚", ""),
    ("â€™", "'"),
    ("�", "\""),
    ("â€", ""),
];

/// Line prefixes that never reach the output.
const IRRELEVANT_PREFIXES: &[&str] = &[
    "//",
    ":",
    "[source",
    "NOTE:",
    "include::",
    "[role=",
    "[.tab_",
    "image::",
    "[.hidden]",
    "start/",
    "finish/",
    "system/",
    "inventory/",
];

/// Section heading that keeps its literal text instead of the `==` entry.
const LEARN_HEADING: &str = "== What you'll learn";

const FENCE: &str = "```";

/// Replace known mis-decoded sequences.
pub(crate) fn fix_encoding(line: &str) -> String {
    ENCODING_FIXES
        .iter()
        .fold(line.to_string(), |acc, (bad, good)| acc.replace(bad, good))
}

/// Whether the line belongs to the fixed set of dropped prefixes.
pub(crate) fn is_irrelevant(line: &str) -> bool {
    IRRELEVANT_PREFIXES.iter().any(|p| line.starts_with(p))
}

/// Full prose normalization: loop table, hotspot markers, bold, encoding,
/// block delimiters, headings.
pub(crate) fn normalize_line(line: &str, subs: &Substitutions) -> String {
    static HOTSPOT_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\[hotspot(.*?)\]").expect("valid regex"));

    let line = subs.apply_loop(line);
    let line = HOTSPOT_RE.replace_all(&line, "");
    let line = line.replace('`', "**");
    let line = fix_encoding(&line);

    if line == "--" || line == "******" {
        return FENCE.to_string();
    }

    convert_heading(&line, subs)
}

/// `== X` → section marker; any other leading `=` run → one level marker per
/// `=`.
fn convert_heading(line: &str, subs: &Substitutions) -> String {
    if let Some(rest) = line.strip_prefix("== ") {
        if line != LEARN_HEADING {
            return format!("{} {rest}", subs.section_marker());
        }
    }

    let level = line.bytes().take_while(|b| *b == b'=').count();
    if level == 0 || !line[level..].starts_with(' ') {
        return line.to_string();
    }

    format!("{}{}", subs.level_marker().repeat(level), &line[level..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use guideconverter_shared::{SubstitutionRule, SubstitutionTable};

    fn subs() -> Substitutions {
        Substitutions::default()
    }

    #[test]
    fn headings() {
        assert_eq!(normalize_line("= Title", &subs()), "# Title");
        assert_eq!(normalize_line("== Section", &subs()), "## Section");
        assert_eq!(normalize_line("=== Deeper", &subs()), "### Deeper");
        assert_eq!(
            normalize_line("== What you'll learn", &subs()),
            "## What you'll learn"
        );
    }

    #[test]
    fn learn_heading_bypasses_section_entry() {
        let headings = SubstitutionTable::new(vec![
            SubstitutionRule::new("=", "#"),
            SubstitutionRule::new("==", "##"),
        ]);
        let loop_table = SubstitutionTable::default();
        let mut custom = Substitutions::new(&loop_table, headings).unwrap();
        assert_eq!(normalize_line("== Intro", &custom), "## Intro");

        custom = Substitutions::new(
            &loop_table,
            SubstitutionTable::new(vec![SubstitutionRule::new("==", "##!")]),
        )
        .unwrap();
        assert_eq!(normalize_line("== Intro", &custom), "##! Intro");
        assert_eq!(
            normalize_line("== What you'll learn", &custom),
            "## What you'll learn"
        );
    }

    #[test]
    fn block_delimiters_become_fences() {
        assert_eq!(normalize_line("--", &subs()), "```");
        assert_eq!(normalize_line("******", &subs()), "```");
        assert_eq!(normalize_line("-- not a delimiter", &subs()), "-- not a delimiter");
        assert_eq!(normalize_line("====", &subs()), "====");
    }

    #[test]
    fn backticks_and_hotspots() {
        assert_eq!(
            normalize_line("Run the `mvn` [hotspot=run file=0]command.", &subs()),
            "Run the **mvn** command."
        );
    }

    #[test]
    fn encoding_fixes_apply_in_order() {
        assert_eq!(fix_encoding("itâ€™s"), "it's");
        assert_eq!(fix_encoding("â””â”€â”€ src"), "|__ src");
        assert_eq!(fix_encoding("�quoted�"), "\"quoted\"");
    }

    #[test]
    fn loop_table_runs_first() {
        let loop_table = SubstitutionTable::new(vec![SubstitutionRule::new(r" \+$", "")]);
        let custom = Substitutions::new(&loop_table, SubstitutionTable::default_headings()).unwrap();
        assert_eq!(normalize_line("continued line +", &custom), "continued line");
    }

    #[test]
    fn irrelevant_prefixes() {
        for line in [
            "// comment",
            ":projectid: rest-intro",
            "[source, java, linenums]",
            "NOTE: something",
            "include::{common-includes}/attribution.adoc[]",
            "[role='command']",
            "[.tab_link.windows_link]",
            "image::diagram.png[]",
            "finish/src/main/java/App.java",
        ] {
            assert!(is_irrelevant(line), "{line}");
        }
        assert!(!is_irrelevant("Plain text."));
        assert!(!is_irrelevant(" // indented"));
    }
}
