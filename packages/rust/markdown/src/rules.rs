//! The ordered rule list.
//!
//! Each entry pairs a [`Rule`] with a pure predicate over the line and the
//! current position. The driver walks the list top to bottom for every line;
//! a rule whose predicate holds either hands the (possibly rewritten) line on
//! to the rules below it or consumes it.

use crate::links::LINK_MARKER;
use crate::state::{DirectiveKind, Position};
use crate::{fragments, table, text};

/// Windows-only command section marker.
pub(crate) const WINDOWS_MARKER: &str = "[.tab_content.windows_section]";

/// Sentence replaced by the start-directory block.
pub(crate) const START_NAVIGATION: &str = "Navigate to the `start` directory to begin.";

/// One transformation rule, in classifier order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Rule {
    TableLine,
    WindowsSkip,
    TestOutput,
    CodeLine,
    DirectivePath,
    Include,
    WindowsMarker,
    TestOutputStart,
    TableStart,
    Delimiter,
    CopyButton,
    SourceListing,
    Directive,
    AdditionalPrerequisites,
    Title,
    SectionHeading,
    StartNavigation,
    GuideEnd,
    Irrelevant,
    Diagram,
    Link,
    MavenCommand,
}

pub(crate) type Predicate = fn(&str, &Position) -> bool;

/// Every rule with its predicate, highest priority first.
pub(crate) const RULES: &[(Rule, Predicate)] = &[
    (Rule::TableLine, in_table),
    (Rule::WindowsSkip, in_windows_section),
    (Rule::TestOutput, in_test_output),
    (Rule::CodeLine, in_code),
    (Rule::DirectivePath, awaits_directive_path),
    (Rule::Include, is_fragment_include),
    (Rule::WindowsMarker, is_windows_marker),
    (Rule::TestOutputStart, starts_test_output),
    (Rule::TableStart, starts_table),
    (Rule::Delimiter, is_delimiter),
    (Rule::CopyButton, is_copy_button),
    (Rule::SourceListing, is_source_listing),
    (Rule::Directive, is_directive),
    (Rule::AdditionalPrerequisites, is_additional_prerequisites),
    (Rule::Title, is_title),
    (Rule::SectionHeading, is_section_heading),
    (Rule::StartNavigation, is_start_navigation),
    (Rule::GuideEnd, is_guide_end),
    (Rule::Irrelevant, is_irrelevant),
    (Rule::Diagram, mentions_diagram),
    (Rule::Link, has_link),
    (Rule::MavenCommand, is_maven_command),
];

// ---------------------------------------------------------------------------
// Position-owned lines
// ---------------------------------------------------------------------------

fn in_table(_: &str, pos: &Position) -> bool {
    matches!(pos, Position::Table { .. })
}

fn in_windows_section(_: &str, pos: &Position) -> bool {
    matches!(pos, Position::Windows { .. })
}

fn in_test_output(_: &str, pos: &Position) -> bool {
    *pos == Position::TestBlock
}

fn in_code(_: &str, pos: &Position) -> bool {
    matches!(pos, Position::Code { .. })
}

fn awaits_directive_path(_: &str, pos: &Position) -> bool {
    matches!(pos, Position::Directive(_))
}

// ---------------------------------------------------------------------------
// Prose lines
// ---------------------------------------------------------------------------

fn is_main(pos: &Position) -> bool {
    *pos == Position::Main
}

fn is_fragment_include(line: &str, pos: &Position) -> bool {
    pos.is_prose() && fragments::identify(line).is_some()
}

fn is_windows_marker(line: &str, pos: &Position) -> bool {
    is_main(pos) && line == WINDOWS_MARKER
}

fn starts_test_output(line: &str, pos: &Position) -> bool {
    is_main(pos) && line.starts_with("[INFO]")
}

fn starts_table(line: &str, pos: &Position) -> bool {
    is_main(pos) && table::is_start(line)
}

fn is_delimiter(line: &str, pos: &Position) -> bool {
    is_main(pos) && line == "----"
}

fn is_copy_button(line: &str, pos: &Position) -> bool {
    is_main(pos) && (line.starts_with("[role='command']") || line.starts_with("[role=command]"))
}

fn is_source_listing(line: &str, pos: &Position) -> bool {
    is_main(pos) && line.starts_with("[source") && line.contains("linenums")
}

fn is_directive(line: &str, pos: &Position) -> bool {
    is_main(pos) && DirectiveKind::from_line(line).is_some()
}

fn is_additional_prerequisites(line: &str, pos: &Position) -> bool {
    pos.is_prose()
        && ["== ", "## ", "# "].iter().any(|marker| {
            line.strip_prefix(marker)
                .is_some_and(|rest| rest.starts_with("Additional prerequisites"))
        })
}

fn is_title(line: &str, pos: &Position) -> bool {
    pos.is_prose() && line.starts_with("= ")
}

fn is_section_heading(line: &str, pos: &Position) -> bool {
    pos.is_prose() && line.starts_with("== ")
}

fn is_start_navigation(line: &str, pos: &Position) -> bool {
    is_main(pos) && line == START_NAVIGATION
}

fn is_guide_end(line: &str, pos: &Position) -> bool {
    is_main(pos) && (line.starts_with("== Great work!") || line.starts_with("## Great work!"))
}

fn is_irrelevant(line: &str, pos: &Position) -> bool {
    pos.is_prose() && text::is_irrelevant(line)
}

fn mentions_diagram(line: &str, pos: &Position) -> bool {
    is_main(pos) && line.contains("diagram") && !line.starts_with("image::")
}

fn has_link(line: &str, pos: &Position) -> bool {
    is_main(pos) && line.contains(LINK_MARKER)
}

fn is_maven_command(line: &str, pos: &Position) -> bool {
    is_main(pos) && line.starts_with("mvn")
}
