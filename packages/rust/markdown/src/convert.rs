//! The driver loop.
//!
//! Every step pops one line, walks [`RULES`] in order and runs the handler of
//! each rule whose predicate holds. Handlers return [`Flow::Next`] to hand a
//! line on to the lower-priority rules or [`Flow::Done`] once they have
//! consumed it. A line nobody consumed is normalized and emitted.

use guideconverter_shared::{Fetcher, GuideConverterError, GuideRef, GuideSource, Substitutions};
use tracing::{debug, warn};

use crate::buffer::{LineQueue, Output};
use crate::directive::{self, DirectiveTarget};
use crate::links::{self, LinkLine};
use crate::rules::{RULES, Rule};
use crate::state::{DirectiveKind, Position};
use crate::table::{self, TableLine};
use crate::{Conversion, ConversionStats, blocks, cleanup, fragments, text};

const FENCE: &str = "```";
const CODEBLOCK: &str = "{: codeblock}";

/// Lines dropped after a windows section marker.
const WINDOWS_SECTION_LINES: usize = 6;

/// How far a diagram mention looks ahead for its image.
const DIAGRAM_LOOKAHEAD: usize = 7;

/// How far the closing `----` of a source listing may be.
const LISTING_LOOKAHEAD: usize = 8;

/// How far the closing `----` around a directive may be.
const WRAPPER_LOOKAHEAD: usize = 2;

/// How far a `[cols…]` line may be from its opening `|===`.
const TABLE_OPEN_LOOKAHEAD: usize = 2;

/// Upper bound on fragment splices per document.
const MAX_FRAGMENT_SPLICES: usize = 32;

/// What a handler did with its line.
enum Flow {
    Next(String),
    Done,
}

pub(crate) struct Converter<'a, F> {
    guide: &'a GuideRef,
    source: &'a GuideSource,
    subs: &'a Substitutions,
    fetcher: &'a F,
    queue: LineQueue,
    output: Output,
    position: Position,
    /// A copy-button marker was read; the next listing is a command block.
    command_pending: bool,
    /// The `----` opening a directive was dropped; its closing one goes too.
    wrapper_open: bool,
    /// The previous line was emitted as plain prose.
    after_prose: bool,
    splices: usize,
    stats: ConversionStats,
}

impl<'a, F: Fetcher> Converter<'a, F> {
    pub(crate) fn new(
        lines: Vec<String>,
        guide: &'a GuideRef,
        source: &'a GuideSource,
        subs: &'a Substitutions,
        fetcher: &'a F,
    ) -> Self {
        let stats = ConversionStats {
            input_lines: lines.len(),
            ..ConversionStats::default()
        };
        Self {
            guide,
            source,
            subs,
            fetcher,
            queue: LineQueue::new(lines),
            output: Output::default(),
            position: Position::Main,
            command_pending: false,
            wrapper_open: false,
            after_prose: false,
            splices: 0,
            stats,
        }
    }

    pub(crate) async fn run(mut self) -> Conversion {
        while let Some(line) = self.queue.pop() {
            self.step(line).await;
        }
        self.finish();

        self.stats.output_lines = self.output.len();
        let lines = self.output.into_lines();
        Conversion {
            markdown: cleanup::serialize(&lines),
            stats: self.stats,
        }
    }

    async fn step(&mut self, mut line: String) {
        let after_prose = std::mem::take(&mut self.after_prose);

        for (rule, applies) in RULES {
            if !applies(&line, &self.position) {
                continue;
            }
            match self.apply(*rule, line, after_prose).await {
                Flow::Next(next) => line = next,
                Flow::Done => return,
            }
        }

        self.emit_prose(&line);
    }

    async fn apply(&mut self, rule: Rule, line: String, after_prose: bool) -> Flow {
        match rule {
            Rule::TableLine => self.table_line(&line),
            Rule::WindowsSkip => self.windows_line(&line),
            Rule::TestOutput => self.test_output(line),
            Rule::CodeLine => self.code_line(&line),
            Rule::DirectivePath => self.directive_path(line).await,
            Rule::Include => {
                self.include(&line).await;
                Flow::Next(line)
            }
            Rule::WindowsMarker => {
                self.position = Position::Windows {
                    remaining: WINDOWS_SECTION_LINES,
                    delimiters: 0,
                };
                Flow::Done
            }
            Rule::TestOutputStart => {
                self.output.push(FENCE);
                self.output.push(line);
                self.position = Position::TestBlock;
                Flow::Done
            }
            Rule::TableStart => self.table_start(&line),
            Rule::Delimiter => self.delimiter(),
            Rule::CopyButton => {
                self.command_pending = true;
                Flow::Next(line)
            }
            Rule::SourceListing => self.source_listing(after_prose),
            Rule::Directive => self.directive(line).await,
            Rule::AdditionalPrerequisites => self.additional_prerequisites(),
            Rule::Title => {
                self.output.push(text::normalize_line(&line, self.subs));
                self.position = Position::Intro;
                Flow::Done
            }
            Rule::SectionHeading => {
                self.position = Position::Main;
                Flow::Next(line)
            }
            Rule::StartNavigation => {
                self.output.extend(blocks::start_navigation());
                Flow::Done
            }
            Rule::GuideEnd => {
                self.output.extend(blocks::guide_end(self.guide));
                Flow::Done
            }
            Rule::Irrelevant => Flow::Done,
            Rule::Diagram => self.diagram(line),
            Rule::Link => self.link(line),
            Rule::MavenCommand => {
                self.output
                    .extend(blocks::command(&text::fix_encoding(&line)));
                Flow::Done
            }
        }
    }

    // -----------------------------------------------------------------------
    // Position-owned lines
    // -----------------------------------------------------------------------

    fn table_line(&mut self, line: &str) -> Flow {
        let Position::Table { opened } = self.position else {
            return Flow::Done;
        };
        match table::convert(line, opened) {
            TableLine::Open => self.position = Position::Table { opened: true },
            TableLine::Close => self.position = Position::Main,
            TableLine::Rows(rows) => self.output.extend(rows),
        }
        Flow::Done
    }

    /// `|===` opens a table directly; `[cols…]` only when its `|===` follows.
    fn table_start(&mut self, line: &str) -> Flow {
        if line == table::DELIMITER {
            self.position = Position::Table { opened: true };
            return Flow::Done;
        }

        let opens = self
            .queue
            .find_within(0..TABLE_OPEN_LOOKAHEAD, |l| l == table::DELIMITER);
        if opens.is_some() {
            self.position = Position::Table { opened: false };
        } else {
            debug!(line, "column spec without a table, dropped");
        }
        Flow::Done
    }

    fn windows_line(&mut self, line: &str) -> Flow {
        if let Position::Windows {
            remaining,
            delimiters,
        } = self.position
        {
            let delimiters = delimiters + usize::from(line == "--");
            let remaining = remaining.saturating_sub(1);
            self.position = if remaining == 0 || delimiters >= 2 {
                Position::Main
            } else {
                Position::Windows {
                    remaining,
                    delimiters,
                }
            };
        }
        Flow::Done
    }

    fn test_output(&mut self, line: String) -> Flow {
        if line.starts_with("[INFO]") {
            self.output.push(line);
        } else {
            self.output.push(FENCE);
            self.position = Position::Main;
            self.queue.push_front(line);
        }
        Flow::Done
    }

    fn code_line(&mut self, line: &str) -> Flow {
        let Position::Code { command } = self.position else {
            return Flow::Done;
        };
        match line {
            "----" => {
                self.output.push(FENCE);
                if command {
                    self.output.extend([CODEBLOCK, ""]);
                }
                self.position = Position::Main;
            }
            "--" => {
                self.output.extend([FENCE, CODEBLOCK, ""]);
                self.position = Position::Main;
            }
            _ if text::is_irrelevant(line) => {
                debug!(line, "dropped listing line");
            }
            _ => {
                if line.starts_with("mvn") {
                    self.position = Position::Code { command: true };
                }
                self.output.push(text::fix_encoding(line));
            }
        }
        Flow::Done
    }

    async fn directive_path(&mut self, line: String) -> Flow {
        let Position::Directive(kind) = self.position else {
            return Flow::Next(line);
        };
        if line.trim().is_empty() {
            return Flow::Done;
        }

        match directive::parse_path(&line) {
            Ok(path) => self.expand(kind, &path).await,
            Err(e) => {
                warn!(directive = %kind, error = %e, "directive left without a file");
                self.position = Position::Main;
                // The wrapper closed before any path was given.
                let closes_wrapper = std::mem::take(&mut self.wrapper_open) && line == "----";
                if !closes_wrapper {
                    self.queue.push_front(line);
                }
            }
        }
        Flow::Done
    }

    // -----------------------------------------------------------------------
    // Prose lines
    // -----------------------------------------------------------------------

    async fn include(&mut self, line: &str) {
        let Some(fragment) = fragments::identify(line) else {
            return;
        };
        if self.splices >= MAX_FRAGMENT_SPLICES {
            warn!(file = fragment.file, "fragment splice limit reached, skipping");
            return;
        }

        let url = self.source.fragment_url(fragment.file);
        match self.fetcher.fetch_lines(&url).await {
            Ok(lines) => {
                let lines = fragments::prepare(fragment, lines, self.guide);
                debug!(file = fragment.file, lines = lines.len(), "fragment spliced");
                self.splices += 1;
                self.stats.fragments += 1;
                self.queue.splice_front(lines);
            }
            Err(e) => self.fetch_failed("fragment", &url, &e),
        }
    }

    /// Log a failed fetch; the caller goes on without the content.
    fn fetch_failed(&mut self, what: &str, url: &str, err: &GuideConverterError) {
        if err.is_fetch() {
            warn!(what, url, error = %err, "fetch failed, content skipped");
            self.stats.fetch_failures += 1;
        } else {
            warn!(what, url, error = %err, "fetcher returned an unexpected error, content skipped");
        }
    }

    fn delimiter(&mut self) -> Flow {
        let wraps_directive = self
            .queue
            .peek(0)
            .is_some_and(|next| DirectiveKind::from_line(next).is_some());
        if wraps_directive {
            self.wrapper_open = true;
            return Flow::Done;
        }

        let command = std::mem::take(&mut self.command_pending);
        self.output.push(FENCE);
        self.position = Position::Code { command };
        Flow::Done
    }

    fn source_listing(&mut self, after_prose: bool) -> Flow {
        if after_prose {
            self.output.retract_last();
        }
        if self.queue.peek(0) == Some("----") {
            if let Some(close) = self.queue.find_within(1..LISTING_LOOKAHEAD, |l| l == "----") {
                self.queue.discard(close + 1);
            }
        }
        Flow::Done
    }

    async fn directive(&mut self, line: String) -> Flow {
        let Some(kind) = DirectiveKind::from_line(&line) else {
            return Flow::Next(line);
        };

        match directive::parse(&line, kind) {
            DirectiveTarget::Inline(path) => self.expand(kind, &path).await,
            DirectiveTarget::Pending { instruction } => {
                self.output
                    .push(text::normalize_line(&instruction, self.subs));
                self.position = Position::Directive(kind);
            }
        }
        Flow::Done
    }

    /// Pointer block plus the fetched file; back to prose afterwards.
    async fn expand(&mut self, kind: DirectiveKind, path: &str) {
        self.stats.directives += 1;
        self.output.extend(directive::pointer_block(self.guide, path));

        let url = self.source.snippet_url(self.guide, path);
        match self.fetcher.fetch_lines(&url).await {
            Ok(lines) => {
                debug!(directive = %kind, path, lines = lines.len(), "snippet fetched");
                self.output.extend(directive::snippet_block(lines));
            }
            Err(e) => self.fetch_failed("snippet", &url, &e),
        }

        self.position = Position::Main;
        if std::mem::take(&mut self.wrapper_open) {
            if let Some(close) = self.queue.find_within(0..WRAPPER_LOOKAHEAD, |l| l == "----") {
                self.queue.remove(close);
            }
        }
    }

    fn additional_prerequisites(&mut self) -> Flow {
        let end = self.queue.find_within(0..self.queue.len(), |l| {
            l.starts_with("[role='command']") || l.starts_with("== ")
        });
        match end {
            Some(lines) => {
                debug!(lines, "additional prerequisites removed");
                self.queue.discard(lines);
            }
            None => debug!("additional prerequisites block has no end marker"),
        }
        Flow::Done
    }

    fn diagram(&mut self, line: String) -> Flow {
        let Some(image) = self
            .queue
            .find_within(0..DIAGRAM_LOOKAHEAD, |l| l.starts_with("image::"))
        else {
            return Flow::Next(line);
        };
        self.queue.remove(image);

        match line.rfind('.') {
            Some(dot) => Flow::Next(line[..=dot].to_string()),
            None => Flow::Next(line),
        }
    }

    fn link(&mut self, line: String) -> Flow {
        match links::rewrite(&line) {
            Ok(LinkLine::Inline {
                line: rewritten,
                links,
            }) => {
                self.stats.links += links;
                Flow::Next(rewritten)
            }
            Ok(LinkLine::Command {
                before,
                after,
                url,
                sentence,
                links,
            }) => {
                self.stats.links += links;
                if sentence {
                    let prose = links::rebuild_sentence(&before, &after);
                    self.output.push(text::normalize_line(&prose, self.subs));
                    self.output.extend(links::curl_block(&url));
                } else {
                    self.push_prose_part(&before);
                    self.output.extend(links::curl_block(&url));
                    self.push_prose_part(&after);
                }
                Flow::Done
            }
            Err(e) => {
                warn!(error = %e, "link reference left unchanged");
                Flow::Next(line)
            }
        }
    }

    fn push_prose_part(&mut self, part: &str) {
        let part = part.trim();
        if !part.is_empty() {
            self.output.push(text::normalize_line(part, self.subs));
        }
    }

    /// Default emission for a line no rule consumed.
    fn emit_prose(&mut self, line: &str) {
        if self.position != Position::Main {
            return;
        }
        let normalized = text::normalize_line(line, self.subs);
        if !normalized.trim().is_empty() {
            self.after_prose = true;
            self.command_pending = false;
        }
        self.output.push(normalized);
    }

    /// Close whatever the document left open.
    fn finish(&mut self) {
        match self.position {
            Position::Code { .. } | Position::TestBlock => {
                debug!(position = ?self.position, "closing unterminated block");
                self.output.push(FENCE);
            }
            Position::Directive(kind) => {
                warn!(directive = %kind, "document ended before the directive's file path");
            }
            _ => {}
        }
    }
}
