//! Where the converter is in the document.

/// The three file-operation directives a guide author can write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectiveKind {
    /// `#Create …`: the reader creates a new file.
    Create,
    /// `#Update …`: the reader edits an existing file.
    Update,
    /// `#Replace …`: the reader replaces a file's content.
    Replace,
}

impl DirectiveKind {
    const ALL: [Self; 3] = [Self::Create, Self::Update, Self::Replace];

    /// The marker the line starts with.
    pub fn marker(self) -> &'static str {
        match self {
            Self::Create => "#Create",
            Self::Update => "#Update",
            Self::Replace => "#Replace",
        }
    }

    /// Classify a line by its directive marker.
    pub fn from_line(line: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| line.starts_with(kind.marker()))
    }
}

impl std::fmt::Display for DirectiveKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.marker()[1..])
    }
}

/// The driver's position marker, carried from one line to the next.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Position {
    /// Ordinary prose: every normalization rule applies.
    #[default]
    Main,
    /// Between the title and the first section heading. Lines are dropped.
    Intro,
    /// Inside a `|===` table. `opened` is false between `[cols…]` and the
    /// opening `|===`.
    Table { opened: bool },
    /// Discarding a windows-only command section.
    Windows { remaining: usize, delimiters: usize },
    /// Inside a run of `[INFO]` test output lines.
    TestBlock,
    /// Inside a `----` listing. `command` means the block gets a copy button.
    Code { command: bool },
    /// A directive was read; the next non-blank line is its file path.
    Directive(DirectiveKind),
}

impl Position {
    /// Whether prose-level rules (headings, includes, the irrelevant filter)
    /// see the line.
    pub fn is_prose(self) -> bool {
        matches!(self, Self::Main | Self::Intro)
    }
}
