//! Shared guides-common boilerplate fragments.

use guideconverter_shared::GuideRef;

/// Prefix of every fragment include line.
const INCLUDE_PREFIX: &str = "include::{common-includes}/";

/// A known fragment file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Fragment {
    pub file: &'static str,
    /// License/comment header lines dropped from the top of the file.
    pub header_lines: usize,
}

const fn fragment(file: &'static str) -> Fragment {
    Fragment {
        file,
        header_lines: 0,
    }
}

/// Every fragment the converter splices in.
/// Others (`attribution.adoc`, `os-tabs.adoc`, …) are only dropped.
pub(crate) const FRAGMENTS: &[Fragment] = &[
    Fragment {
        file: "gitclone.adoc",
        header_lines: 7,
    },
    fragment("ol-kernel-docker-pull.adoc"),
    fragment("devmode-start.adoc"),
    fragment("devmode-quit.adoc"),
    fragment("devmode-test.adoc"),
    fragment("devmode-build.adoc"),
    fragment("devmode-start-cd.adoc"),
    fragment("twyb-intro.adoc"),
    fragment("twyb-end.adoc"),
    fragment("trywhatyoubuild-beg.adoc"),
    fragment("trywhatyoubuild-intro.adoc"),
    fragment("trywhatyoubuild-end.adoc"),
];

/// Match an exact `include::{common-includes}/<file>[]` line.
pub(crate) fn identify(line: &str) -> Option<Fragment> {
    let file = line.strip_prefix(INCLUDE_PREFIX)?.strip_suffix("[]")?;
    FRAGMENTS.iter().copied().find(|f| f.file == file)
}

/// Drop the header and fill in the project placeholders.
pub(crate) fn prepare(fragment: Fragment, lines: Vec<String>, guide: &GuideRef) -> Vec<String> {
    lines
        .into_iter()
        .skip(fragment.header_lines)
        .map(|line| {
            line.replace("guide-{projectid}", &guide.name)
                .replace("{projectid}", guide.project_id())
        })
        .collect()
}
