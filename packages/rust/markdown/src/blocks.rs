//! Fixed Markdown blocks the converter emits in place of guide lines.

use guideconverter_shared::GuideRef;

const FENCE: &str = "```";
const CODEBLOCK: &str = "{: codeblock}";

/// A single command, fenced with a copy button.
pub(crate) fn command(line: &str) -> Vec<String> {
    vec![
        FENCE.to_string(),
        line.to_string(),
        FENCE.to_string(),
        CODEBLOCK.to_string(),
        String::new(),
    ]
}

/// Replaces ``Navigate to the `start` directory to begin.``
pub(crate) fn start_navigation() -> Vec<String> {
    let mut block = vec![
        "Navigate to the **start** directory to begin.".to_string(),
        String::new(),
    ];
    block.extend(command("cd start"));
    block
}

/// Closing summary with clean-up instructions, replacing `== Great work!`.
pub(crate) fn guide_end(guide: &GuideRef) -> Vec<String> {
    let name = &guide.name;
    let mut block = lines(&["# Summary", "", "## Clean up your environment", ""]);
    block.push(format!(
        "Delete the **{name}** project by navigating to the **/home/project/** directory"
    ));
    block.extend(lines(&["", FENCE, "cd ../.."]));
    block.push(format!("rm -r -f {name}"));
    block.push(format!("rmdir {name}"));
    block.extend(lines(&[FENCE, CODEBLOCK, "", "", "## Great work! You're done!", ""]));
    block
}

fn lines(text: &[&str]) -> Vec<String> {
    text.iter().map(|line| line.to_string()).collect()
}
