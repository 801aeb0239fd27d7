//! Surgical replacement of one section's block.

use super::Document;

/// Replace the block under the first `## <name>` heading with `new_block`.
///
/// The heading and both fence markers are kept; only the lines between them
/// change. `new_block` is inserted verbatim apart from leading and trailing
/// blank lines. Sections are located with the same index [`Document::parse`]
/// builds, so heading-like lines inside another block are never targets.
/// When the section or its block is missing the input is returned unchanged,
/// so callers must check the section exists first.
pub fn replace_section(document: &str, name: &str, new_block: &str) -> String {
    let doc = Document::parse(document);
    let Some(block) = doc.section(name).and_then(|section| section.block) else {
        return document.to_string();
    };

    let replacement = trim_blank_lines(new_block);
    let mut output: Vec<&str> = Vec::with_capacity(doc.lines.len());
    output.extend(doc.lines[..block.start].iter().map(String::as_str));
    output.extend(replacement.iter().copied());
    output.extend(doc.lines[block.end..].iter().map(String::as_str));
    output.join("\n")
}

fn trim_blank_lines(block: &str) -> Vec<&str> {
    let lines: Vec<&str> = block.lines().collect();
    let Some(first) = lines.iter().position(|l| !l.trim().is_empty()) else {
        return Vec::new();
    };
    let last = lines
        .iter()
        .rposition(|l| !l.trim().is_empty())
        .unwrap_or(first);
    lines[first..=last].to_vec()
}
