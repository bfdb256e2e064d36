//! Plain-text normalization after TeX conversion.
//!
//! The normalizer is an ordered list of pure string transforms. Order
//! matters: each step assumes the shape left by the previous one (commands
//! are replaced by placeholders before generic command removal can eat
//! them, and lines are unwrapped only once paragraph breaks are canonical).
//!
//! Citations and cross-references are deleted: they first become
//! placeholder tokens and the tokens are removed once every other command
//! has been stripped.

use regex::NoExpand;

use crate::patterns::{
    BLANK_LINE_RUN, BRACKETED_URL, CITATION_COMMAND, CITATION_PLACEHOLDER, ENVIRONMENT_MARKER,
    LABEL_COMMAND, PARAGRAPH_BREAK, PLACEHOLDER_TOKEN, REFERENCE_COMMAND, REFERENCE_PLACEHOLDER,
    SINGLE_ARG_COMMAND,
};
use crate::sanitize::fix_text;

/// One named normalization step.
#[derive(Debug, Clone, Copy)]
pub struct Transform {
    /// Short name used in logs and tests.
    pub name: &'static str,
    /// The transform itself.
    pub apply: fn(&str) -> String,
}

/// Normalization steps, in application order.
pub const STEPS: [Transform; 12] = [
    Transform { name: "repair_encoding", apply: repair_encoding },
    Transform { name: "normalize_paragraph_breaks", apply: normalize_paragraph_breaks },
    Transform { name: "mark_citations", apply: mark_citations },
    Transform { name: "mark_references", apply: mark_references },
    Transform { name: "drop_labels", apply: drop_labels },
    Transform { name: "drop_environment_markers", apply: drop_environment_markers },
    Transform { name: "drop_single_arg_commands", apply: drop_single_arg_commands },
    Transform { name: "drop_placeholders", apply: drop_placeholders },
    Transform { name: "unbracket_urls", apply: unbracket_urls },
    Transform { name: "unwrap_lines", apply: unwrap_lines },
    Transform { name: "collapse_blank_lines", apply: collapse_blank_lines },
    Transform { name: "trim", apply: trim },
];

/// Apply `step` until the text stops changing.
///
/// Removing an inner match can splice a new one together
/// (`\te\emph{x}xt{y}` becomes `\text{y}`). Every step used here only
/// deletes text, so this terminates.
fn until_stable(text: &str, step: impl Fn(&str) -> String) -> String {
    let mut current = step(text);
    loop {
        let next = step(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

/// Fix mojibake, ligatures and other encoding artifacts.
#[must_use]
pub fn repair_encoding(text: &str) -> String {
    fix_text(text)
}

/// Turn any whitespace run holding a blank line into exactly `\n\n`.
///
/// Post: paragraph breaks are canonical; single newlines are untouched.
#[must_use]
pub fn normalize_paragraph_breaks(text: &str) -> String {
    PARAGRAPH_BREAK.replace_all(text, "\n\n").into_owned()
}

/// Replace citation commands with the citation placeholder.
#[must_use]
pub fn mark_citations(text: &str) -> String {
    CITATION_COMMAND
        .replace_all(text, NoExpand(CITATION_PLACEHOLDER))
        .into_owned()
}

/// Replace cross-reference commands with the reference placeholder.
#[must_use]
pub fn mark_references(text: &str) -> String {
    REFERENCE_COMMAND
        .replace_all(text, NoExpand(REFERENCE_PLACEHOLDER))
        .into_owned()
}

/// Delete `\label{...}`.
#[must_use]
pub fn drop_labels(text: &str) -> String {
    LABEL_COMMAND.replace_all(text, "").into_owned()
}

/// Delete residual `\begin{...}` / `\end{...}` markers.
#[must_use]
pub fn drop_environment_markers(text: &str) -> String {
    ENVIRONMENT_MARKER.replace_all(text, "").into_owned()
}

/// Delete any remaining `\word{...}` / `\word*{...}` invocation.
///
/// Pre: citations and references are already placeholders, so they
/// survive this step.
#[must_use]
pub fn drop_single_arg_commands(text: &str) -> String {
    until_stable(text, |t| SINGLE_ARG_COMMAND.replace_all(t, "").into_owned())
}

/// Delete citation and reference placeholder tokens.
#[must_use]
pub fn drop_placeholders(text: &str) -> String {
    until_stable(text, |t| PLACEHOLDER_TOKEN.replace_all(t, "").into_owned())
}

/// `<https://example.org>` becomes `https://example.org`.
#[must_use]
pub fn unbracket_urls(text: &str) -> String {
    until_stable(text, |t| BRACKETED_URL.replace_all(t, "$1").into_owned())
}

/// Replace every newline that is not part of a paragraph break with a
/// space, turning hard-wrapped lines into flowing paragraphs.
#[must_use]
pub fn unwrap_lines(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    chars
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            let lone = c == '\n'
                && (i == 0 || chars[i - 1] != '\n')
                && chars.get(i + 1).is_none_or(|next| *next != '\n');
            if lone {
                ' '
            } else {
                c
            }
        })
        .collect()
}

/// Collapse consecutive blank lines into a single blank line.
///
/// Post: paragraphs are separated by exactly `\n\n`.
#[must_use]
pub fn collapse_blank_lines(text: &str) -> String {
    BLANK_LINE_RUN.replace_all(text, "\n\n").into_owned()
}

/// Trim leading and trailing whitespace.
#[must_use]
pub fn trim(text: &str) -> String {
    text.trim().to_string()
}

/// Run every normalization step in order.
///
/// # Example
///
/// ```rust
/// use tex2corpus::normalize::normalize;
///
/// let text = "As shown in \\cite{knuth84},\nwrapped lines\njoin up.\n\n\n\nNext.";
/// assert_eq!(normalize(text), "As shown in , wrapped lines join up.\n\nNext.");
/// ```
#[must_use]
pub fn normalize(text: &str) -> String {
    STEPS
        .iter()
        .fold(text.to_string(), |current, step| (step.apply)(&current))
}
