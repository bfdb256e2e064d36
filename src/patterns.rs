//! Compiled regex patterns and placeholder tokens for TeX cleaning.
//!
//! All patterns are compiled once at first use via `LazyLock`.
//! Patterns are organized by the pipeline stage that uses them.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

// =============================================================================
// Placeholder Tokens
// =============================================================================

/// Temporary token standing in for a citation command.
pub const CITATION_PLACEHOLDER: &str = "<cit.>";

/// Temporary token standing in for a cross-reference command.
pub const REFERENCE_PLACEHOLDER: &str = "<ref>";

// =============================================================================
// Markup Pre-Cleaner Patterns
// =============================================================================
//
// Every block pattern is non-greedy with dot-matches-newline, so each match
// stops at the first closing delimiter.

/// Matches a `table` environment.
pub static TABLE_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\\begin\{table\}.*?\\end\{table\}").expect("TABLE_BLOCK regex")
});

/// Matches a `tabular` environment.
pub static TABULAR_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\\begin\{tabular\}.*?\\end\{tabular\}").expect("TABULAR_BLOCK regex")
});

/// Matches a `figure` environment.
pub static FIGURE_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\\begin\{figure\}.*?\\end\{figure\}").expect("FIGURE_BLOCK regex")
});

/// Matches a `$$ ... $$` display-math span.
pub static DISPLAY_MATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\$\$.*?\$\$").expect("DISPLAY_MATH regex"));

/// Matches a `$ ... $` inline-math span.
pub static INLINE_MATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\$.*?\$").expect("INLINE_MATH regex"));

// =============================================================================
// Text Normalizer Patterns
// =============================================================================

/// Matches a whole whitespace run containing at least one blank line,
/// including the spaces around it.
pub static PARAGRAPH_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\n[ \t]*\n\s*").expect("PARAGRAPH_BREAK regex"));

/// Matches citation commands, including natbib/biblatex variants and
/// optional pre/post notes: `\cite{a}`, `\citep[p.~3]{a,b}`.
pub static CITATION_COMMAND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\\(?:cite|citep|citet|citealp|citealt|citeauthor|citeyear|citeyearpar|parencite|textcite|autocite|footcite|nocite)\*?(?:\[[^\]]*\])*\{[^}]*\}",
    )
    .expect("CITATION_COMMAND regex")
});

/// Matches cross-reference commands: `\ref{fig:1}`, `\eqref{eq:2}`.
pub static REFERENCE_COMMAND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\\(?:ref|eqref|autoref|cref|Cref|pageref|nameref|vref)\*?\{[^}]*\}")
        .expect("REFERENCE_COMMAND regex")
});

/// Matches `\label{...}`.
pub static LABEL_COMMAND: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\label\{[^}]*\}").expect("LABEL_COMMAND regex"));

/// Matches residual `\begin{...}` and `\end{...}` markers.
pub static ENVIRONMENT_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\\(?:begin|end)\{[^}]*\}").expect("ENVIRONMENT_MARKER regex")
});

/// Matches a residual single-argument command: `\word{...}` or `\word*{...}`.
pub static SINGLE_ARG_COMMAND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\\[a-zA-Z]+\*?\{[^}]*\}").expect("SINGLE_ARG_COMMAND regex")
});

/// Matches the citation and reference placeholder tokens (`<cit.>`,
/// `<ref>` and the `<ref.>` spelling).
pub static PLACEHOLDER_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<cit\.>|<ref\.?>").expect("PLACEHOLDER_TOKEN regex"));

/// Matches a bare URL wrapped in angle brackets.
pub static BRACKETED_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<(https?://[^>]+)>").expect("BRACKETED_URL regex"));

/// Matches two or more line breaks, allowing blank lines that hold only
/// spaces or tabs.
pub static BLANK_LINE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n(?:[ \t]*\n)+").expect("BLANK_LINE_RUN regex"));
