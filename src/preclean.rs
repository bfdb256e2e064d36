//! Block-level markup removal before TeX conversion.
//!
//! Tables, figures and math carry no prose worth keeping in a text corpus,
//! and converters render them badly. They are removed from the raw source
//! in a fixed order: structural blocks first, then display math, then
//! inline math. Tables and figures often contain `$...$`, and a math pass
//! running first would match across block boundaries and leave half a
//! table behind.
//!
//! Unbalanced `\begin`/`\end` pairs never match and are left in place.

use log::info;
use regex::Regex;

use crate::options::Options;
use crate::patterns::{DISPLAY_MATH, FIGURE_BLOCK, INLINE_MATH, TABLE_BLOCK, TABULAR_BLOCK};

/// Kind of block removed by the pre-cleaner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    /// `table` environment.
    Table,
    /// `tabular` environment.
    Tabular,
    /// `figure` environment.
    Figure,
    /// `$$ ... $$` span.
    DisplayMath,
    /// `$ ... $` span.
    InlineMath,
}

impl BlockKind {
    /// Removal order applied by [`preclean`].
    pub const ORDER: [Self; 5] = [
        Self::Table,
        Self::Tabular,
        Self::Figure,
        Self::DisplayMath,
        Self::InlineMath,
    ];

    /// Pattern matching one block of this kind.
    #[must_use]
    pub fn pattern(self) -> &'static Regex {
        match self {
            Self::Table => &TABLE_BLOCK,
            Self::Tabular => &TABULAR_BLOCK,
            Self::Figure => &FIGURE_BLOCK,
            Self::DisplayMath => &DISPLAY_MATH,
            Self::InlineMath => &INLINE_MATH,
        }
    }

    /// Human-readable name used in reports.
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::Table => "table",
            Self::Tabular => "tabular",
            Self::Figure => "figure",
            Self::DisplayMath => "display math",
            Self::InlineMath => "inline math",
        }
    }
}

/// A block removed from the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovedBlock {
    /// Kind of the block.
    pub kind: BlockKind,
    /// Full removed text.
    pub text: String,
}

impl RemovedBlock {
    /// The first `max_chars` characters of the removed text.
    #[must_use]
    pub fn preview(&self, max_chars: usize) -> &str {
        self.text
            .char_indices()
            .nth(max_chars)
            .map_or(self.text.as_str(), |(idx, _)| &self.text[..idx])
    }
}

/// Everything removed during one pre-cleaning run, in removal order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrecleanReport {
    /// Removed blocks.
    pub removed: Vec<RemovedBlock>,
}

impl PrecleanReport {
    /// Number of removed blocks of `kind`.
    #[must_use]
    pub fn count(&self, kind: BlockKind) -> usize {
        self.removed.iter().filter(|block| block.kind == kind).count()
    }
}

fn is_gap(c: char) -> bool {
    c == ' ' || c == '\t'
}

/// Remove every non-overlapping block of `kind`.
///
/// When a removed block sat between two spaces, one of them is dropped as
/// well, so `a $x$ b` becomes `a b` rather than `a  b`.
#[must_use]
pub fn remove_blocks(tex: &str, kind: BlockKind) -> (String, Vec<RemovedBlock>) {
    let mut out = String::with_capacity(tex.len());
    let mut removed = Vec::new();
    let mut last = 0;

    for m in kind.pattern().find_iter(tex) {
        let start = m.start().max(last);
        out.push_str(&tex[last..start]);
        removed.push(RemovedBlock {
            kind,
            text: m.as_str().to_string(),
        });

        last = m.end();
        if out.ends_with(is_gap) && tex[last..].starts_with(is_gap) {
            last += 1;
        }
    }

    if removed.is_empty() {
        return (tex.to_string(), removed);
    }

    out.push_str(&tex[last..]);
    (out, removed)
}

/// Remove blocks pass by pass in the given order.
#[must_use]
pub fn remove_blocks_in_order(tex: &str, order: &[BlockKind]) -> (String, PrecleanReport) {
    let mut report = PrecleanReport::default();
    let mut current = tex.to_string();

    for &kind in order {
        let (next, removed) = remove_blocks(&current, kind);
        current = next;
        report.removed.extend(removed);
    }

    (current, report)
}

/// Remove tables, figures and math with the standard pass order.
#[must_use]
pub fn preclean_with_report(tex: &str) -> (String, PrecleanReport) {
    remove_blocks_in_order(tex, &BlockKind::ORDER)
}

/// Remove tables, figures and math from TeX source.
///
/// With `options.debug` set, the count and a preview of every removed
/// block are logged; the returned text is the same either way.
///
/// # Example
///
/// ```rust
/// use tex2corpus::{preclean::preclean, Options};
///
/// let tex = "Energy $E=mc^2$ is conserved.";
/// assert_eq!(preclean(tex, &Options::default()), "Energy is conserved.");
/// ```
#[must_use]
pub fn preclean(tex: &str, options: &Options) -> String {
    let (cleaned, report) = preclean_with_report(tex);

    if options.debug {
        for kind in BlockKind::ORDER {
            let count = report.count(kind);
            if count == 0 {
                continue;
            }
            info!("Found {count} {} blocks.", kind.description());
            for block in report.removed.iter().filter(|b| b.kind == kind) {
                info!(
                    "Removing {} block: {}...",
                    kind.description(),
                    block.preview(options.preview_chars)
                );
            }
        }
    }

    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_all_matches_of_a_pass() {
        let (out, removed) = remove_blocks("a $x$ b $y$ c", BlockKind::InlineMath);
        assert_eq!(out, "a b c");
        assert_eq!(removed.len(), 2);
    }

    #[test]
    fn display_math_removed_before_inline() {
        let (out, report) = preclean_with_report("before $$x^2$$ after");
        assert_eq!(out, "before after");
        assert_eq!(report.count(BlockKind::DisplayMath), 1);
        assert_eq!(report.count(BlockKind::InlineMath), 0);
    }

    #[test]
    fn table_with_math_removed_whole() {
        let tex = "Intro.\n\\begin{table}\n$a$ & $b$\n\\end{table}\nOutro.";
        let (out, report) = preclean_with_report(tex);
        assert_eq!(out, "Intro.\n\nOutro.");
        assert_eq!(report.count(BlockKind::Table), 1);
        assert_eq!(report.count(BlockKind::InlineMath), 0);
    }

    #[test]
    fn unbalanced_environment_left_in_place() {
        let tex = "\\begin{figure} never closed";
        let (out, report) = preclean_with_report(tex);
        assert_eq!(out, tex);
        assert!(report.removed.is_empty());
    }

    #[test]
    fn newline_gaps_are_kept() {
        let (out, _) = remove_blocks("a\n$x$\nb", BlockKind::InlineMath);
        assert_eq!(out, "a\n\nb");
    }

    #[test]
    fn preview_truncates_by_chars() {
        let block = RemovedBlock {
            kind: BlockKind::Figure,
            text: "αβγδ".to_string(),
        };
        assert_eq!(block.preview(2), "αβ");
        assert_eq!(block.preview(10), "αβγδ");
    }

    #[test]
    fn debug_flag_does_not_change_output() {
        let tex = "x \\begin{figure}F\\end{figure} y $z$";
        let quiet = preclean(tex, &Options::default());
        let loud = preclean(
            tex,
            &Options {
                debug: true,
                ..Options::default()
            },
        );
        assert_eq!(quiet, loud);
        assert_eq!(quiet, "x y ");
    }
}
