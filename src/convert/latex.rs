//! Built-in LaTeX-to-text renderer.
//!
//! A tolerant single-pass renderer over the character stream. It knows the
//! macros and environments that show up in arXiv sources and degrades
//! gracefully on everything else: unknown macros render as nothing while
//! their braced arguments are rendered as ordinary groups, and unbalanced
//! braces or environments simply run to the end of input.
//!
//! Citations and cross-references become the same placeholder tokens the
//! normalizer removes later.

use crate::error::ConversionError;
use crate::patterns::{CITATION_PLACEHOLDER, REFERENCE_PLACEHOLDER};

use super::LatexToText;

/// Default nesting limit for groups and environments.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// The built-in renderer.
///
/// ```rust
/// use tex2corpus::{LatexConverter, LatexToText};
///
/// let text = LatexConverter::new()
///     .latex_to_text(r#"\section{Results} We use \emph{na\"ive} methods~\cite{x}."#)
///     .unwrap();
/// assert_eq!(text, "\n\nResults\n\nWe use naïve methods <cit.>.");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatexConverter {
    max_depth: usize,
}

impl LatexConverter {
    /// Renderer with the default nesting limit.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Renderer failing with [`ConversionError::TooDeep`] past `max_depth`
    /// nested groups or environments.
    #[must_use]
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self { max_depth }
    }
}

impl Default for LatexConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl LatexToText for LatexConverter {
    fn latex_to_text(&self, tex: &str) -> Result<String, ConversionError> {
        Renderer::new(tex, self.max_depth).render_document()
    }
}

type Rendered = Result<String, ConversionError>;

/// What ends the current rendering loop.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Stop {
    Eof,
    Brace,
    Env(String),
    InlineMath,
    DisplayMath,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Close,
}

struct Renderer {
    chars: Vec<char>,
    pos: usize,
    limit: usize,
    depth: usize,
    max_depth: usize,
    title: Option<String>,
    author: Option<String>,
    date: Option<String>,
}

impl Renderer {
    fn new(tex: &str, max_depth: usize) -> Self {
        let chars: Vec<char> = tex.chars().collect();
        let limit = chars.len();
        Self {
            chars,
            pos: 0,
            limit,
            depth: 0,
            max_depth,
            title: None,
            author: None,
            date: None,
        }
    }

    /// Render the whole input. A preamble is rendered for its side effects
    /// (title, author, date) and its output dropped.
    fn render_document(mut self) -> Rendered {
        let marker: Vec<char> = "\\begin{document}".chars().collect();
        if let Some(start) = (0..self.chars.len()).find(|&i| self.starts_with_at(i, &marker)) {
            self.limit = start;
            self.render_until(&Stop::Eof)?;
            self.limit = self.chars.len();
            self.pos = start;
        }
        self.render_until(&Stop::Eof)
    }

    fn peek(&self) -> Option<char> {
        (self.pos < self.limit).then(|| self.chars[self.pos])
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn starts_with_at(&self, at: usize, pattern: &[char]) -> bool {
        at + pattern.len() <= self.limit && self.chars[at..at + pattern.len()] == *pattern
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn skip_inline_spaces(&mut self) {
        while matches!(self.peek(), Some(' ' | '\t')) {
            self.pos += 1;
        }
    }

    fn skip_comment(&mut self) {
        while let Some(c) = self.peek() {
            self.pos += 1;
            if c == '\n' {
                break;
            }
        }
        self.skip_inline_spaces();
    }

    fn enter(&mut self) -> Result<(), ConversionError> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(ConversionError::TooDeep {
                max: self.max_depth,
            });
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    fn render_until(&mut self, stop: &Stop) -> Rendered {
        let mut out = String::new();
        while let Some(c) = self.peek() {
            match c {
                '%' => self.skip_comment(),
                '{' => {
                    let group = self.render_group()?;
                    out.push_str(&group);
                }
                '}' => {
                    self.pos += 1;
                    if *stop == Stop::Brace {
                        return Ok(out);
                    }
                }
                '\\' => {
                    if self.render_escape(&mut out, stop)? == Flow::Close {
                        return Ok(out);
                    }
                }
                '~' => {
                    self.pos += 1;
                    out.push(' ');
                }
                '$' => self.pos += 1,
                '&' => {
                    self.pos += 1;
                    out.push(' ');
                }
                '-' => {
                    self.pos += 1;
                    if !self.eat('-') {
                        out.push('-');
                    } else if self.eat('-') {
                        out.push('\u{2014}');
                    } else {
                        out.push('\u{2013}');
                    }
                }
                '`' => {
                    self.pos += 1;
                    out.push(if self.eat('`') { '\u{201c}' } else { '\u{2018}' });
                }
                '\'' => {
                    self.pos += 1;
                    out.push(if self.eat('\'') { '\u{201d}' } else { '\'' });
                }
                _ => {
                    self.pos += 1;
                    out.push(c);
                }
            }
        }
        Ok(out)
    }

    /// Render a `{...}` group; the cursor is on the opening brace.
    fn render_group(&mut self) -> Rendered {
        self.pos += 1;
        self.enter()?;
        let text = self.render_until(&Stop::Brace)?;
        self.leave();
        Ok(text)
    }

    fn render_nested(&mut self, stop: Stop) -> Rendered {
        self.enter()?;
        let text = self.render_until(&stop)?;
        self.leave();
        Ok(text)
    }

    /// Render a standalone fragment, such as an optional argument.
    fn render_fragment(&self, tex: &str) -> Rendered {
        let mut child = Renderer::new(tex, self.max_depth);
        child.depth = self.depth;
        child.enter()?;
        child.render_until(&Stop::Eof)
    }

    /// Raw text of a balanced `{...}` group without the outer braces.
    fn read_raw_group(&mut self) -> String {
        self.pos += 1;
        let start = self.pos;
        let mut level = 0usize;
        while let Some(c) = self.peek() {
            match c {
                '\\' => self.pos += 1,
                '{' => level += 1,
                '}' if level == 0 => {
                    let raw: String = self.chars[start..self.pos].iter().collect();
                    self.pos += 1;
                    return raw;
                }
                '}' => level -= 1,
                _ => {}
            }
            self.pos += 1;
        }
        self.pos = self.pos.min(self.limit);
        self.chars[start..self.pos].iter().collect()
    }

    fn read_name(&mut self) -> String {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_alphabetic()) {
            self.pos += 1;
        }
        self.chars[start..self.pos].iter().collect()
    }

    /// Next argument as raw text: a group, a control sequence or one char.
    fn read_raw_arg(&mut self) -> String {
        self.skip_whitespace();
        match self.peek() {
            Some('{') => self.read_raw_group(),
            Some('\\') => {
                self.pos += 1;
                let name = self.read_name();
                if name.is_empty() {
                    let symbol = self.peek().map(String::from).unwrap_or_default();
                    self.pos = (self.pos + 1).min(self.limit);
                    format!("\\{symbol}")
                } else {
                    format!("\\{name}")
                }
            }
            Some(c) => {
                self.pos += 1;
                c.to_string()
            }
            None => String::new(),
        }
    }

    fn read_rendered_arg(&mut self) -> Rendered {
        self.skip_whitespace();
        match self.peek() {
            Some('{') => self.render_group(),
            Some('\\') => {
                // Unbraced arguments nest through macros rather than groups.
                self.enter()?;
                let mut out = String::new();
                self.render_escape(&mut out, &Stop::Eof)?;
                self.leave();
                Ok(out)
            }
            Some(c) => {
                self.pos += 1;
                Ok(c.to_string())
            }
            None => Ok(String::new()),
        }
    }

    /// Raw text of a `[...]` optional argument, if one follows.
    fn read_optional_raw(&mut self) -> Option<String> {
        let saved = self.pos;
        self.skip_whitespace();
        if !self.eat('[') {
            self.pos = saved;
            return None;
        }
        let start = self.pos;
        let mut level = 0usize;
        while let Some(c) = self.peek() {
            match c {
                '\\' => self.pos += 1,
                '{' => level += 1,
                '}' => level = level.saturating_sub(1),
                ']' if level == 0 => {
                    let raw: String = self.chars[start..self.pos].iter().collect();
                    self.pos += 1;
                    return Some(raw);
                }
                _ => {}
            }
            self.pos += 1;
        }
        self.pos = self.pos.min(self.limit);
        Some(self.chars[start..self.pos].iter().collect())
    }

    fn skip_optionals(&mut self) {
        while self.read_optional_raw().is_some() {}
    }

    /// Skip a TeX dimension such as `2pt`, `-1.5em` or `0.5\baselineskip`.
    fn skip_dimension(&mut self) {
        self.skip_whitespace();
        self.eat('=');
        self.skip_whitespace();
        if !self.eat('-') {
            self.eat('+');
        }
        while self.peek().is_some_and(|c| c.is_ascii_digit() || c == '.' || c == ',') {
            self.pos += 1;
        }
        self.skip_inline_spaces();
        if self.eat('\\') {
            self.read_name();
        } else {
            for _ in 0..2 {
                if self.peek().is_some_and(|c| c.is_ascii_lowercase()) {
                    self.pos += 1;
                }
            }
        }
    }

    /// Skip an environment body, honoring nested environments of the same name.
    fn skip_environment(&mut self, name: &str) {
        let begin: Vec<char> = format!("\\begin{{{name}}}").chars().collect();
        let end: Vec<char> = format!("\\end{{{name}}}").chars().collect();
        let mut level = 0usize;
        while self.pos < self.limit {
            if self.starts_with_at(self.pos, &end) {
                self.pos += end.len();
                if level == 0 {
                    return;
                }
                level -= 1;
            } else if self.starts_with_at(self.pos, &begin) {
                self.pos += begin.len();
                level += 1;
            } else {
                self.pos += 1;
            }
        }
    }

    /// Raw environment body up to `\end{name}`.
    fn read_verbatim(&mut self, name: &str) -> String {
        let end: Vec<char> = format!("\\end{{{name}}}").chars().collect();
        let start = self.pos;
        while self.pos < self.limit && !self.starts_with_at(self.pos, &end) {
            self.pos += 1;
        }
        let body: String = self.chars[start..self.pos].iter().collect();
        self.pos = (self.pos + end.len()).min(self.limit);
        body
    }

    /// Handle a backslash sequence; the cursor is on the backslash.
    fn render_escape(&mut self, out: &mut String, stop: &Stop) -> Result<Flow, ConversionError> {
        self.pos += 1;
        let Some(c) = self.peek() else {
            return Ok(Flow::Continue);
        };

        if c.is_ascii_alphabetic() {
            let name = self.read_name();
            self.eat('*');
            return self.render_macro(&name, out, stop);
        }

        self.pos += 1;
        match c {
            '\\' => {
                self.eat('*');
                self.read_optional_raw();
                out.push('\n');
            }
            '&' | '%' | '$' | '#' | '_' | '{' | '}' => out.push(c),
            ' ' | '\n' | '\t' | ',' | ';' | ':' | '>' => out.push(' '),
            '!' | '-' | '/' | '@' => {}
            '(' => {
                let math = self.render_nested(Stop::InlineMath)?;
                out.push_str(&math);
            }
            '[' => {
                let math = self.render_nested(Stop::DisplayMath)?;
                out.push('\n');
                out.push_str(math.trim());
                out.push('\n');
            }
            ')' if *stop == Stop::InlineMath => return Ok(Flow::Close),
            ']' if *stop == Stop::DisplayMath => return Ok(Flow::Close),
            ')' | ']' => {}
            '\'' | '`' | '^' | '"' | '~' | '=' | '.' => {
                let base = self.read_accent_base();
                out.push_str(&accented(c, &base));
            }
            _ => out.push(c),
        }
        Ok(Flow::Continue)
    }

    fn read_accent_base(&mut self) -> String {
        let raw = self.read_raw_arg();
        match raw.trim() {
            "\\i" => "i".to_string(),
            "\\j" => "j".to_string(),
            other => other.to_string(),
        }
    }

    fn render_macro(
        &mut self,
        name: &str,
        out: &mut String,
        stop: &Stop,
    ) -> Result<Flow, ConversionError> {
        match name {
            "begin" => {
                let env = self.read_raw_arg();
                self.render_environment(env.trim(), out)?;
            }
            "end" => {
                let env = self.read_raw_arg();
                if let Stop::Env(open) = stop {
                    if env.trim() == open.as_str() {
                        return Ok(Flow::Close);
                    }
                }
            }
            "item" => {
                let label = self.read_optional_raw();
                out.truncate(out.trim_end().len());
                out.push('\n');
                match label {
                    Some(label) => {
                        out.push_str(self.render_fragment(&label)?.trim());
                        out.push(' ');
                    }
                    None => out.push_str("* "),
                }
                self.skip_whitespace();
            }
            "bibitem" => {
                self.read_optional_raw();
                self.read_raw_arg();
                out.push('\n');
                self.skip_whitespace();
            }
            "part" | "chapter" | "section" | "subsection" | "subsubsection" | "paragraph"
            | "subparagraph" => {
                self.read_optional_raw();
                let heading = self.read_rendered_arg()?;
                out.push_str("\n\n");
                out.push_str(heading.trim());
                out.push_str("\n\n");
                self.skip_whitespace();
            }
            "title" | "author" | "date" => {
                self.read_optional_raw();
                let value = self.read_rendered_arg()?.trim().to_string();
                match name {
                    "title" => self.title = Some(value),
                    "author" => self.author = Some(value),
                    _ => self.date = Some(value),
                }
            }
            "and" => {
                out.truncate(out.trim_end().len());
                out.push_str(", ");
                self.skip_whitespace();
            }
            "maketitle" => {
                for part in [&self.title, &self.author, &self.date].into_iter().flatten() {
                    if !part.is_empty() {
                        out.push_str("\n\n");
                        out.push_str(part);
                    }
                }
                out.push_str("\n\n");
                self.skip_inline_spaces();
            }
            "cite" | "citep" | "citet" | "citealp" | "citealt" | "citeauthor" | "citeyear"
            | "citeyearpar" | "citenum" | "Cite" | "Citep" | "Citet" | "parencite" | "textcite"
            | "autocite" | "footcite" | "shortcite" => {
                self.skip_optionals();
                self.read_raw_arg();
                out.push_str(CITATION_PLACEHOLDER);
            }
            "ref" | "eqref" | "autoref" | "cref" | "Cref" | "pageref" | "nameref" | "vref" => {
                self.read_raw_arg();
                out.push_str(REFERENCE_PLACEHOLDER);
            }
            "label" | "nocite" | "thanks" => {
                self.read_raw_arg();
            }
            "url" | "nolinkurl" => out.push_str(&self.read_raw_arg()),
            "href" => {
                self.read_raw_arg();
                let text = self.read_rendered_arg()?;
                out.push_str(&text);
            }
            "footnote" | "footnotetext" => {
                self.read_optional_raw();
                let note = self.read_rendered_arg()?;
                out.push_str(" (");
                out.push_str(note.trim());
                out.push(')');
            }
            "frac" | "dfrac" | "tfrac" => {
                let numerator = self.read_rendered_arg()?;
                let denominator = self.read_rendered_arg()?;
                out.push_str(&format!("{numerator}/{denominator}"));
            }
            "sqrt" => {
                self.read_optional_raw();
                let radicand = self.read_rendered_arg()?;
                out.push_str(&format!("\u{221a}({radicand})"));
            }
            "textcolor" | "colorbox" | "parbox" | "raisebox" => {
                self.read_optional_raw();
                self.read_raw_arg();
                self.skip_optionals();
                let text = self.read_rendered_arg()?;
                out.push_str(&text);
            }
            "fcolorbox" | "multicolumn" | "multirow" => {
                self.read_raw_arg();
                self.read_optional_raw();
                self.read_raw_arg();
                let text = self.read_rendered_arg()?;
                out.push_str(&text);
            }
            "newcommand" | "renewcommand" | "providecommand" | "DeclareRobustCommand" => {
                self.read_raw_arg();
                self.skip_optionals();
                self.read_raw_arg();
            }
            "newenvironment" | "renewenvironment" => {
                self.read_raw_arg();
                self.skip_optionals();
                self.read_raw_arg();
                self.read_raw_arg();
            }
            "newtheorem" => {
                self.read_raw_arg();
                self.read_optional_raw();
                self.read_raw_arg();
                self.read_optional_raw();
            }
            "def" | "gdef" | "edef" | "xdef" => {
                self.read_raw_arg();
                while self.peek().is_some_and(|c| c != '{') {
                    self.pos += 1;
                }
                if self.peek().is_some() {
                    self.read_raw_group();
                }
            }
            "let" => {
                self.read_raw_arg();
                self.skip_whitespace();
                self.eat('=');
                self.read_raw_arg();
            }
            "vskip" | "hskip" | "kern" => self.skip_dimension(),
            "newline" | "linebreak" => out.push('\n'),
            "par" => out.push_str("\n\n"),
            "quad" | "qquad" | "enspace" | "thinspace" | "enskip" => out.push(' '),
            "c" | "v" | "u" | "H" | "k" | "r" | "d" | "b" | "t" => {
                let base = self.read_accent_base();
                let accent = name.chars().next().unwrap_or_default();
                out.push_str(&accented(accent, &base));
            }
            _ => {
                if let Some(symbol) = symbol(name) {
                    out.push_str(symbol);
                } else if let Some((optional, count)) = dropped_arguments(name) {
                    if optional {
                        self.skip_optionals();
                    }
                    for _ in 0..count {
                        self.read_raw_arg();
                    }
                } else if is_wrapper(name) {
                    self.read_optional_raw();
                    let text = self.read_rendered_arg()?;
                    out.push_str(&text);
                } else if is_declaration(name) {
                    self.skip_inline_spaces();
                }
                // Any other macro renders as nothing; following groups are
                // rendered by the main loop.
            }
        }
        Ok(Flow::Continue)
    }

    fn render_environment(&mut self, name: &str, out: &mut String) -> Result<(), ConversionError> {
        match name {
            "document" => {
                let body = self.render_environment_body(name)?;
                out.push_str(&body);
                self.pos = self.limit;
            }
            "verbatim" | "verbatim*" | "Verbatim" | "lstlisting" | "alltt" | "minted" => {
                if name != "verbatim" && name != "verbatim*" {
                    self.read_optional_raw();
                }
                if name == "minted" {
                    self.read_raw_arg();
                }
                out.push_str(&self.read_verbatim(name));
            }
            "abstract" => {
                let body = self.render_environment_body(name)?;
                out.push_str("\n\nAbstract\n\n");
                out.push_str(body.trim());
                out.push_str("\n\n");
            }
            "thebibliography" => {
                self.read_raw_arg();
                let body = self.render_environment_body(name)?;
                out.push_str("\n\nReferences\n\n");
                out.push_str(body.trim());
                out.push_str("\n\n");
            }
            "itemize" | "enumerate" | "description" => {
                self.read_optional_raw();
                let body = self.render_environment_body(name)?;
                out.push_str(&body);
                out.push('\n');
            }
            "minipage" | "multicols" | "multicols*" | "alignat" | "alignat*" | "wrapfigure" => {
                self.skip_optionals();
                self.read_raw_arg();
                if name == "wrapfigure" {
                    self.read_raw_arg();
                    self.skip_environment(name);
                } else {
                    let body = self.render_environment_body(name)?;
                    out.push_str(&body);
                }
            }
            _ if is_dropped_environment(name) => self.skip_environment(name),
            _ if is_math_environment(name) => {
                let body = self.render_environment_body(name)?;
                out.push('\n');
                out.push_str(body.trim());
                out.push('\n');
            }
            _ => {
                self.read_optional_raw();
                let body = self.render_environment_body(name)?;
                out.push_str(&body);
            }
        }
        Ok(())
    }

    fn render_environment_body(&mut self, name: &str) -> Rendered {
        self.render_nested(Stop::Env(name.to_string()))
    }
}

fn is_dropped_environment(name: &str) -> bool {
    matches!(
        name,
        "figure*"
            | "table*"
            | "tikzpicture"
            | "pspicture"
            | "picture"
            | "wraptable"
            | "sidewaysfigure"
            | "sidewaystable"
            | "longtable"
            | "tabularx"
            | "tabular*"
            | "supertabular"
            | "algorithm"
            | "algorithmic"
            | "comment"
            | "filecontents"
            | "filecontents*"
    )
}

fn is_math_environment(name: &str) -> bool {
    matches!(
        name.trim_end_matches('*'),
        "equation" | "align" | "gather" | "multline" | "eqnarray" | "flalign" | "displaymath" | "math"
    )
}

/// Macros whose arguments are consumed and dropped: (optional args first, mandatory count).
fn dropped_arguments(name: &str) -> Option<(bool, usize)> {
    let arity = match name {
        "documentclass" | "usepackage" | "RequirePackage" | "includegraphics" | "addbibresource"
        | "captionsetup" | "setlist" => (true, 1),
        "vspace" | "hspace" | "bibliographystyle" | "bibliography" | "pagestyle" | "thispagestyle"
        | "pagenumbering" | "input" | "include" | "includeonly" | "graphicspath" | "hypersetup"
        | "geometry" | "color" | "linespread" | "stepcounter" | "refstepcounter" | "newlength"
        | "theoremstyle" | "phantom" | "hphantom" | "vphantom" | "cline" | "markright"
        | "urlstyle" | "newcounter" => (false, 1),
        "fontsize" | "setlength" | "addtolength" | "setcounter" | "addtocounter" | "settowidth"
        | "numberwithin" | "markboth" | "DeclareMathOperator" => (false, 2),
        "definecolor" => (false, 3),
        _ => return None,
    };
    Some(arity)
}

/// Formatting macros rendering their single argument.
fn is_wrapper(name: &str) -> bool {
    matches!(
        name,
        "textbf"
            | "textit"
            | "textsl"
            | "textsc"
            | "textsf"
            | "texttt"
            | "textrm"
            | "textup"
            | "textmd"
            | "textnormal"
            | "emph"
            | "underline"
            | "uline"
            | "sout"
            | "mbox"
            | "hbox"
            | "fbox"
            | "makebox"
            | "framebox"
            | "text"
            | "textsuperscript"
            | "textsubscript"
            | "mathrm"
            | "mathbf"
            | "mathit"
            | "mathsf"
            | "mathtt"
            | "mathcal"
            | "mathbb"
            | "mathfrak"
            | "mathscr"
            | "boldsymbol"
            | "bm"
            | "operatorname"
            | "ensuremath"
            | "caption"
            | "centerline"
            | "enquote"
            | "hl"
    )
}

/// Zero-argument layout and font declarations.
fn is_declaration(name: &str) -> bool {
    matches!(
        name,
        "noindent"
            | "indent"
            | "centering"
            | "raggedright"
            | "raggedleft"
            | "tableofcontents"
            | "listoffigures"
            | "listoftables"
            | "newpage"
            | "clearpage"
            | "cleardoublepage"
            | "pagebreak"
            | "smallskip"
            | "medskip"
            | "bigskip"
            | "hfill"
            | "vfill"
            | "null"
            | "relax"
            | "protect"
            | "appendix"
            | "frontmatter"
            | "mainmatter"
            | "backmatter"
            | "small"
            | "footnotesize"
            | "scriptsize"
            | "tiny"
            | "large"
            | "Large"
            | "LARGE"
            | "huge"
            | "Huge"
            | "normalsize"
            | "bfseries"
            | "itshape"
            | "ttfamily"
            | "rmfamily"
            | "sffamily"
            | "scshape"
            | "upshape"
            | "mdseries"
            | "normalfont"
            | "em"
            | "bf"
            | "it"
            | "rm"
            | "tt"
            | "sf"
            | "sc"
            | "sl"
            | "selectfont"
            | "displaystyle"
            | "textstyle"
            | "scriptstyle"
            | "left"
            | "right"
            | "big"
            | "Big"
            | "bigg"
            | "Bigg"
            | "nonumber"
            | "notag"
            | "hline"
            | "toprule"
            | "midrule"
            | "bottomrule"
            | "sloppy"
            | "fussy"
            | "onecolumn"
            | "twocolumn"
            | "printbibliography"
            | "ignorespaces"
            | "xspace"
            | "makeatletter"
            | "makeatother"
            | "allowdisplaybreaks"
            | "today"
    )
}

/// Text for symbol macros.
fn symbol(name: &str) -> Option<&'static str> {
    let text = match name {
        "ldots" | "dots" | "cdots" | "textellipsis" => "\u{2026}",
        "textendash" => "\u{2013}",
        "textemdash" => "\u{2014}",
        "S" => "\u{a7}",
        "P" => "\u{b6}",
        "copyright" | "textcopyright" => "\u{a9}",
        "textregistered" => "\u{ae}",
        "texttrademark" => "\u{2122}",
        "pounds" | "textsterling" => "\u{a3}",
        "euro" | "texteuro" => "\u{20ac}",
        "dag" | "textdagger" => "\u{2020}",
        "ddag" | "textdaggerdbl" => "\u{2021}",
        "textbullet" => "\u{2022}",
        "textbackslash" => "\\",
        "textasciitilde" => "~",
        "textasciicircum" => "^",
        "textless" => "<",
        "textgreater" => ">",
        "textbar" => "|",
        "textunderscore" => "_",
        "LaTeX" => "LaTeX",
        "LaTeXe" => "LaTeX2e",
        "TeX" => "TeX",
        "degree" | "textdegree" => "\u{b0}",
        "ss" => "\u{df}",
        "o" => "\u{f8}",
        "O" => "\u{d8}",
        "ae" => "\u{e6}",
        "AE" => "\u{c6}",
        "oe" => "\u{153}",
        "OE" => "\u{152}",
        "aa" => "\u{e5}",
        "AA" => "\u{c5}",
        "l" => "\u{142}",
        "L" => "\u{141}",
        "i" => "\u{131}",
        "j" => "\u{237}",
        "alpha" => "\u{3b1}",
        "beta" => "\u{3b2}",
        "gamma" => "\u{3b3}",
        "delta" => "\u{3b4}",
        "epsilon" => "\u{3f5}",
        "varepsilon" => "\u{3b5}",
        "zeta" => "\u{3b6}",
        "eta" => "\u{3b7}",
        "theta" => "\u{3b8}",
        "vartheta" => "\u{3d1}",
        "iota" => "\u{3b9}",
        "kappa" => "\u{3ba}",
        "lambda" => "\u{3bb}",
        "mu" => "\u{3bc}",
        "nu" => "\u{3bd}",
        "xi" => "\u{3be}",
        "pi" => "\u{3c0}",
        "varpi" => "\u{3d6}",
        "rho" => "\u{3c1}",
        "varrho" => "\u{3f1}",
        "sigma" => "\u{3c3}",
        "varsigma" => "\u{3c2}",
        "tau" => "\u{3c4}",
        "upsilon" => "\u{3c5}",
        "phi" => "\u{3d5}",
        "varphi" => "\u{3c6}",
        "chi" => "\u{3c7}",
        "psi" => "\u{3c8}",
        "omega" => "\u{3c9}",
        "Gamma" => "\u{393}",
        "Delta" => "\u{394}",
        "Theta" => "\u{398}",
        "Lambda" => "\u{39b}",
        "Xi" => "\u{39e}",
        "Pi" => "\u{3a0}",
        "Sigma" => "\u{3a3}",
        "Upsilon" => "\u{3a5}",
        "Phi" => "\u{3a6}",
        "Psi" => "\u{3a8}",
        "Omega" => "\u{3a9}",
        "infty" => "\u{221e}",
        "pm" => "\u{b1}",
        "mp" => "\u{2213}",
        "times" => "\u{d7}",
        "div" => "\u{f7}",
        "cdot" => "\u{22c5}",
        "leq" | "le" => "\u{2264}",
        "geq" | "ge" => "\u{2265}",
        "neq" | "ne" => "\u{2260}",
        "approx" => "\u{2248}",
        "sim" => "\u{223c}",
        "simeq" => "\u{2243}",
        "equiv" => "\u{2261}",
        "propto" => "\u{221d}",
        "in" => "\u{2208}",
        "notin" => "\u{2209}",
        "subset" => "\u{2282}",
        "subseteq" => "\u{2286}",
        "supset" => "\u{2283}",
        "supseteq" => "\u{2287}",
        "cup" => "\u{222a}",
        "cap" => "\u{2229}",
        "forall" => "\u{2200}",
        "exists" => "\u{2203}",
        "partial" => "\u{2202}",
        "nabla" => "\u{2207}",
        "sum" => "\u{2211}",
        "prod" => "\u{220f}",
        "int" => "\u{222b}",
        "rightarrow" | "to" => "\u{2192}",
        "leftarrow" | "gets" => "\u{2190}",
        "Rightarrow" | "implies" => "\u{21d2}",
        "Leftarrow" => "\u{21d0}",
        "leftrightarrow" => "\u{2194}",
        "Leftrightarrow" | "iff" => "\u{21d4}",
        "mapsto" => "\u{21a6}",
        "ell" => "\u{2113}",
        "hbar" => "\u{210f}",
        "emptyset" | "varnothing" => "\u{2205}",
        "neg" | "lnot" => "\u{ac}",
        "wedge" | "land" => "\u{2227}",
        "vee" | "lor" => "\u{2228}",
        "langle" => "\u{27e8}",
        "rangle" => "\u{27e9}",
        "prime" => "\u{2032}",
        "circ" => "\u{2218}",
        "star" => "\u{22c6}",
        "ast" => "\u{2217}",
        "oplus" => "\u{2295}",
        "otimes" => "\u{2297}",
        "perp" => "\u{22a5}",
        "parallel" => "\u{2225}",
        "mid" => "\u{2223}",
        "ll" => "\u{226a}",
        "gg" => "\u{226b}",
        _ => return None,
    };
    Some(text)
}

/// Precomposed form of `base` under `accent`, when Unicode has one.
fn precomposed(accent: char, base: char) -> Option<char> {
    let c = match (accent, base) {
        ('\'', 'a') => 'á',
        ('\'', 'e') => 'é',
        ('\'', 'i') => 'í',
        ('\'', 'o') => 'ó',
        ('\'', 'u') => 'ú',
        ('\'', 'y') => 'ý',
        ('\'', 'A') => 'Á',
        ('\'', 'E') => 'É',
        ('\'', 'I') => 'Í',
        ('\'', 'O') => 'Ó',
        ('\'', 'U') => 'Ú',
        ('\'', 'Y') => 'Ý',
        ('\'', 'c') => 'ć',
        ('\'', 'C') => 'Ć',
        ('\'', 'n') => 'ń',
        ('\'', 'N') => 'Ń',
        ('\'', 's') => 'ś',
        ('\'', 'S') => 'Ś',
        ('\'', 'z') => 'ź',
        ('\'', 'Z') => 'Ź',
        ('`', 'a') => 'à',
        ('`', 'e') => 'è',
        ('`', 'i') => 'ì',
        ('`', 'o') => 'ò',
        ('`', 'u') => 'ù',
        ('`', 'A') => 'À',
        ('`', 'E') => 'È',
        ('`', 'I') => 'Ì',
        ('`', 'O') => 'Ò',
        ('`', 'U') => 'Ù',
        ('^', 'a') => 'â',
        ('^', 'e') => 'ê',
        ('^', 'i') => 'î',
        ('^', 'o') => 'ô',
        ('^', 'u') => 'û',
        ('^', 'A') => 'Â',
        ('^', 'E') => 'Ê',
        ('^', 'I') => 'Î',
        ('^', 'O') => 'Ô',
        ('^', 'U') => 'Û',
        ('"', 'a') => 'ä',
        ('"', 'e') => 'ë',
        ('"', 'i') => 'ï',
        ('"', 'o') => 'ö',
        ('"', 'u') => 'ü',
        ('"', 'y') => 'ÿ',
        ('"', 'A') => 'Ä',
        ('"', 'E') => 'Ë',
        ('"', 'I') => 'Ï',
        ('"', 'O') => 'Ö',
        ('"', 'U') => 'Ü',
        ('~', 'a') => 'ã',
        ('~', 'n') => 'ñ',
        ('~', 'o') => 'õ',
        ('~', 'A') => 'Ã',
        ('~', 'N') => 'Ñ',
        ('~', 'O') => 'Õ',
        ('c', 'c') => 'ç',
        ('c', 'C') => 'Ç',
        ('c', 's') => 'ş',
        ('c', 'S') => 'Ş',
        ('v', 'c') => 'č',
        ('v', 'C') => 'Č',
        ('v', 's') => 'š',
        ('v', 'S') => 'Š',
        ('v', 'z') => 'ž',
        ('v', 'Z') => 'Ž',
        ('v', 'r') => 'ř',
        ('v', 'R') => 'Ř',
        ('v', 'e') => 'ě',
        ('v', 'E') => 'Ě',
        ('v', 'n') => 'ň',
        ('v', 'N') => 'Ň',
        ('r', 'a') => 'å',
        ('r', 'A') => 'Å',
        ('r', 'u') => 'ů',
        ('r', 'U') => 'Ů',
        ('=', 'a') => 'ā',
        ('=', 'e') => 'ē',
        ('=', 'i') => 'ī',
        ('=', 'o') => 'ō',
        ('=', 'u') => 'ū',
        ('=', 'A') => 'Ā',
        ('=', 'E') => 'Ē',
        ('=', 'I') => 'Ī',
        ('=', 'O') => 'Ō',
        ('=', 'U') => 'Ū',
        ('u', 'a') => 'ă',
        ('u', 'A') => 'Ă',
        ('u', 'g') => 'ğ',
        ('u', 'G') => 'Ğ',
        ('.', 'z') => 'ż',
        ('.', 'Z') => 'Ż',
        ('.', 'e') => 'ė',
        ('.', 'I') => 'İ',
        ('H', 'o') => 'ő',
        ('H', 'O') => 'Ő',
        ('H', 'u') => 'ű',
        ('H', 'U') => 'Ű',
        ('k', 'a') => 'ą',
        ('k', 'A') => 'Ą',
        ('k', 'e') => 'ę',
        ('k', 'E') => 'Ę',
        _ => return None,
    };
    Some(c)
}

fn combining_mark(accent: char) -> char {
    match accent {
        '\'' => '\u{301}',
        '`' => '\u{300}',
        '^' => '\u{302}',
        '"' => '\u{308}',
        '~' => '\u{303}',
        '=' => '\u{304}',
        '.' => '\u{307}',
        'u' => '\u{306}',
        'v' => '\u{30c}',
        'H' => '\u{30b}',
        'c' => '\u{327}',
        'k' => '\u{328}',
        'r' => '\u{30a}',
        'd' => '\u{323}',
        'b' => '\u{331}',
        _ => '\u{361}',
    }
}

/// `base` with `accent` applied to its first character.
fn accented(accent: char, base: &str) -> String {
    let mut chars = base.chars();
    let Some(first) = chars.next() else {
        return match accent {
            '\'' => "\u{b4}".to_string(),
            '"' => "\u{a8}".to_string(),
            '=' => "\u{af}".to_string(),
            '.' => "\u{2d9}".to_string(),
            other => other.to_string(),
        };
    };
    let mut out = String::with_capacity(base.len() + 2);
    match precomposed(accent, first) {
        Some(c) => out.push(c),
        None => {
            out.push(first);
            out.push(combining_mark(accent));
        }
    }
    out.extend(chars);
    out
}
