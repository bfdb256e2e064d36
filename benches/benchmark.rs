//! Performance benchmarks for tex2corpus.
//!
//! Run with: `cargo bench`
//!
//! Benchmarks include:
//! - A small synthetic paper (~2KB) through each pipeline stage
//! - The same paper repeated to larger sizes for throughput

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use tex2corpus::normalize::normalize;
use tex2corpus::preclean::preclean;
use tex2corpus::{clean_tex, LatexConverter, LatexToText, Options};

const SAMPLE_TEX: &str = r"
\documentclass[11pt]{article}
\usepackage{amsmath,graphicx}
\title{A Sample Paper}
\author{Jane Roe \and John Doe}
\begin{document}
\maketitle
\begin{abstract}
We study the behaviour of sample papers under conversion~\cite{roe2020}.
\end{abstract}

\section{Introduction}
\label{sec:intro}
Plain-text corpora built from arXiv sources are a staple of language
modelling. As shown in Table~\ref{tab:results}, the energy $E = mc^2$ is
conserved.

\begin{table}[t]
\centering
\begin{tabular}{lc}
Method & Score \\
Ours & $0.93$ \\
\end{tabular}
\caption{Results.}
\label{tab:results}
\end{table}

\section{Method}
We minimise
$$ \mathcal{L}(\theta) = \sum_i \ell(x_i; \theta) $$
using \emph{stochastic} gradient descent---see \citet{bottou2010} for
details. % cite more here
\begin{itemize}
\item Fast convergence.
\item Simple implementation.
\end{itemize}

\begin{figure}
\includegraphics[width=\linewidth]{plot.pdf}
\caption{Loss curve.}
\end{figure}

\section{Conclusion}
Na\"ive methods work surprisingly well.
\end{document}
";

fn bench_clean_tex(c: &mut Criterion) {
    c.bench_function("clean_tex", |b| {
        b.iter(|| clean_tex(black_box(SAMPLE_TEX)));
    });
}

fn bench_stages(c: &mut Criterion) {
    let options = Options::default();
    let precleaned = preclean(SAMPLE_TEX, &options);
    let converter = LatexConverter::new();
    let converted = converter.latex_to_text(&precleaned).unwrap_or_default();

    c.bench_function("preclean", |b| {
        b.iter(|| preclean(black_box(SAMPLE_TEX), black_box(&options)));
    });
    c.bench_function("convert", |b| {
        b.iter(|| converter.latex_to_text(black_box(&precleaned)));
    });
    c.bench_function("normalize", |b| {
        b.iter(|| normalize(black_box(&converted)));
    });
}

/// Throughput on larger documents built by repeating the sample body
fn bench_document_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("document_size");

    for repeat in [1usize, 10, 100] {
        let tex = SAMPLE_TEX.repeat(repeat);
        let size_kb = tex.len() / 1024;
        group.throughput(Throughput::Bytes(tex.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("clean_tex", format!("x{repeat} ({size_kb}KB)")),
            &tex,
            |b, tex| {
                b.iter(|| clean_tex(black_box(tex)));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_clean_tex, bench_stages, bench_document_sizes);
criterion_main!(benches);
