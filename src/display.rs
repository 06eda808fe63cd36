use owo_colors::{OwoColorize, Stream, Style};

use crate::types::{Delta, FragmentResult, Ranking};

/// ANSI sequence moving the cursor home and clearing the screen.
pub const CLEAR_SCREEN: &str = "\x1b[H\x1b[2J";

const HEADERS: [&str; 6] = [
    "Benchmark",
    "Iterations",
    "Min(ms)",
    "Max(ms)",
    "Median(ms)",
    "Delta",
];
const COLUMN_WIDTH: usize = 10;
const DELTA_WIDTH: usize = 12;

fn style_heading() -> Style {
    Style::new().bold()
}

fn style_fastest() -> Style {
    Style::new().green().bold()
}

pub fn format_banner() -> String {
    let text = "Welcome to tinybench, a tiny tool for benchmarking JavaScript code";
    format!(
        "\n {}\n",
        text.if_supports_color(Stream::Stdout, |s| s.style(style_heading()))
    )
}

/// Announce a fragment before it is sampled. `ordinal` is 1-based.
pub fn format_fragment_header(ordinal: usize, code: &str) -> String {
    let indented = code.trim_end_matches('\n').replace('\n', "\n\t");
    let title = format!("Found benchmark {}:", ordinal);
    format!(
        "\n {}\n\n\t```\n\t{}\n\t```\n\n Executing benchmark {}",
        title.if_supports_color(Stream::Stdout, |s| s.cyan()),
        indented,
        ordinal
    )
}

/// Results table, one row per fragment in input order. Durations are
/// truncated to whole milliseconds.
pub fn format_results(results: &[FragmentResult], ranking: &Ranking) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "\n {}\n",
        "Results".if_supports_color(Stream::Stdout, |s| s.style(style_heading()))
    ));

    let header: Vec<String> = HEADERS
        .iter()
        .enumerate()
        .map(|(i, h)| {
            let width = if i == HEADERS.len() - 1 { DELTA_WIDTH } else { COLUMN_WIDTH };
            format!("{:<width$}", h, width = width)
        })
        .collect();
    out.push_str(&format!(" | {} |\n", header.join(" | ")));

    let rule_len = (COLUMN_WIDTH + 3) * (HEADERS.len() - 1) + DELTA_WIDTH + 4;
    out.push_str(&format!(" {}\n", "-".repeat(rule_len)));

    for (i, result) in results.iter().enumerate() {
        let delta = ranking.deltas.get(i).copied().unwrap_or(Delta::Incomparable);
        let delta_padded = format!("{:<width$}", delta.to_string(), width = DELTA_WIDTH);
        let delta_colored = match delta {
            Delta::Fastest => delta_padded
                .if_supports_color(Stream::Stdout, |s| s.style(style_fastest()))
                .to_string(),
            Delta::Slower(_) => delta_padded
                .if_supports_color(Stream::Stdout, |s| s.yellow())
                .to_string(),
            Delta::Incomparable => delta_padded
                .if_supports_color(Stream::Stdout, |s| s.dimmed())
                .to_string(),
        };

        out.push_str(&format!(
            " | {:<w$} | {:<w$} | {:<w$} | {:<w$} | {:<w$} | {} |\n",
            i + 1,
            result.iterations,
            result.min.as_millis(),
            result.max.as_millis(),
            result.median.as_millis(),
            delta_colored,
            w = COLUMN_WIDTH
        ));
    }

    out
}
