//! LaTeX rendering of combined result tables
//!
//! The generated fragment relies on these definitions in the including
//! document (plus the `adjustbox`, `multirow` and `makecell` packages):
//!
//! ```latex
//! \newcommand{\mybest}[1]{\textbf{#1}}
//! \newcommand{\mysecond}[1]{\underline{#1}}
//! \newcommand{\mystd}[1]{\,(#1)}
//! ```

use super::names::{title_case, DisplayNames};
use super::{CellStyle, CombinedTable};
use std::fmt::Write;

/// Cell content for a method with no result on a dataset.
pub const MISSING_CELL: &str = "\u{2014}";

/// Format one result cell.
///
/// - Missing or NaN mean: [`MISSING_CELL`]
/// - `percentage`: mean and std are multiplied by 100
/// - Mean with two decimals, followed by ` \mystd{std}` when std is present
/// - Wrapped in `\mybest{}` / `\mysecond{}` according to `style`
#[must_use]
pub fn format_cell(mean: Option<f64>, std: Option<f64>, style: CellStyle, percentage: bool) -> String {
    let Some(mut mean) = mean.filter(|m| !m.is_nan()) else {
        return MISSING_CELL.to_string();
    };
    let mut std = std.filter(|s| !s.is_nan());
    if percentage {
        mean *= 100.0;
        std = std.map(|s| s * 100.0);
    }

    let mut base = format!("{mean:.2}");
    if let Some(std) = std {
        let _ = write!(base, " \\mystd{{{std:.2}}}");
    }

    match style {
        CellStyle::Best => format!("\\mybest{{{base}}}"),
        CellStyle::Second => format!("\\mysecond{{{base}}}"),
        CellStyle::Plain => base,
    }
}

/// Render a combined table as a complete `table*` environment.
#[must_use]
pub fn render_table(table: &CombinedTable, metric: &str, names: &DisplayNames, percentage: bool) -> String {
    let n = table.datasets().len();
    let mut out = String::new();

    let _ = writeln!(out, "\\begin{{table*}}");
    let _ = writeln!(out, "\\centering");
    let _ = writeln!(out, "\\begin{{adjustbox}}{{width=\\linewidth,center}}");
    let _ = writeln!(out, "\\begin{{tabular}}{{l|{}}}", "c".repeat(n));
    let _ = writeln!(out, "\\Xhline{{1pt}}");
    let _ = writeln!(
        out,
        "\\multirow{{2}}{{*}}{{\\textbf{{Methods}}}} & \\multicolumn{{{n}}}{{c}}{{\\textbf{{Datasets}}}} \\\\"
    );
    let _ = writeln!(out, "\\cline{{2-{}}}", n + 1);
    let dataset_header: Vec<String> = table.datasets().iter().map(|d| names.dataset(d)).collect();
    let _ = writeln!(out, "& {} \\\\", dataset_header.join(" & "));
    let _ = writeln!(out, "\\Xhline{{0.75pt}}");

    for row in table.rows() {
        let mut entries = Vec::with_capacity(n + 1);
        entries.push(names.method(row.method()));
        entries.extend(
            row.cells()
                .iter()
                .map(|cell| format_cell(cell.mean, cell.std, cell.style, percentage)),
        );
        let _ = writeln!(out, "{} \\\\", entries.join(" & "));
    }

    let _ = writeln!(out, "\\Xhline{{1pt}}");
    let _ = writeln!(out, "\\end{{tabular}}");
    let _ = writeln!(out, "\\end{{adjustbox}}");
    let _ = writeln!(
        out,
        "\\caption{{\\textbf{{{} results across multiple datasets.}} \
         The best mean per dataset is in bold (\\mybest{{xxx}}), the second-best is underlined \
         (\\mysecond{{xxx}}). Standard deviations appear in parentheses via \\mystd{{xxx}}.}}",
        title_case(metric)
    );
    let _ = writeln!(out, "\\label{{tab:results_{metric}}}");
    let _ = writeln!(out, "\\end{{table*}}");
    out
}
