//! Formatted terminal output: fit tables and figure summaries.
//!
//! We keep formatting code in one place so:
//! - the math/fitting code stays clean and testable
//! - output changes are localized (covered by the golden tests below)

use crate::figures::{Figure, FigureFit, Skipped};
use crate::fit::GroupFits;

/// Format a figure's fitted series and skipped series.
pub fn format_figure_summary(figure: &Figure) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== {} ===\n", figure.title));
    out.push_str(&format!("x: {} | y: {}\n\n", figure.x_label, figure.y_label));

    if figure.fits.is_empty() {
        out.push_str("No series could be fitted.\n");
    } else {
        out.push_str(&format_fit_table(&figure.fits));
    }
    out.push_str(&format_skipped(&figure.skipped));
    for h in &figure.hlines {
        out.push_str(&format!("{}: {:.0}\n", h.label, h.y));
    }
    out
}

/// Format per-group fits from an ad-hoc `fit --group-by` run.
pub fn format_group_fits(fits: &GroupFits) -> String {
    let rows: Vec<FigureFit> = fits
        .fits
        .iter()
        .map(|g| FigureFit {
            label: g.series.label.clone(),
            fit: g.fit.clone(),
        })
        .collect();
    let skipped: Vec<Skipped> = fits
        .skipped
        .iter()
        .map(|(group, error)| Skipped {
            label: group.to_string(),
            error: error.clone(),
        })
        .collect();

    let mut out = if rows.is_empty() {
        "No group could be fitted.\n".to_string()
    } else {
        format_fit_table(&rows)
    };
    out.push_str(&format_skipped(&skipped));
    out
}

/// Fit table; higher-degree fits also list their full coefficient vector.
pub fn format_fit_table(rows: &[FigureFit]) -> String {
    let mut out = String::new();
    out.push_str(
        format!(
            "{:<28} {:<10} {:>5} {:>14} {:>14} {:>8} {:>12}\n",
            "series", "space", "n", "slope", "intercept", "r2", "rmse"
        )
        .trim_end(),
    );
    out.push('\n');

    out.push_str(
        format!(
            "{:-<28} {:-<10} {:-<5} {:-<14} {:-<14} {:-<8} {:-<12}\n",
            "", "", "", "", "", "", ""
        )
        .trim_end(),
    );
    out.push('\n');

    for r in rows {
        let q = &r.fit.quality;
        out.push_str(
            format!(
                "{:<28} {:<10} {:>5} {:>14.4} {:>14.4} {:>8.4} {:>12.4}\n",
                truncate(&r.label, 28),
                r.fit.space.display_name(),
                q.n,
                r.fit.slope(),
                r.fit.intercept(),
                q.r_squared,
                q.rmse,
            )
            .trim_end(),
        );
        out.push('\n');
    }

    for r in rows.iter().filter(|r| r.fit.degree > 1) {
        out.push_str(&format!(
            "- {} (degree {}): {}\n",
            r.label,
            r.fit.degree,
            fmt_vec(&r.fit.coefficients)
        ));
    }

    out
}

fn format_skipped(skipped: &[Skipped]) -> String {
    let mut out = String::new();
    for s in skipped {
        out.push_str(&format!("  (skipped {}) {}\n", s.label, s.error));
    }
    out
}

fn fmt_vec(v: &[f64]) -> String {
    let parts: Vec<String> = v.iter().map(|x| format!("{x:.6}")).collect();
    format!("[{}]", parts.join(", "))
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FigureKind, FitQuality, FitResult, FitSpace, Value};
    use crate::error::FitError;

    fn row(label: &str, coefficients: Vec<f64>) -> FigureFit {
        FigureFit {
            label: label.to_string(),
            fit: FitResult {
                space: FitSpace::Linear,
                degree: coefficients.len() - 1,
                coefficients,
                quality: FitQuality {
                    sse: 6.0,
                    rmse: 1.5,
                    r_squared: 0.99,
                    n: 3,
                },
            },
        }
    }

    #[test]
    fn fit_table_golden() {
        let txt = format_fit_table(&[row("Proof Size", vec![-10.0, 10.5])]);
        let expected = concat!(
            "series                       space          n          slope      intercept       r2         rmse\n",
            "---------------------------- ---------- ----- -------------- -------------- -------- ------------\n",
            "Proof Size                   linear         3        10.5000       -10.0000   0.9900       1.5000\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn higher_degree_lists_coefficients() {
        let txt = format_fit_table(&[row("q", vec![1.0, 2.0, 0.5])]);
        assert!(txt.ends_with("- q (degree 2): [1.000000, 2.000000, 0.500000]\n"));
    }

    #[test]
    fn summary_lists_skipped_series() {
        let mut fig = Figure::new(FigureKind::HistoryTree, "History Tree Size", "records", "bytes");
        fig.skipped.push(Skipped {
            label: "512 Attributes, Full Tree".to_string(),
            error: FitError::InsufficientData { needed: 2, got: 1 },
        });
        let txt = format_figure_summary(&fig);
        assert!(txt.starts_with("=== History Tree Size ===\n"));
        assert!(txt.contains("No series could be fitted."));
        assert!(txt.contains("(skipped 512 Attributes, Full Tree) Insufficient data"));
    }

    #[test]
    fn group_fits_report_skipped_group_values() {
        let fits = GroupFits {
            fits: vec![],
            skipped: vec![(Value::Number(512.0), FitError::InsufficientData { needed: 2, got: 0 })],
        };
        let txt = format_group_fits(&fits);
        assert_eq!(
            txt,
            "No group could be fitted.\n  (skipped 512) Insufficient data: need at least 2 points, got 0\n"
        );
    }

    #[test]
    fn truncate_marks_cut_labels() {
        assert_eq!(truncate("abcdef", 4), "abc.");
        assert_eq!(truncate("abc", 4), "abc");
    }
}
