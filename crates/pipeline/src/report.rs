//! Text report rendering
//!
//! Presentation-only: turns a finished `RunReport` into the legend,
//! confusion matrix, accuracy figures and area table a run prints. Nothing
//! here feeds back into the pipeline.

use crate::config::RunConfig;
use crate::run::RunReport;
use std::fmt::Write;

/// Render the full run summary as plain text.
pub fn render_report(report: &RunReport, config: &RunConfig) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Classification report");
    let _ = writeln!(out, "=====================");
    let _ = writeln!(
        out,
        "scenes: {}   samples: {} (train {}, test {})",
        report.scenes_used, report.samples, report.train_count, report.test_count
    );
    let _ = writeln!(out);

    let _ = writeln!(out, "Legend");
    for (id, class) in config.classes.iter().enumerate() {
        let _ = writeln!(out, "  {:>3}  {}  {}", id, class.color, class.name);
    }
    let _ = writeln!(out);

    render_confusion(&mut out, report, config);

    let _ = writeln!(out, "overall accuracy: {:.4}", report.accuracy);
    match report.kappa {
        Some(kappa) => {
            let _ = writeln!(out, "kappa:            {:.4}", kappa);
        }
        None => {
            let _ = writeln!(out, "kappa:            undefined");
        }
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "Area by class");
    for (id, km2) in report.areas.iter() {
        let name = config
            .classes
            .get(id as usize)
            .map(|c| c.name.as_str())
            .unwrap_or("?");
        let _ = writeln!(out, "  {:>3}  {:<16} {:>12.4} km2", id, name, km2);
    }
    let _ = writeln!(out, "  total {:>25.4} km2", report.areas.total_km2());
    let _ = writeln!(out);
    let _ = writeln!(out, "exported: {}", report.exported_path.display());

    out
}

/// Confusion matrix with actual classes as rows, predictions as columns,
/// plus per-class producer's and user's accuracy.
fn render_confusion(out: &mut String, report: &RunReport, config: &RunConfig) {
    let n = config.classes.len();

    let _ = writeln!(out, "Confusion matrix (rows actual, columns predicted)");
    let _ = write!(out, "  {:>12}", "");
    for id in 0..n {
        let _ = write!(out, " {:>8}", id);
    }
    let _ = writeln!(out, " {:>10}", "producer's");

    let producers = report.confusion.producers_accuracy();
    for (actual, class) in config.classes.iter().enumerate() {
        let _ = write!(out, "  {:>12}", truncate(&class.name, 12));
        for predicted in 0..n {
            let _ = write!(
                out,
                " {:>8}",
                report.confusion.count(actual as u8, predicted as u8)
            );
        }
        match producers.get(actual).copied().flatten() {
            Some(pa) => {
                let _ = writeln!(out, " {:>10.3}", pa);
            }
            None => {
                let _ = writeln!(out, " {:>10}", "-");
            }
        }
    }

    let users = report.confusion.users_accuracy();
    let _ = write!(out, "  {:>12}", "user's");
    for ua in users.iter().take(n) {
        match ua {
            Some(ua) => {
                let _ = write!(out, " {:>8.3}", ua);
            }
            None => {
                let _ = write!(out, " {:>8}", "-");
            }
        }
    }
    let _ = writeln!(out);
    let _ = writeln!(out);
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
