//! History tree size figure.
//!
//! For each `NumberAttributes` group two series are overlaid:
//! - the full tree, fitted linearly in the record count (dashed line)
//! - the pruned tree ("Merkle Path"), fitted against `ln(records)`
//!
//! Both are shown on log-log axes.

use crate::domain::{FigureConfig, FigureKind, FitSpace, Value};
use crate::error::DataError;
use crate::figures::{load, Figure, Marker, SeriesStyle};
use crate::fit::{fit_groups, GroupFits, GroupSpec};

const GROUP_COLUMN: &str = "NumberAttributes";

pub fn history_tree(config: &FigureConfig) -> Result<Figure, DataError> {
    let full = load(&config.data_dir, "full_history_tree_size.csv")?;
    let pruned = load(&config.data_dir, "pruned_history_tree_size.csv")?;

    let spec = |space| GroupSpec {
        group_column: GROUP_COLUMN,
        groups: &config.groups,
        base_predicates: &[],
        x_column: "NumberRecords",
        y_column: "Size",
        space,
        degree: 1,
    };
    let full_fits = fit_groups(&full, &spec(FitSpace::Linear))?;
    let pruned_fits = fit_groups(&pruned, &spec(FitSpace::SemiLogX))?;

    let mut figure = Figure::new(
        FigureKind::HistoryTree,
        "History Tree Size",
        "Log of Number of Records",
        "Log of Size (in bytes)",
    )
    .log_log();

    for (color, group) in config.groups.iter().enumerate() {
        add_group(&mut figure, &full_fits, group, &format!("{group} Attributes, Full Tree"), Marker::Circle, color, true);
        add_group(&mut figure, &pruned_fits, group, &format!("{group} Attributes, Merkle Path"), Marker::Triangle, color, false);
    }
    Ok(figure)
}

fn add_group(
    figure: &mut Figure,
    fits: &GroupFits,
    group: &Value,
    label: &str,
    marker: Marker,
    color: usize,
    dashed: bool,
) {
    if let Some((_, err)) = fits.skipped.iter().find(|(g, _)| g == group) {
        figure.skip(label, err.clone());
        return;
    }
    let Some(fitted) = fits.fits.iter().find(|f| &f.group == group) else {
        return;
    };
    let series = fitted.series.clone().with_label(label);
    figure.add_fit_result(
        &series,
        Ok(fitted.fit.clone()),
        SeriesStyle {
            space: fitted.fit.space,
            marker,
            color,
            dashed,
            line_label: "",
        },
    );
}
