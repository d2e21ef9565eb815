//! `sweep-n` and `sweep-split`.

use crate::data::load_records;
use crate::error::Result;
use crate::output::{print_matrix, save_results, OutputFormat, ResultGrid};
use colored::Colorize;
use reident::config::SimParams;
use reident::dataset::HoldoutPartitioner;
use reident::monte_carlo::AccuracyMatrix;
use std::path::Path;
use tracing::info;

/// Accuracy against pool size `1..=n_max` on the holdout split
/// `(split.p, split.q)`.
pub(crate) fn run_pool_size(
    data: &Path,
    params: &SimParams,
    format: OutputFormat,
    output: Option<&Path>,
) -> Result<()> {
    let records = load_records(data)?;
    let population = records.split(params.split.p, params.split.q)?;
    info!(
        users = population.len(),
        n_max = params.n_max,
        n_iters = params.n_iters,
        "starting pool size sweep"
    );

    let matrix = params.controller().sweep_pool_size(
        &population,
        params.n_max,
        &params.classifiers,
        &mut params.rng(),
    )?;
    finish(&matrix, params, format, output)
}

/// Accuracy against the swept split fraction at pool size `n_candidates`.
pub(crate) fn run_split(
    data: &Path,
    params: &SimParams,
    format: OutputFormat,
    output: Option<&Path>,
) -> Result<()> {
    let records = load_records(data)?;
    let partitioner = HoldoutPartitioner::new(&records, params.split.scope, params.split.q);
    info!(
        users = records.len(),
        scope = %params.split.scope,
        n = params.n_candidates,
        "starting split sweep"
    );

    let matrix = params.controller().sweep_split_fraction(
        &partitioner,
        &params.split.range()?,
        params.split.parameter(),
        params.n_candidates,
        &params.classifiers,
        &mut params.rng(),
    )?;
    finish(&matrix, params, format, output)
}

fn finish(
    matrix: &AccuracyMatrix,
    params: &SimParams,
    format: OutputFormat,
    output: Option<&Path>,
) -> Result<()> {
    print_matrix(matrix, format)?;
    if let Some(dir) = output {
        save_results(dir, &ResultGrid::from(matrix), params)?;
        if format == OutputFormat::Table {
            println!("{} {}", "Saved to".green(), dir.display());
        }
    }
    Ok(())
}
