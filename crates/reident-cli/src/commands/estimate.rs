//! `estimate`: one accuracy per classifier at a fixed pool size.

use crate::data::load_records;
use crate::error::Result;
use crate::output::{print_estimates, save_results, EstimateRow, OutputFormat, ResultGrid};
use reident::config::SimParams;
use reident::ClassifierFactory;
use std::path::Path;

pub(crate) fn run(
    data: &Path,
    params: &SimParams,
    format: OutputFormat,
    output: Option<&Path>,
) -> Result<()> {
    let records = load_records(data)?;
    let population = records.split(params.split.p, params.split.q)?;
    let estimator = params.estimator();
    let mut rng = params.rng();

    let rows = params
        .classifiers
        .iter()
        .map(|config| -> Result<EstimateRow> {
            let estimate = estimator.estimate(&population, params.n_candidates, config, &mut rng)?;
            Ok(EstimateRow {
                classifier: config.name(),
                estimate,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    print_estimates(&rows, format)?;
    if let Some(dir) = output {
        save_results(dir, &ResultGrid::from(rows.as_slice()), params)?;
    }
    Ok(())
}
