use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use stroke_lens::{
    load_file, CategoricalField, DomainFacts, FilterEngine, FilterSpec, ViewOptions,
};

/// Load a dataset, apply the unrestricted filter and print the view as JSON.
///
/// Usage: `stroke-lens <data-file> [view-options.json]`
fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args_os().skip(1);
    let data_path: PathBuf = args
        .next()
        .map(PathBuf::from)
        .context("usage: stroke-lens <data-file> [view-options.json]")?;

    let options = match args.next() {
        Some(path) => {
            let path = PathBuf::from(path);
            ViewOptions::from_json_file(&path)
                .with_context(|| format!("loading view options from {}", path.display()))?
        }
        None => ViewOptions::default(),
    };

    let store = load_file(&data_path)
        .with_context(|| format!("loading dataset {}", data_path.display()))?;

    let spec = FilterSpec::unrestricted(&store);
    let view = FilterEngine::new(options)
        .apply(&spec, &store)
        .context("applying filter")?;
    log::info!("{} of {} records selected", view.len(), store.len());
    let marital_counts = view.count_table(CategoricalField::EverMarried);

    let categorical_domains: BTreeMap<&str, DomainFacts<'_>> = CategoricalField::ALL
        .iter()
        .map(|&f| (f.column(), store.domain(f)))
        .collect();
    let numeric_domains: BTreeMap<&str, DomainFacts<'_>> = store
        .numeric_columns()
        .into_iter()
        .map(|f| (f.column(), store.domain(f)))
        .collect();

    let output = serde_json::json!({
        "domains": {
            "categorical": categorical_domains,
            "numeric": numeric_domains,
        },
        "filter": spec,
        "row_count": view.len(),
        "statistics": view.statistics,
        "counts": view.counts,
        "marital_counts": marital_counts,
        "scatter": view.scatter,
        "correlation": view.correlation,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
