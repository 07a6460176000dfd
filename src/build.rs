//! Build pipeline.
//!
//! A build stages every source file into the output directory (project
//! first, theme as fallback), warms the site data store, and on production
//! builds runs the asset revisioning pass over the staged output.

use crate::config::SiteConfig;
use crate::data::{DATA_DIR, DataStore};
use crate::log;
use crate::revv::Revisioner;
use crate::utils::fs::collect_files;
use crate::utils::path::to_slash;
use anyhow::{Context, Result};
use rayon::prelude::*;
use std::fs;
use std::path::Path;
use std::time::Instant;

pub fn build_site(config: &SiteConfig) -> Result<()> {
    let start = Instant::now();

    prepare_output(config)?;

    let data = DataStore::new(config.data_sources());
    data.warm_cache()?;
    log!("data"; "loaded {} top-level keys", data.get_all().len());

    let revisioner = Revisioner::new(&config.build.output, config.is_production());
    for (layer, source) in config.data_sources().iter().enumerate() {
        stage_source(config, &revisioner, source, layer > 0)?;
    }

    if config.revv.enable {
        revisioner.run()?;
    }

    log!("build"; "finished in {:.2?}", start.elapsed());
    Ok(())
}

/// Create the output directory, wiping it first when `clean` is set.
fn prepare_output(config: &SiteConfig) -> Result<()> {
    let output = &config.build.output;
    if config.build.clean && output.is_dir() {
        fs::remove_dir_all(output)
            .with_context(|| format!("Failed to clean output directory {}", output.display()))?;
    }
    fs::create_dir_all(output)
        .with_context(|| format!("Failed to create output directory {}", output.display()))?;
    Ok(())
}

/// Copy one source root into the output.
///
/// `_data/` stays out of the output (it feeds the data store, not the
/// published site). A fallback source never overwrites a file an earlier
/// layer already staged. Every staged non-HTML file registers with the
/// revisioner as a fingerprint candidate.
fn stage_source(
    config: &SiteConfig,
    revisioner: &Revisioner,
    source: &Path,
    fallback: bool,
) -> Result<()> {
    let files = collect_files(source);

    let staged = files
        .par_iter()
        .map(|path| {
            let rel = path.strip_prefix(source).unwrap_or(path);
            if rel.starts_with(DATA_DIR) {
                return Ok(false);
            }

            let rel = to_slash(rel);
            let target = config.output_path(&rel);
            if fallback && target.exists() {
                return Ok(false);
            }

            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            fs::copy(path, &target)
                .with_context(|| format!("Failed to stage {}", path.display()))?;

            if !path.extension().is_some_and(|ext| ext == "html") {
                revisioner.add(&rel);
            }
            Ok(true)
        })
        .collect::<Result<Vec<bool>>>()?;

    let count = staged.iter().filter(|staged| **staged).count();
    log!("build"; "staged {count} files from {}", source.display());
    Ok(())
}
