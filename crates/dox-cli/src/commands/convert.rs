use anyhow::{Context, Result};
use dox_config::{Config, MaskingConfig};
use dox_core::ErrorPolicy;
use dox_engine::{Pipeline, PipelineOptions};
use dox_security::{PiiMasker, RedactionRule};
use dox_sources::{Denylist, ScanOptions};

use crate::cli::Cli;

pub fn handle(cli: Cli, config: &Config) -> Result<()> {
    let output = cli.out.unwrap_or_else(|| config.output.path.clone());
    let on_error = if cli.fail_fast {
        ErrorPolicy::Abort
    } else {
        config.errors.on_document_error
    };

    let options = PipelineOptions {
        scan: ScanOptions {
            extension: config.documents.extension.clone(),
            denylist: Denylist::new(config.documents.exclude.clone()),
            follow_links: config.documents.follow_links,
        },
        on_error,
    };
    let masker = build_masker(&config.masking)?;
    tracing::debug!(
        output = %output.display(),
        ?on_error,
        rules = masker.rules().len(),
        "resolved settings"
    );

    let summary = Pipeline::new(options)
        .with_masker(masker)
        .run(&cli.input, &output)
        .with_context(|| format!("Failed to convert {}", cli.input.display()))?;

    if !summary.skipped.is_empty() {
        eprintln!("  Skipped {} unreadable document(s):", summary.skipped.len());
        for skipped in &summary.skipped {
            eprintln!("    {}: {}", skipped.path.display(), skipped.reason);
        }
    }

    println!("Saved {} paras -> {}", summary.records, output.display());

    Ok(())
}

/// Built-in rules plus any configured extras
fn build_masker(masking: &MaskingConfig) -> Result<PiiMasker> {
    let extra = masking
        .extra_rules
        .iter()
        .map(|rule| RedactionRule::new(&rule.pattern, rule.token.clone()))
        .collect::<dox_core::Result<Vec<_>>>()?;

    Ok(PiiMasker::new().with_rules(extra))
}
