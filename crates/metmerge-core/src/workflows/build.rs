use super::tables::IdentifierTables;
use crate::core::identifiers::namespace::EntityKind;
use crate::core::identifiers::table::IdentifierTable;
use crate::core::io::feeds::{
    FeedError, FeedFormat, FeedManifest, FeedSpec, RecordParseError, read_feed,
};
use crate::engine::config::ResolutionConfig;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::resolution::{ResolutionBuilder, ResolutionStats};
use std::path::PathBuf;
use tracing::{info, instrument, warn};

/// What happened to one feed file of the manifest.
#[derive(Debug)]
pub struct FeedSummary {
    pub path: PathBuf,
    pub kind: EntityKind,
    pub format: FeedFormat,
    pub records: usize,
    /// Rows that could not be parsed and were skipped.
    pub rejected: Vec<RecordParseError>,
}

#[derive(Debug)]
pub struct BuildOutput {
    pub tables: IdentifierTables,
    pub metabolite_stats: ResolutionStats,
    pub reaction_stats: ResolutionStats,
    pub feeds: Vec<FeedSummary>,
    /// Feeds that could not be read at all. The build continues without them.
    pub failures: Vec<FeedError>,
}

impl BuildOutput {
    pub fn stats(&self, kind: EntityKind) -> &ResolutionStats {
        match kind {
            EntityKind::Metabolite => &self.metabolite_stats,
            EntityKind::Reaction => &self.reaction_stats,
        }
    }

    pub fn rejected_rows(&self) -> usize {
        self.feeds.iter().map(|feed| feed.rejected.len()).sum()
    }
}

/// Builds both identifier tables from the feeds listed in `manifest`.
///
/// Feeds are ingested in manifest order, metabolites first. A feed that cannot
/// be opened is recorded in [`BuildOutput::failures`] and skipped.
///
/// # Errors
///
/// Returns an [`EngineError`] only when the resolution state itself becomes
/// inconsistent.
#[instrument(skip_all, name = "build_workflow")]
pub fn build_identifier_tables(
    manifest: &FeedManifest,
    config: &ResolutionConfig,
    reporter: &ProgressReporter,
) -> Result<BuildOutput, EngineError> {
    info!(feeds = manifest.feeds.len(), "Building identifier tables.");
    let mut feeds = Vec::with_capacity(manifest.feeds.len());
    let mut failures = Vec::new();

    // === Phase 1: Metabolite identifiers ===
    let (metabolites, metabolite_stats) = reporter.phase("Resolving metabolites", || {
        resolve_kind(
            EntityKind::Metabolite,
            manifest,
            config,
            reporter,
            &mut feeds,
            &mut failures,
        )
    })?;

    // === Phase 2: Reaction identifiers ===
    let (reactions, reaction_stats) = reporter.phase("Resolving reactions", || {
        resolve_kind(
            EntityKind::Reaction,
            manifest,
            config,
            reporter,
            &mut feeds,
            &mut failures,
        )
    })?;

    info!(
        metabolites = metabolites.len(),
        reactions = reactions.len(),
        failed_feeds = failures.len(),
        "Identifier tables built."
    );

    Ok(BuildOutput {
        tables: IdentifierTables::new(metabolites, reactions),
        metabolite_stats,
        reaction_stats,
        feeds,
        failures,
    })
}

fn resolve_kind(
    kind: EntityKind,
    manifest: &FeedManifest,
    config: &ResolutionConfig,
    reporter: &ProgressReporter,
    summaries: &mut Vec<FeedSummary>,
    failures: &mut Vec<FeedError>,
) -> Result<(IdentifierTable, ResolutionStats), EngineError> {
    let specs: Vec<&FeedSpec> = manifest.feeds_of(kind).collect();
    let mut builder = ResolutionBuilder::new(kind, config.clone());

    reporter.report(Progress::TaskStart {
        total_steps: specs.len() as u64,
    });
    for spec in specs {
        match read_feed(&spec.path, spec.format) {
            Ok(contents) => {
                for record in &contents.records {
                    builder.ingest_record(record)?;
                }
                info!(
                    path = %spec.path.display(),
                    format = %spec.format,
                    records = contents.records.len(),
                    rejected = contents.rejected.len(),
                    "Feed ingested."
                );
                summaries.push(FeedSummary {
                    path: spec.path.clone(),
                    kind,
                    format: spec.format,
                    records: contents.records.len(),
                    rejected: contents.rejected,
                });
            }
            Err(e) => {
                warn!(path = %spec.path.display(), error = %e, "Skipping unreadable feed.");
                reporter.report(Progress::Message(format!("Skipped feed: {}", e)));
                failures.push(e);
            }
        }
        reporter.report(Progress::TaskIncrement);
    }
    reporter.report(Progress::TaskFinish);

    let (table, stats) = builder.finalize_namespace();
    info!(
        %kind,
        canonical_ids = table.len(),
        identifiers = table.index_len(),
        merges = stats.merges,
        declined_merges = stats.declined_merges,
        dropped_claims = stats.dropped_claims,
        "Namespace finalized."
    );
    Ok((table, stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    fn write_manifest(dir: &Path) -> FeedManifest {
        fs::write(
            dir.join("compounds.tsv"),
            "id\tnames\tmass\tinchikey\n\
             kegg:C00031\tD-Glucose\t180.06\tWQZGKKKJIJFFOK-GASJEMHNSA-N\n\
             chebi:4167\tglucose\t180.06\tWQZGKKKJIJFFOK-GASJEMHNSA-N\n\
             metanetx:MNXM3\tATP\t507.18\tZKHQWZAMYRWXGA-KQYNXXCUSA-N\n",
        )
        .unwrap();
        fs::write(
            dir.join("compound-links.tsv"),
            "source\tother\nkegg:C00031\tchebi:4167\nmetanetx:MNXM3\tchebi:4167\n",
        )
        .unwrap();
        fs::write(
            dir.join("reactions.tsv"),
            "id\tco-ids\nbigg:PGI\tmetanetx:MNXR102535\n",
        )
        .unwrap();
        fs::write(
            dir.join("feeds.toml"),
            r#"
            [[feed]]
            kind = "metabolite"
            format = "records"
            path = "compounds.tsv"

            [[feed]]
            kind = "metabolite"
            format = "cross-references"
            path = "compound-links.tsv"

            [[feed]]
            kind = "metabolite"
            format = "records"
            path = "missing.tsv"

            [[feed]]
            kind = "reaction"
            format = "records"
            path = "reactions.tsv"
            "#,
        )
        .unwrap();
        FeedManifest::load(&dir.join("feeds.toml")).unwrap()
    }

    #[test]
    fn build_resolves_corroborated_links_and_skips_unreadable_feeds() {
        let dir = tempdir().unwrap();
        let manifest = write_manifest(dir.path());

        let output = build_identifier_tables(
            &manifest,
            &ResolutionConfig::default(),
            &ProgressReporter::new(),
        )
        .unwrap();

        let metabolites = &output.tables.metabolites;
        let glucose = metabolites.lookup("C00031").unwrap();
        assert_eq!(metabolites.lookup("4167"), Some(glucose));
        assert_ne!(metabolites.lookup("MNXM3"), Some(glucose));
        assert_eq!(output.metabolite_stats.merges, 1);
        assert_eq!(output.metabolite_stats.declined_merges, 1);

        let reactions = &output.tables.reactions;
        assert_eq!(reactions.lookup("PGI"), reactions.lookup("MNXR102535"));
        assert!(reactions.lookup("PGI").is_some());

        assert_eq!(output.failures.len(), 1);
        assert_eq!(output.feeds.len(), 3);
        assert_eq!(output.rejected_rows(), 0);
    }

    #[test]
    fn build_reports_phases_in_order() {
        use std::sync::{Arc, Mutex};

        let dir = tempdir().unwrap();
        let manifest = write_manifest(dir.path());
        let phases = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&phases);
        let reporter = ProgressReporter::with_callback(Box::new(move |event| {
            if let Progress::PhaseStart { name } = event {
                sink.lock().unwrap().push(name);
            }
        }));

        build_identifier_tables(&manifest, &ResolutionConfig::default(), &reporter).unwrap();
        assert_eq!(
            *phases.lock().unwrap(),
            vec!["Resolving metabolites", "Resolving reactions"]
        );
    }
}
