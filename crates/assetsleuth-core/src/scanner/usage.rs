/// Usage scanner: finds which catalogued resources are referenced from
/// source code.
///
/// Files are processed one at a time in walk order. Within a file the
/// matching work fans out across a rayon pool: one task per still-pending
/// (resource, strategy) pair, each a literal substring search over the
/// file's mapped bytes. The scanner waits for the whole group, records the
/// hits in the [`Aggregator`], counts the file, emits one progress message
/// and only then releases the mapping.
///
/// Two fast paths keep I/O proportional to remaining work: files with no
/// searchable extension are never opened, and once every resource has been
/// found (or no pending pattern applies to a file type) files are skipped
/// without mapping them.
use crate::error::CleanerError;
use crate::model::{EntryKind, Resource, SearchUnusedResourcesConfig, SourceEntry, ASSET_DIR_GLOBS};
use crate::scanner::aggregator::Aggregator;
use crate::scanner::mapped::MappedFile;
use crate::scanner::progress::ScanProgress;
use crate::scanner::walker::SourceWalker;
use rayon::prelude::*;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Outcome of one usage scan.
#[derive(Debug, Default)]
pub struct UsageReport {
    /// Resources referenced at least once, with every file referencing them.
    pub used: HashMap<Resource, BTreeSet<SourceEntry>>,
    /// Resources never referenced.
    pub unused: HashSet<Resource>,
    /// Number of source files actually opened and searched.
    pub processed_files: u64,
}

/// Scan `source_root` for references to `resources`.
///
/// `progress` is called once per processed file with the running totals.
/// Fails only when `source_root` cannot be opened or the matching pool
/// cannot be created; individual directories and files that fail are
/// logged and skipped.
pub fn find_unused_resources(
    source_root: &Path,
    resources: &HashSet<Resource>,
    config: &SearchUnusedResourcesConfig,
    progress: &mut dyn FnMut(ScanProgress),
) -> Result<UsageReport, CleanerError> {
    let start = Instant::now();

    let excludes = config.excluded_paths.with(ASSET_DIR_GLOBS)?;
    debug!("*.imageset and *.xcassets added to excluded paths");
    let walker = SourceWalker::open(source_root, &excludes)?;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.effective_threads())
        .thread_name(|i| format!("assetsleuth-match-{i}"))
        .build()?;

    // Stable arena order so ids, and therefore logs, are reproducible.
    let mut catalog: Vec<Resource> = resources.iter().cloned().collect();
    catalog.sort();
    let aggregator = Aggregator::new(&catalog, &config.strategies);

    info!(
        "Searching {} for {} resources with strategies {:?}",
        source_root.display(),
        catalog.len(),
        config.strategies
    );

    for item in walker.entries() {
        let entry = match item {
            Ok(entry) => entry,
            Err(err) => {
                warn!("{err}");
                continue;
            }
        };
        let EntryKind::File(ext) = entry.kind else {
            continue;
        };

        let available = ext.available_strategies();
        if available.is_empty() {
            continue;
        }
        let tasks = aggregator.pending_tasks(available);
        if tasks.is_empty() {
            continue;
        }

        let mapped = match MappedFile::open(&entry.path) {
            Ok(mapped) => mapped,
            Err(err) => {
                warn!("{err}");
                continue;
            }
        };

        let bytes = mapped.as_bytes();
        let hits: Vec<_> = pool.install(|| {
            tasks
                .par_iter()
                .filter(|task| task.pattern.is_found_in(bytes))
                .map(|task| task.resource)
                .collect()
        });

        for id in hits {
            if aggregator.record_match(id, &entry) {
                debug!(
                    "{} has been found at {}",
                    catalog[id.idx()].name,
                    entry.name
                );
            }
        }

        let processed = aggregator.record_processed();
        progress(ScanProgress::FileProcessed {
            found: aggregator.found_count(),
            processed,
            current_file: entry.name.to_string(),
        });
        drop(mapped);
    }

    let processed_files = aggregator.processed_count();
    let (used_ids, unused_ids) = aggregator.into_partition();

    let mut report = UsageReport {
        used: HashMap::with_capacity(used_ids.len()),
        unused: HashSet::with_capacity(unused_ids.len()),
        processed_files,
    };
    for (id, files) in used_ids {
        report.used.insert(catalog[id.idx()].clone(), files);
    }
    for id in unused_ids {
        report.unused.insert(catalog[id.idx()].clone());
    }

    info!(
        "Usage scan complete: {} used, {} unused in {:?}",
        report.used.len(),
        report.unused.len(),
        start.elapsed()
    );
    Ok(report)
}
