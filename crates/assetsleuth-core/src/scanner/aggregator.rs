/// The aggregator: sole owner of mutable scan state.
///
/// Matching tasks never touch this state. They return results, and the
/// scanner funnels every mutation through the two serialized operations
/// here: [`Aggregator::record_match`] and [`Aggregator::record_processed`].
///
/// Invariants, held under the lock at all times:
/// - `unused` and the keys of `used` are disjoint and together cover the
///   whole catalog;
/// - `pending` has exactly the keys of `unused`;
/// - a resource leaves `unused` at most once and never comes back.
use crate::model::{Resource, ResourceId, SourceEntry};
use crate::strategy::{Pattern, SearchStrategy};
use parking_lot::Mutex;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

/// One unit of matching work: search `pattern` for `resource`.
#[derive(Clone, Debug)]
pub struct SearchTask {
    pub resource: ResourceId,
    pub strategy: SearchStrategy,
    pub pattern: Arc<Pattern>,
}

type PatternTable = HashMap<SearchStrategy, Arc<Pattern>>;

struct ScanState {
    unused: HashSet<ResourceId>,
    used: HashMap<ResourceId, BTreeSet<SourceEntry>>,
    pending: HashMap<ResourceId, PatternTable>,
    processed: u64,
}

pub struct Aggregator {
    state: Mutex<ScanState>,
}

impl Aggregator {
    /// Start a scan over `catalog` (indexed by position).
    ///
    /// Patterns for every active strategy are generated here, once per
    /// resource, and reused for the whole source tree.
    pub fn new(catalog: &[Resource], strategies: &BTreeSet<SearchStrategy>) -> Self {
        let mut unused = HashSet::with_capacity(catalog.len());
        let mut pending = HashMap::with_capacity(catalog.len());

        for (index, resource) in catalog.iter().enumerate() {
            let id = ResourceId::new(index);
            let table: PatternTable = strategies
                .iter()
                .map(|&strategy| {
                    (
                        strategy,
                        Arc::new(Pattern::for_resource(strategy, &resource.name)),
                    )
                })
                .collect();
            unused.insert(id);
            pending.insert(id, table);
        }

        Self {
            state: Mutex::new(ScanState {
                unused,
                used: HashMap::new(),
                pending,
                processed: 0,
            }),
        }
    }

    /// Matching work for one file: every still-pending resource's patterns
    /// whose strategy is in `available`.
    ///
    /// Strategies that were not configured have no pattern, so the result
    /// is already the intersection of configured and available.
    pub fn pending_tasks(&self, available: &[SearchStrategy]) -> Vec<SearchTask> {
        if available.is_empty() {
            return Vec::new();
        }
        let state = self.state.lock();
        let mut tasks = Vec::new();
        for (&resource, table) in &state.pending {
            for &strategy in available {
                if let Some(pattern) = table.get(&strategy) {
                    tasks.push(SearchTask {
                        resource,
                        strategy,
                        pattern: Arc::clone(pattern),
                    });
                }
            }
        }
        tasks
    }

    /// Record that `resource` is referenced from `file`.
    ///
    /// Idempotent: matching an already-found resource only extends its file
    /// set. Returns `true` if this call moved the resource out of `unused`.
    pub fn record_match(&self, resource: ResourceId, file: &SourceEntry) -> bool {
        let mut state = self.state.lock();
        let newly_found = state.unused.remove(&resource);
        state.pending.remove(&resource);
        state.used.entry(resource).or_default().insert(file.clone());
        newly_found
    }

    /// Count one fully processed file and return the new total.
    pub fn record_processed(&self) -> u64 {
        let mut state = self.state.lock();
        state.processed += 1;
        state.processed
    }

    /// Number of resources found so far.
    pub fn found_count(&self) -> usize {
        self.state.lock().used.len()
    }

    pub fn pending_count(&self) -> usize {
        self.state.lock().pending.len()
    }

    pub fn processed_count(&self) -> u64 {
        self.state.lock().processed
    }

    /// Consume the aggregator, yielding `(used, unused)` by id.
    pub fn into_partition(self) -> (HashMap<ResourceId, BTreeSet<SourceEntry>>, HashSet<ResourceId>) {
        let state = self.state.into_inner();
        (state.used, state.unused)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EntryKind, FileExtension};
    use compact_str::CompactString;
    use std::path::PathBuf;

    fn file(name: &str, ext: FileExtension) -> SourceEntry {
        SourceEntry {
            name: CompactString::new(name),
            path: PathBuf::from("/src").join(name),
            size_bytes: 4096,
            kind: EntryKind::File(ext),
        }
    }

    fn resource(name: &str) -> Resource {
        let container = SourceEntry {
            name: CompactString::new(format!("{name}.imageset")),
            path: PathBuf::from("/assets").join(format!("{name}.imageset")),
            size_bytes: 0,
            kind: EntryKind::File(FileExtension::AssetContainer),
        };
        Resource::from_container(&container, [file(&format!("{name}.png"), FileExtension::Png)].into())
            .unwrap()
    }

    fn all() -> BTreeSet<SearchStrategy> {
        SearchStrategy::ALL.into_iter().collect()
    }

    #[test]
    fn starts_with_everything_unused() {
        let catalog = vec![resource("a"), resource("b")];
        let agg = Aggregator::new(&catalog, &all());
        assert_eq!(agg.found_count(), 0);
        assert_eq!(agg.pending_count(), 2);
        let (used, unused) = agg.into_partition();
        assert!(used.is_empty());
        assert_eq!(unused.len(), 2);
    }

    #[test]
    fn match_is_idempotent() {
        let catalog = vec![resource("icon-home")];
        let agg = Aggregator::new(&catalog, &all());
        let view = file("View.swift", FileExtension::Swift);
        let id = ResourceId::new(0);

        assert!(agg.record_match(id, &view));
        assert!(!agg.record_match(id, &view));
        assert_eq!(agg.pending_count(), 0);

        let (used, unused) = agg.into_partition();
        assert!(unused.is_empty());
        assert_eq!(used[&id].len(), 1);
    }

    #[test]
    fn later_matches_extend_file_set() {
        let catalog = vec![resource("logo")];
        let agg = Aggregator::new(&catalog, &all());
        let id = ResourceId::new(0);
        agg.record_match(id, &file("A.swift", FileExtension::Swift));
        agg.record_match(id, &file("B.m", FileExtension::ObjcImpl));

        let (used, _) = agg.into_partition();
        assert_eq!(used[&id].len(), 2);
    }

    #[test]
    fn pending_tasks_respect_configured_and_available() {
        let catalog = vec![resource("a"), resource("b")];
        let configured: BTreeSet<_> = [SearchStrategy::QualifiedAccessor].into();
        let agg = Aggregator::new(&catalog, &configured);

        // Objective-C files only support the objc literal, which is off.
        assert!(agg.pending_tasks(&[SearchStrategy::ObjcLiteral]).is_empty());

        let swift = agg.pending_tasks(&[
            SearchStrategy::QualifiedAccessor,
            SearchStrategy::BareAccessor,
            SearchStrategy::NativeLiteral,
        ]);
        assert_eq!(swift.len(), 2);
        assert!(swift
            .iter()
            .all(|t| t.strategy == SearchStrategy::QualifiedAccessor));
    }

    #[test]
    fn found_resources_leave_pending_tasks() {
        let catalog = vec![resource("a"), resource("b")];
        let agg = Aggregator::new(&catalog, &all());
        agg.record_match(ResourceId::new(0), &file("A.m", FileExtension::ObjcImpl));

        let tasks = agg.pending_tasks(&[SearchStrategy::ObjcLiteral]);
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].resource, ResourceId::new(1));
    }

    #[test]
    fn processed_counter_increments() {
        let agg = Aggregator::new(&[], &all());
        assert_eq!(agg.record_processed(), 1);
        assert_eq!(agg.record_processed(), 2);
        assert_eq!(agg.processed_count(), 2);
    }

    /// Concurrent matches from many threads keep the partition intact.
    #[test]
    fn concurrent_matches_keep_partition() {
        let catalog: Vec<_> = (0..64).map(|i| resource(&format!("r{i}"))).collect();
        let agg = Aggregator::new(&catalog, &all());
        let view = file("View.swift", FileExtension::Swift);

        std::thread::scope(|s| {
            for t in 0..8 {
                let agg = &agg;
                let view = &view;
                s.spawn(move || {
                    for i in (t..64).step_by(2) {
                        agg.record_match(ResourceId::new(i), view);
                    }
                });
            }
        });

        let (used, unused) = agg.into_partition();
        assert_eq!(used.len(), 64);
        assert!(unused.is_empty());
    }
}
