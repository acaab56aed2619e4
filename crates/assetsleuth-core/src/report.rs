/// Exportable analysis report (JSON and CSV).
///
/// The report is a flat, sorted snapshot of an [`AnalysisOutcome`] so the
/// output is stable between runs over the same tree.
use crate::error::ReportError;
use crate::model::Resource;
use crate::scanner::AnalysisOutcome;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Count and byte total for one group of resources.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub count: usize,
    pub bytes: u64,
}

impl Totals {
    fn of<'a>(resources: impl Iterator<Item = &'a Resource>) -> Self {
        resources.fold(Self::default(), |acc, r| Self {
            count: acc.count + 1,
            bytes: acc.bytes + r.size,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UsedEntry {
    pub name: String,
    pub path: PathBuf,
    pub size: u64,
    pub found_in: Vec<PathBuf>,
}

/// One row of the CSV export.
#[derive(Debug, Clone, Serialize)]
pub struct UnusedEntry {
    pub name: String,
    pub path: PathBuf,
    pub size: u64,
    pub image_count: usize,
}

impl From<&Resource> for UnusedEntry {
    fn from(r: &Resource) -> Self {
        Self {
            name: r.name.to_string(),
            path: r.path.clone(),
            size: r.size,
            image_count: r.image_files.len(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub generated_at: DateTime<Local>,
    pub elapsed_ms: u64,
    pub total: Totals,
    pub used: Totals,
    pub unused: Totals,
    pub used_resources: Vec<UsedEntry>,
    pub unused_resources: Vec<UnusedEntry>,
}

impl AnalysisReport {
    pub fn from_outcome(outcome: &AnalysisOutcome) -> Self {
        let mut used_resources: Vec<UsedEntry> = outcome
            .used
            .iter()
            .map(|(r, files)| UsedEntry {
                name: r.name.to_string(),
                path: r.path.clone(),
                size: r.size,
                found_in: files.iter().map(|f| f.path.clone()).collect(),
            })
            .collect();
        used_resources.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.path.cmp(&b.path)));

        let mut unused_resources: Vec<UnusedEntry> =
            outcome.unused.iter().map(UnusedEntry::from).collect();
        unused_resources.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.path.cmp(&b.path)));

        Self {
            generated_at: Local::now(),
            elapsed_ms: u64::try_from(outcome.elapsed.as_millis()).unwrap_or(u64::MAX),
            total: Totals::of(outcome.catalog.iter()),
            used: Totals::of(outcome.used.keys()),
            unused: Totals::of(outcome.unused.iter()),
            used_resources,
            unused_resources,
        }
    }

    /// Pretty-printed JSON of the whole report.
    pub fn write_json(&self, path: &Path) -> Result<(), ReportError> {
        let mut writer = BufWriter::new(create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush().map_err(|source| ReportError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// CSV of the unused resources, one row each, with a header.
    pub fn write_csv(&self, path: &Path) -> Result<(), ReportError> {
        let mut writer = csv::Writer::from_writer(create(path)?);
        for row in &self.unused_resources {
            writer.serialize(row)?;
        }
        writer.flush().map_err(|source| ReportError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn create(path: &Path) -> Result<File, ReportError> {
    File::create(path).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EntryKind, FileExtension, SourceEntry};
    use compact_str::CompactString;
    use std::collections::{BTreeSet, HashMap, HashSet};
    use std::time::Duration;
    use tempfile::TempDir;

    fn entry(name: &str, size: u64, kind: EntryKind) -> SourceEntry {
        SourceEntry {
            name: CompactString::new(name),
            path: PathBuf::from("/p").join(name),
            size_bytes: size,
            kind,
        }
    }

    fn resource(name: &str, size: u64) -> Resource {
        let container = entry(
            &format!("{name}.imageset"),
            0,
            EntryKind::File(FileExtension::AssetContainer),
        );
        Resource::from_container(
            &container,
            [entry(&format!("{name}.png"), size, EntryKind::File(FileExtension::Png))].into(),
        )
        .unwrap()
    }

    fn outcome() -> AnalysisOutcome {
        let used_res = resource("logo", 100);
        let unused_a = resource("zeta", 10);
        let unused_b = resource("alpha", 20);
        let catalog: HashSet<_> = [used_res.clone(), unused_a.clone(), unused_b.clone()].into();
        let mut used = HashMap::new();
        used.insert(
            used_res,
            BTreeSet::from([entry("Home.swift", 1, EntryKind::File(FileExtension::Swift))]),
        );
        AnalysisOutcome {
            catalog,
            used,
            unused: [unused_a, unused_b].into(),
            processed_files: 1,
            elapsed: Duration::from_millis(42),
        }
    }

    #[test]
    fn totals_split_by_group() {
        let report = AnalysisReport::from_outcome(&outcome());
        assert_eq!(report.total, Totals { count: 3, bytes: 130 });
        assert_eq!(report.used, Totals { count: 1, bytes: 100 });
        assert_eq!(report.unused, Totals { count: 2, bytes: 30 });
        assert_eq!(report.elapsed_ms, 42);
    }

    #[test]
    fn rows_are_sorted_by_name() {
        let report = AnalysisReport::from_outcome(&outcome());
        let names: Vec<_> = report.unused_resources.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
        assert_eq!(report.used_resources[0].found_in, vec![PathBuf::from("/p/Home.swift")]);
    }

    #[test]
    fn json_and_csv_are_written() {
        let tmp = TempDir::new().unwrap();
        let report = AnalysisReport::from_outcome(&outcome());

        let json_path = tmp.path().join("report.json");
        report.write_json(&json_path).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
        assert_eq!(value["unused"]["count"], 2);
        assert_eq!(value["used_resources"][0]["name"], "logo");

        let csv_path = tmp.path().join("unused.csv");
        report.write_csv(&csv_path).unwrap();
        let csv = std::fs::read_to_string(&csv_path).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("name,path,size,image_count"));
        assert_eq!(lines.next(), Some("alpha,/p/alpha.imageset,20,1"));
        assert_eq!(lines.count(), 1);
    }

    #[test]
    fn unwritable_path_is_reported() {
        let tmp = TempDir::new().unwrap();
        let report = AnalysisReport::from_outcome(&outcome());
        let err = report
            .write_json(&tmp.path().join("missing/dir/report.json"))
            .unwrap_err();
        assert!(matches!(err, ReportError::Io { .. }));
    }
}
