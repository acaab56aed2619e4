/// Scan progress reporting: lightweight messages sent from the analysis
/// thread to the frontend via a crossbeam channel (or straight to a
/// callback when the scanner is driven synchronously).
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanProgress {
    /// The asset catalog has been built.
    Catalogued { resources: usize },
    /// One source file has been fully matched and recorded.
    ///
    /// `found` is read after this file's matches are recorded, so it is
    /// always consistent with the aggregator at that point.
    FileProcessed {
        found: usize,
        processed: u64,
        current_file: String,
    },
    /// The usage scan finished.
    Complete { duration: Duration },
}
