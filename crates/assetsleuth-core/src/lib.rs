/// AssetSleuth Core: asset catalog, usage scanning and removal.
///
/// This crate contains all business logic with zero UI dependencies.
/// It is designed to be reusable across different frontends (CLI, TUI, IDE
/// plugins).
///
/// # Modules
///
/// - [`model`]: Classified filesystem entries, resources and scan configuration.
/// - [`strategy`]: Search strategies and the per-resource pattern generator.
/// - [`scanner`]: Directory walker, catalog builder, usage scanner and aggregator.
/// - [`cleaner`]: The `ProjectCleaner` state machine and resource removal.
/// - [`report`]: JSON / CSV export of an analysis.
/// - [`error`]: Error types.
pub mod cleaner;
pub mod error;
pub mod model;
pub mod report;
pub mod scanner;
pub mod strategy;

pub use cleaner::{CleanerState, ProjectCleaner, RemovalSummary};
pub use error::CleanerError;
pub use model::{Resource, SearchUnusedResourcesConfig, SourceEntry};
pub use strategy::SearchStrategy;
