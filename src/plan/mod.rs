//! Plan document loading, validation, and summarization.

mod document;
mod reader;
mod summary;

pub use document::{
    ChangeSpec, Configuration, PlanDocument, PlannedResource, PlannedValues, ProviderConfigEntry,
    ResourceChange, RootModule,
};
pub use reader::read_plan;
pub use summary::{ActionCounts, ChangeSummary, ResourceRow};
