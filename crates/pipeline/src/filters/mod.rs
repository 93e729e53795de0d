//! Filter implementations for the personalized pipeline.

pub mod available;
pub mod excluded;

pub use available::AvailableFilter;
pub use excluded::ExcludeItemsFilter;
