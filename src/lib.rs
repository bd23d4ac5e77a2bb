pub mod api;
pub mod config;
pub mod filter;
pub mod loader;
pub mod model;
pub mod paginate;
pub mod progress;
pub mod section;
pub mod stats;

#[cfg(test)]
mod tests;

pub use api::Client;
pub use config::Config;
pub use filter::{FilterChange, FilterSpec, apply_filters};
pub use loader::{CancelFlag, Collection, Loader, PageFetcher};
pub use model::{Character, Episode, Location, PageEnvelope, Resource};
pub use paginate::{PageWindow, Paged, paginate};
pub use section::Section;
