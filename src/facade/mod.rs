pub mod dashboard;

pub use dashboard::{CatalogEntry, CatalogView, CodeColor, Dashboard};
