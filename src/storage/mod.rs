pub mod catalog;
pub mod loader;
pub mod source;
pub mod table;

pub use catalog::{EntityCatalog, PALETTE, palette_color};
pub use loader::{Dataset, load, load_from};
pub use source::{DataSource, FileSource, HttpSource, source_for};
pub use table::ObservationTable;
