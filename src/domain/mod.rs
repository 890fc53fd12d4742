pub mod construction;
pub mod filter;
pub mod params;
pub mod status;

pub use construction::Construction;
pub use filter::{ConstructionFilter, DateRange, StatusFilter};
pub use params::{BrowseParams, Tab};
pub use status::Status;
