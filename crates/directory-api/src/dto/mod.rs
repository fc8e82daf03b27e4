//! Query-string DTOs

pub mod geo_search;
pub mod name_search;

pub use geo_search::GeoSearchQuery;
pub use name_search::NameSearchQuery;
