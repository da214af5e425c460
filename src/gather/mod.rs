pub mod params;
pub mod urls;

pub use params::extract_parameters;
pub use urls::{extract_all_urls, scan_urls, UrlHits};
