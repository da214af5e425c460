pub mod json_urls;
