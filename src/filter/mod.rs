pub mod validity;

pub use validity::is_valid;
