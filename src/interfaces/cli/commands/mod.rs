mod config_gen;
mod seed;
mod summary;

pub use config_gen::config_generate;
pub use seed::{SeedDocument, seed_metrics};
pub use summary::show_summary;
