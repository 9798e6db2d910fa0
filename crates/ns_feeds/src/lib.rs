pub mod aggregate;
pub mod cli;
pub mod logging;
pub mod manager;
pub mod pipeline;
pub mod sources;

pub use aggregate::summarize;
pub use cli::{handle_command, HumanDuration, ScanArgs, ScanCommands};
pub use manager::ScanManager;
pub use pipeline::ScanPipeline;
pub use sources::GoogleNewsSource;

pub mod prelude {
    pub use super::{ScanManager, ScanPipeline};
    pub use ns_core::{Error, FeedSource, RawEntry, Result, SearchTerm};
}
