pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{ApktoolUnpacker, ArchiveUnpacker, PreparedTree};
pub use core::android::AndroidPipeline;
pub use core::engine::{fetch_android_icon, fetch_ios_icon, IconFetcher};
pub use core::ios::IosPipeline;
pub use domain::model::{FetchOutcome, PackageDescriptor, Platform, ResolverOptions};
pub use utils::error::{IconError, Result};
