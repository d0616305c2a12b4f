pub mod android;
pub mod engine;
pub mod ios;
pub mod pattern;

pub use crate::domain::model::{FetchOutcome, IconDeclaration, LogicalIconRef, PackageDescriptor, Platform};
pub use crate::domain::ports::{IconPipeline, Unpacker};
pub use crate::utils::error::Result;
