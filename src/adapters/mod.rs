// Adapters layer: concrete implementations for external systems (unpacking, document parsing).

pub mod manifest;
pub mod plist_data;
pub mod unpack;

pub use manifest::{ManifestDocument, ManifestElement};
pub use plist_data::{PlistData, PlistMap};
pub use unpack::{ApktoolUnpacker, ArchiveUnpacker, PreparedTree};
