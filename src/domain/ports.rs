use crate::domain::model::{IconDeclaration, PackageDescriptor, Platform};
use crate::utils::error::Result;
use std::path::{Path, PathBuf};

/// Turns a package into a directory tree inside `workdir` and returns the tree's root.
pub trait Unpacker {
    fn unpack(&self, package: &Path, workdir: &Path) -> Result<PathBuf>;
}

pub trait IconPipeline {
    fn platform(&self) -> Platform;
    fn unpack(&self, package: &PackageDescriptor, workdir: &Path) -> Result<PathBuf>;
    /// `Ok(None)` when the package declares no icon at all.
    fn lookup(&self, root: &Path) -> Result<Option<IconDeclaration>>;
    fn resolve(&self, declaration: &IconDeclaration) -> Result<PathBuf>;
}
