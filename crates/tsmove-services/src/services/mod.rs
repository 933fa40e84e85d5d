//! Services for coordinating file moves

pub mod discovery;
pub mod filesystem;
pub mod move_service;
pub mod reference_updater;
pub mod resolution;

pub use discovery::{discover, ProjectFiles};
pub use filesystem::{FileSystem, LocalFileSystem};
pub use move_service::{move_in_project, MoveReport, MoveService};
pub use reference_updater::{
    edit_engine, IndexedReference, ReferenceIndex, ReferenceIndexer, RewriteOutcome,
};
pub use resolution::{FileIdentity, PackageRegistry, SourceExtensions, SpecifierResolver};
