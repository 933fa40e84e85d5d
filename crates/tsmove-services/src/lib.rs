pub mod services;

// Re-export commonly used types at crate root for convenience
pub use services::{
    discover, move_in_project, FileIdentity, FileSystem, IndexedReference, LocalFileSystem,
    MoveReport, MoveService, PackageRegistry, ProjectFiles, ReferenceIndex, ReferenceIndexer,
    RewriteOutcome, SourceExtensions, SpecifierResolver,
};
