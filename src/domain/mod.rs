//! Domain logic - pure values independent of git operations

pub mod commit;
pub mod prerelease;
pub mod tag;
pub mod version;

pub use commit::{ConventionalCommit, Footers};
pub use prerelease::PreReleaseOptions;
pub use tag::{Tag, VersionTag};
pub use version::{Version, VersionBump};
