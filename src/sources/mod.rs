// Sources module for the upstream index and statistics clients

pub mod http;
pub mod pypi;
pub mod pypistats;
pub mod source_trait;
pub mod xmlrpc;

pub use pypi::PyPiIndex;
pub use pypistats::PyPiStats;
pub use source_trait::{Candidate, DownloadStats, PackageIndex, PackageMetadata};
