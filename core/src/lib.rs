#![cfg_attr(all(not(feature = "std"), not(test)), no_std)]

extern crate alloc;

// Re-export for convenience so other modules don't need alloc:: prefix
#[allow(unused_imports)]
pub(crate) use alloc::{boxed::Box, format, string::String, string::ToString, vec, vec::Vec};

pub mod assumption;
pub mod descriptor;
pub mod environment;
pub mod errors;
pub mod guards;
pub mod host;
pub mod options;
pub mod stdlib;
pub mod tree;
pub mod values;

pub use assumption::{Assumption, AssumptionId, AssumptionSource};
pub use descriptor::{Candidate, CandidateIndex, Descriptor, DescriptorBuilder};
pub use environment::{Environment, EnvironmentBuilder};
pub use errors::{BuildError, ExecutionError, RuntimeError};
pub use host::{Host, NoopHost, Rewrite, RewriteCause};
pub use options::TreeOptions;
pub use tree::{Dispatch, Frame, Generality, NodeId, Tag, Tree, TreeBuilder, Unexpected};
pub use values::{EcoString, Kind, KindSet, Typed, Value};
