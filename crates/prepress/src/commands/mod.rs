//! CLI command implementations.

pub(crate) mod patch;
pub(crate) mod process;

pub(crate) use patch::PatchArgs;
pub(crate) use process::ProcessArgs;
