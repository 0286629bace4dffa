//! Build lifecycle for prepress.
//!
//! The host build tool calls into this crate at two lifecycle points:
//!
//! - environment setup: [`BuildContext::discover_bundle`] (or
//!   [`BuildContext::discover_bundle_in_dir`] when only the output
//!   directory is known) records the content-hashed front-end bundle and
//!   the build timestamp;
//! - after the full site build: [`patch_bundle`] applies the dark-mode
//!   title fix to the recorded bundle.
//!
//! The context is an explicit value threaded between the two phases by
//! the host; the bundle path is set once during setup and read once at
//! patch time. Running the patch without a prior discovery pass is an
//! ordering defect and panics.

mod bundle;
mod context;

pub use bundle::{BundleError, patch_bundle, title_fix_applied};
pub use context::{BuildContext, SiteFile};
