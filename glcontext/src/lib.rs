//! OpenGL / OpenGL ES context wrapping and capability probing.
//!
//! This crate sits between a native GL context and a rendering engine. It doesn’t create
//! windows nor native contexts by itself: a platform [`Backend`] does that (or wraps one
//! supplied by the application). What this crate provides is:
//!
//! - A [`Context`] handle, constructed through a [`BackendRegistry`] either around a native
//!   context ([`Context::new_wrapped`]) or from another context ([`Context::new_shared`]).
//! - A per-context [`FunctionTable`], resolving every known [`EntryPoint`] through the backend.
//!   Mandatory entry points must resolve; optional ones might be missing.
//! - Version probing for both the desktop and the embedded API families.
//! - A normalized set of [`Features`], evaluated from a static table of
//!   [`FeatureDescriptor`]s: version gate or extension gate, and function gate.
//! - Derived [`Settings`] (legacy texture formats, texture unit and compute limits).
//!
//! A typical session looks like:
//!
//! ```ignore
//! let mut registry = BackendRegistry::new();
//! glcontext_glfw::register(&mut registry);
//!
//! let mut ctx = Context::new_wrapped(&registry, display, window, handle, ContextOpt::default())?;
//! ctx.make_current(true)?;
//! ctx.load()?;
//!
//! if ctx.has_feature(Features::COMPUTE_SHADER) {
//!   // …
//! }
//! ```

pub mod backend;
pub mod context;
pub mod error;
pub mod feature;
pub mod function;
pub mod logging;
mod metagl;
pub mod platform;
pub mod settings;
pub mod version;

pub use crate::backend::{Backend, BackendFactory, BackendRegistry, NativePtr};
pub use crate::context::Context;
pub use crate::error::{BackendError, ContextError, GlError};
pub use crate::feature::{check_extension, FeatureDescriptor, Features, FEATURES};
pub use crate::function::{EntryPoint, FunctionTable, GlProc, Requirement};
pub use crate::logging::{init_logging, LoggingConfig};
pub use crate::metagl::{LUMINANCE, LUMINANCE_ALPHA};
pub use crate::platform::{Api, ContextOpt, Platform};
pub use crate::settings::Settings;
pub use crate::version::{parse_es_version, Version};
