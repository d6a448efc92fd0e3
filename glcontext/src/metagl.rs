//! OpenGL module provider.
//!
//! This module provides the OpenGL types and enumerants that are used to implement the rest of
//! this crate. Function pointers are *not* taken from here: every context owns its own
//! [`FunctionTable`](crate::function::FunctionTable).

mod meta {
  pub(crate) use gl;
  pub(crate) use gl::types::*;
}

pub(crate) use self::meta::*;

/// Legacy single-channel texture format, removed from core profiles.
pub const LUMINANCE: GLenum = 0x1909;

/// Legacy dual-channel texture format, removed from core profiles.
pub const LUMINANCE_ALPHA: GLenum = 0x190A;
