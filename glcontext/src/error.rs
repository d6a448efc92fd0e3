//! Errors.
//!
//! Every fallible operation of this crate reports through [`ContextError`]. Construction errors
//! never leak a partially built [`Context`](crate::Context): the handle is torn down before the
//! error is returned. Probing errors leave the handle unloaded, so that the caller can decide
//! whether to destroy it or to retry with another API family.

use std::fmt;

use thiserror::Error;

use crate::metagl::*;
use crate::platform::Api;

/// An error that might happen while creating, loading or using a context.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ContextError {
  /// The platform identifier is out of range, cannot be resolved for the current target or has
  /// no registered backend.
  #[error("invalid platform: {0}")]
  InvalidPlatform(String),

  /// The backend could not allocate its private state.
  #[error("could not allocate the backend state of the context")]
  AllocationError,

  /// The backend `init` or `create` operation failed.
  #[error("backend initialization failed: {0}")]
  BackendInitFailed(#[source] BackendError),

  /// The backend could not make the context current (or release it).
  #[error("could not change the current context: {0}")]
  MakeCurrentFailed(#[source] BackendError),

  /// A mandatory entry point could not be resolved.
  #[error("could not find core function: {0}")]
  MissingCoreFunction(&'static str),

  /// The version reported by the driver could not be read or interpreted.
  #[error("could not query the OpenGL version: {0}")]
  VersionQueryFailed(String),

  /// The driver is older than the minimum supported version.
  #[error("unsupported {api} version {major}.{minor}")]
  UnsupportedVersion {
    /// API family of the context.
    api: Api,
    /// Reported major version.
    major: i32,
    /// Reported minor version.
    minor: i32,
  },

  /// The driver reported a runtime error.
  #[error("GL error: {0}")]
  GlRuntimeError(GlError),
}

/// An error reported by a [`Backend`](crate::Backend) implementation.
#[derive(Debug, Error)]
#[error("{reason}")]
pub struct BackendError {
  reason: String,
}

impl BackendError {
  /// Create a backend error out of a human-readable reason.
  pub fn new(reason: impl Into<String>) -> Self {
    BackendError {
      reason: reason.into(),
    }
  }

  /// The reason of the failure.
  pub fn reason(&self) -> &str {
    &self.reason
  }
}

/// A runtime error code reported by `glGetError`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct GlError(GLenum);

impl GlError {
  /// Wrap a raw error code.
  ///
  /// Returns [`None`] for `GL_NO_ERROR`.
  pub fn from_code(code: GLenum) -> Option<Self> {
    if code == gl::NO_ERROR {
      None
    } else {
      Some(GlError(code))
    }
  }

  /// The raw error code.
  pub fn code(self) -> GLenum {
    self.0
  }

  /// Symbolic name of the error, if it is one of the well-known codes.
  pub fn name(self) -> Option<&'static str> {
    match self.0 {
      gl::INVALID_ENUM => Some("GL_INVALID_ENUM"),
      gl::INVALID_VALUE => Some("GL_INVALID_VALUE"),
      gl::INVALID_OPERATION => Some("GL_INVALID_OPERATION"),
      gl::INVALID_FRAMEBUFFER_OPERATION => Some("GL_INVALID_FRAMEBUFFER_OPERATION"),
      gl::OUT_OF_MEMORY => Some("GL_OUT_OF_MEMORY"),
      _ => None,
    }
  }
}

impl fmt::Display for GlError {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self.name() {
      Some(name) => f.write_str(name),
      None => write!(f, "{:04x}", self.0),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn no_error_is_not_an_error() {
    assert_eq!(GlError::from_code(gl::NO_ERROR), None);
  }

  #[test]
  fn well_known_codes_are_named() {
    let names = [
      (gl::INVALID_ENUM, "GL_INVALID_ENUM"),
      (gl::INVALID_VALUE, "GL_INVALID_VALUE"),
      (gl::INVALID_OPERATION, "GL_INVALID_OPERATION"),
      (
        gl::INVALID_FRAMEBUFFER_OPERATION,
        "GL_INVALID_FRAMEBUFFER_OPERATION",
      ),
      (gl::OUT_OF_MEMORY, "GL_OUT_OF_MEMORY"),
    ];

    for (code, name) in names {
      let e = GlError::from_code(code).unwrap();
      assert_eq!(e.name(), Some(name));
      assert_eq!(e.to_string(), name);
    }
  }

  #[test]
  fn unknown_codes_display_as_hex() {
    let e = GlError::from_code(0x503).unwrap();
    assert_eq!(e.name(), None);
    assert_eq!(e.to_string(), "0503");
    assert_eq!(e.code(), 0x503);
  }

  #[test]
  fn runtime_error_message() {
    let e = ContextError::GlRuntimeError(GlError::from_code(gl::OUT_OF_MEMORY).unwrap());
    assert_eq!(e.to_string(), "GL error: GL_OUT_OF_MEMORY");
  }
}
