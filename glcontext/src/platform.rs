//! Platform and API family selection.

use std::convert::TryFrom;
use std::fmt;

use crate::error::ContextError;

/// Native windowing / context platform.
///
/// [`Platform::Auto`] is resolved at construction time to the default platform of the target
/// operating system.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Platform {
  /// Pick the default platform of the target operating system.
  Auto,
  /// X11 / GLX.
  Glx,
  /// EGL.
  Egl,
  /// macOS CGL.
  Cgl,
  /// iOS EAGL.
  Eagl,
  /// Windows WGL.
  Wgl,
}

impl Platform {
  /// Number of concrete (non-automatic) platforms.
  pub const COUNT: usize = 5;

  /// Resolve [`Platform::Auto`] to the default platform of the target operating system.
  ///
  /// Concrete platforms resolve to themselves.
  pub fn resolve(self) -> Result<Self, ContextError> {
    match self {
      Platform::Auto => Self::target_default().ok_or_else(|| {
        ContextError::InvalidPlatform("cannot determine which GL platform to use".to_owned())
      }),
      platform => Ok(platform),
    }
  }

  /// Default platform of the target operating system, if any.
  pub fn target_default() -> Option<Self> {
    if cfg!(target_os = "linux") {
      Some(Platform::Glx)
    } else if cfg!(target_os = "ios") {
      Some(Platform::Eagl)
    } else if cfg!(target_os = "macos") {
      Some(Platform::Cgl)
    } else if cfg!(target_os = "android") {
      Some(Platform::Egl)
    } else if cfg!(target_os = "windows") {
      Some(Platform::Wgl)
    } else {
      None
    }
  }

  /// Slot of a concrete platform in a platform-indexed table.
  pub(crate) fn index(self) -> Option<usize> {
    match self {
      Platform::Auto => None,
      Platform::Glx => Some(0),
      Platform::Egl => Some(1),
      Platform::Cgl => Some(2),
      Platform::Eagl => Some(3),
      Platform::Wgl => Some(4),
    }
  }
}

impl TryFrom<i32> for Platform {
  type Error = ContextError;

  fn try_from(id: i32) -> Result<Self, Self::Error> {
    match id {
      0 => Ok(Platform::Auto),
      1 => Ok(Platform::Glx),
      2 => Ok(Platform::Egl),
      3 => Ok(Platform::Cgl),
      4 => Ok(Platform::Eagl),
      5 => Ok(Platform::Wgl),
      _ => Err(ContextError::InvalidPlatform(format!(
        "unknown platform identifier {}",
        id
      ))),
    }
  }
}

impl fmt::Display for Platform {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self {
      Platform::Auto => f.write_str("auto"),
      Platform::Glx => f.write_str("GLX"),
      Platform::Egl => f.write_str("EGL"),
      Platform::Cgl => f.write_str("CGL"),
      Platform::Eagl => f.write_str("EAGL"),
      Platform::Wgl => f.write_str("WGL"),
    }
  }
}

/// API family.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Api {
  /// Pick the default family of the target operating system.
  Auto,
  /// Desktop OpenGL (3.0 and later).
  OpenGL,
  /// OpenGL ES (2.0 and later).
  OpenGLES,
}

impl Api {
  /// Resolve [`Api::Auto`]: OpenGL ES on mobile targets, desktop OpenGL everywhere else.
  pub fn resolve(self) -> Self {
    match self {
      Api::Auto if cfg!(any(target_os = "ios", target_os = "android")) => Api::OpenGLES,
      Api::Auto => Api::OpenGL,
      api => api,
    }
  }

  /// Whether this is the embedded family.
  pub fn is_es(self) -> bool {
    self == Api::OpenGLES
  }
}

impl TryFrom<i32> for Api {
  type Error = ContextError;

  fn try_from(id: i32) -> Result<Self, Self::Error> {
    match id {
      0 => Ok(Api::Auto),
      1 => Ok(Api::OpenGL),
      2 => Ok(Api::OpenGLES),
      _ => Err(ContextError::InvalidPlatform(format!(
        "unknown API identifier {}",
        id
      ))),
    }
  }
}

impl fmt::Display for Api {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self {
      Api::Auto => f.write_str("auto"),
      Api::OpenGL => f.write_str("OpenGL"),
      Api::OpenGLES => f.write_str("OpenGL ES"),
    }
  }
}

/// Context creation options.
///
/// Feel free to look at the different methods available to tweak the options. You may want to
/// start with `default()` though.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ContextOpt {
  platform: Platform,
  api: Api,
}

impl Default for ContextOpt {
  /// Defaults:
  ///
  /// - `platform` set to `Platform::Auto`.
  /// - `api` set to `Api::Auto`.
  fn default() -> Self {
    ContextOpt {
      platform: Platform::Auto,
      api: Api::Auto,
    }
  }
}

impl ContextOpt {
  /// Select the platform. Default to `Platform::Auto`.
  #[inline]
  pub fn set_platform(self, platform: Platform) -> Self {
    ContextOpt { platform, ..self }
  }

  /// Get the platform.
  #[inline]
  pub fn platform(&self) -> Platform {
    self.platform
  }

  /// Select the API family. Default to `Api::Auto`.
  #[inline]
  pub fn set_api(self, api: Api) -> Self {
    ContextOpt { api, ..self }
  }

  /// Get the API family.
  #[inline]
  pub fn api(&self) -> Api {
    self.api
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn raw_platform_identifiers() {
    assert_eq!(Platform::try_from(0).unwrap(), Platform::Auto);
    assert_eq!(Platform::try_from(1).unwrap(), Platform::Glx);
    assert_eq!(Platform::try_from(5).unwrap(), Platform::Wgl);

    assert!(matches!(
      Platform::try_from(6),
      Err(ContextError::InvalidPlatform(_))
    ));
    assert!(matches!(
      Platform::try_from(-1),
      Err(ContextError::InvalidPlatform(_))
    ));
  }

  #[test]
  fn raw_api_identifiers() {
    assert_eq!(Api::try_from(2).unwrap(), Api::OpenGLES);
    assert!(Api::try_from(3).is_err());
  }

  #[test]
  fn concrete_platform_resolves_to_itself() {
    assert_eq!(Platform::Egl.resolve().unwrap(), Platform::Egl);
  }

  #[cfg(target_os = "linux")]
  #[test]
  fn auto_resolution_on_linux() {
    assert_eq!(Platform::Auto.resolve().unwrap(), Platform::Glx);
    assert_eq!(Api::Auto.resolve(), Api::OpenGL);
  }

  #[test]
  fn concrete_api_resolves_to_itself() {
    assert_eq!(Api::OpenGLES.resolve(), Api::OpenGLES);
    assert!(Api::OpenGLES.is_es());
    assert!(!Api::OpenGL.is_es());
  }

  #[test]
  fn platform_slots_are_distinct() {
    let platforms = [
      Platform::Glx,
      Platform::Egl,
      Platform::Cgl,
      Platform::Eagl,
      Platform::Wgl,
    ];

    for (i, p) in platforms.iter().enumerate() {
      assert_eq!(p.index(), Some(i));
    }

    assert_eq!(Platform::Auto.index(), None);
  }

  #[test]
  fn opts_builder() {
    let opt = ContextOpt::default()
      .set_platform(Platform::Egl)
      .set_api(Api::OpenGLES);

    assert_eq!(opt.platform(), Platform::Egl);
    assert_eq!(opt.api(), Api::OpenGLES);
    assert_eq!(ContextOpt::default().platform(), Platform::Auto);
  }
}
