//! Version probing.
//!
//! Desktop contexts report their version through the `GL_MAJOR_VERSION` / `GL_MINOR_VERSION`
//! integer queries. Embedded contexts only have the `GL_VERSION` string, which starts with
//! `OpenGL ES <major>.<minor>`.

use std::cmp::Ordering;
use std::fmt;

use crate::error::ContextError;
use crate::function::FunctionTable;
use crate::metagl::*;
use crate::platform::Api;

/// Minimum supported desktop major version.
pub const MIN_GL_MAJOR: i32 = 3;

/// Minimum supported embedded major version.
pub const MIN_GLES_MAJOR: i32 = 2;

/// A `major.minor` version.
///
/// Versions compare lexicographically: `4.0 > 3.3`.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct Version {
  /// Major version.
  pub major: i32,
  /// Minor version.
  pub minor: i32,
}

impl Version {
  /// Create a version.
  pub const fn new(major: i32, minor: i32) -> Self {
    Version { major, minor }
  }
}

impl PartialOrd for Version {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl Ord for Version {
  fn cmp(&self, other: &Self) -> Ordering {
    (self.major, self.minor).cmp(&(other.major, other.minor))
  }
}

impl fmt::Display for Version {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{}.{}", self.major, self.minor)
  }
}

/// Determine the version of the current context.
///
/// `api` must be resolved (not [`Api::Auto`]).
pub(crate) fn probe(functions: &FunctionTable, api: Api) -> Result<Version, ContextError> {
  let version = match api {
    Api::OpenGL => probe_desktop(functions)?,
    Api::OpenGLES => probe_embedded(functions)?,
    Api::Auto => unreachable!("the API family must be resolved before probing its version"),
  };

  log::info!("{} {}", api, version);

  Ok(version)
}

fn probe_desktop(functions: &FunctionTable) -> Result<Version, ContextError> {
  let major = functions.get_integer(gl::MAJOR_VERSION);
  let minor = functions.get_integer(gl::MINOR_VERSION);

  let (major, minor) = match (major, minor) {
    (Some(major), Some(minor)) => (major, minor),
    _ => {
      log::error!("could not query the OpenGL version");
      return Err(ContextError::VersionQueryFailed(
        "glGetIntegerv is not available".to_owned(),
      ));
    }
  };

  if major < MIN_GL_MAJOR {
    log::error!("only OpenGL >= {}.0 is supported", MIN_GL_MAJOR);
    return Err(ContextError::UnsupportedVersion {
      api: Api::OpenGL,
      major,
      minor,
    });
  }

  Ok(Version::new(major, minor))
}

fn probe_embedded(functions: &FunctionTable) -> Result<Version, ContextError> {
  let version_str = functions.get_string(gl::VERSION).ok_or_else(|| {
    log::error!("could not get OpenGL ES version");
    ContextError::VersionQueryFailed("no GL_VERSION string".to_owned())
  })?;

  let version = parse_es_version(&version_str).ok_or_else(|| {
    log::error!("could not parse OpenGL ES version ({})", version_str);
    ContextError::VersionQueryFailed(format!("unrecognized version string {:?}", version_str))
  })?;

  if version.major < MIN_GLES_MAJOR {
    log::error!("only OpenGL ES >= {}.0 is supported", MIN_GLES_MAJOR);
    return Err(ContextError::UnsupportedVersion {
      api: Api::OpenGLES,
      major: version.major,
      minor: version.minor,
    });
  }

  Ok(version)
}

/// Parse an embedded `GL_VERSION` string.
///
/// The string must start with `OpenGL ES <major>.<minor>`; whatever follows (driver name,
/// vendor-specific info) is ignored.
pub fn parse_es_version(s: &str) -> Option<Version> {
  let rest = s.strip_prefix("OpenGL")?.trim_start();
  let rest = rest.strip_prefix("ES")?;
  let (major, rest) = parse_int(rest)?;
  let rest = rest.strip_prefix('.')?;
  let (minor, _) = parse_int(rest)?;

  Some(Version::new(major, minor))
}

// Leading whitespace, an optional sign and at least one digit.
fn parse_int(s: &str) -> Option<(i32, &str)> {
  let s = s.trim_start();
  let sign_len = if s.starts_with('-') || s.starts_with('+') {
    1
  } else {
    0
  };
  let digits_len = s[sign_len..]
    .bytes()
    .take_while(u8::is_ascii_digit)
    .count();

  if digits_len == 0 {
    return None;
  }

  let end = sign_len + digits_len;
  let n = s[..end].parse().ok()?;

  Some((n, &s[end..]))
}
