//! Settings derived once the version and features of a context are known.

use crate::feature::Features;
use crate::function::FunctionTable;
use crate::metagl::*;
use crate::platform::Api;
use crate::version::Version;

/// Number of compute work group dimensions.
pub const COMPUTE_DIMENSIONS: usize = 3;

/// Derived context settings.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Settings {
  /// Pixel format of single-channel textures (`GL_RED` or `GL_LUMINANCE`).
  pub format_1comp: GLenum,
  /// Pixel format of dual-channel textures (`GL_RG` or `GL_LUMINANCE_ALPHA`).
  pub format_2comp: GLenum,
  /// `GL_MAX_TEXTURE_IMAGE_UNITS`.
  pub max_texture_image_units: GLint,
  /// `GL_MAX_COMPUTE_WORK_GROUP_COUNT` along each dimension; zero without compute shaders.
  pub max_compute_work_group_counts: [GLint; COMPUTE_DIMENSIONS],
}

impl Settings {
  pub(crate) fn derive(
    functions: &FunctionTable,
    api: Api,
    version: Version,
    features: Features,
  ) -> Self {
    let (format_1comp, format_2comp) = component_formats(api, version);
    let max_texture_image_units = functions
      .get_integer(gl::MAX_TEXTURE_IMAGE_UNITS)
      .unwrap_or(0);

    let mut max_compute_work_group_counts = [0; COMPUTE_DIMENSIONS];
    if features.contains(Features::COMPUTE_SHADER) {
      for (i, count) in max_compute_work_group_counts.iter_mut().enumerate() {
        *count = functions
          .get_integer_indexed(gl::MAX_COMPUTE_WORK_GROUP_COUNT, i as GLuint)
          .unwrap_or(0);
      }
    }

    Settings {
      format_1comp,
      format_2comp,
      max_texture_image_units,
      max_compute_work_group_counts,
    }
  }
}

/// Single- and dual-channel texture formats for a given API family and version.
///
/// OpenGL ES 2.0 has no red / red-green formats and falls back to the luminance ones.
pub fn component_formats(api: Api, version: Version) -> (GLenum, GLenum) {
  if api.is_es() && version == Version::new(2, 0) {
    (LUMINANCE, LUMINANCE_ALPHA)
  } else {
    (gl::RED, gl::RG)
  }
}
