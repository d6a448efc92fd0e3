//! Capability probing.
//!
//! Optional capabilities are described by a static table of [`FeatureDescriptor`]s. A feature is
//! available if:
//!
//! 1. the context version is at least the minimum version of its API family, **or** every
//!    extension listed for its API family is advertised by the driver;
//! 2. **and** every entry point the feature relies on was resolved by the function loader.
//!
//! Both gates are always checked: some drivers advertise an extension without exporting its
//! functions, or the other way around. Descriptors are evaluated independently, so a missing
//! feature never hides another one.

use std::fmt;

use bitflags::bitflags;

use crate::function::{EntryPoint, FunctionTable};
use crate::metagl::*;
use crate::platform::Api;
use crate::version::Version;

bitflags! {
  /// Set of optional capabilities available on a context.
  #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
  pub struct Features: u32 {
    /// Vertex array objects.
    const VERTEX_ARRAY_OBJECT = 1 << 0;
    /// 3D textures.
    const TEXTURE_3D = 1 << 1;
    /// Immutable texture storage.
    const TEXTURE_STORAGE = 1 << 2;
    /// Compute shaders.
    const COMPUTE_SHADER = 1 << 3;
    /// Program interface queries.
    const PROGRAM_INTERFACE_QUERY = 1 << 4;
    /// Image load / store from shaders.
    const SHADER_IMAGE_LOAD_STORE = 1 << 5;
    /// Shader storage buffer objects.
    const SHADER_STORAGE_BUFFER_OBJECT = 1 << 6;
    /// Framebuffer blitting and multisampled renderbuffers.
    const FRAMEBUFFER_OBJECT = 1 << 7;
    /// Instanced draw calls.
    const INSTANCED_DRAW = 1 << 8;
    /// Uniform buffer objects.
    const UNIFORM_BUFFER_OBJECT = 1 << 9;
    /// Fence sync objects.
    const SYNC = 1 << 10;
    /// Framebuffer invalidation.
    const INVALIDATE_SUBDATA = 1 << 11;
    /// Internal format queries.
    const INTERNALFORMAT_QUERY = 1 << 12;
    /// Multiple render targets.
    const DRAW_BUFFERS = 1 << 13;
  }
}

impl Features {
  /// Names of the features of the set, in descriptor table order.
  pub fn names(self) -> impl Iterator<Item = &'static str> {
    FEATURES
      .iter()
      .filter(move |desc| self.contains(desc.flag))
      .map(|desc| desc.name)
  }
}

impl fmt::Display for Features {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    for (i, name) in self.names().enumerate() {
      if i > 0 {
        f.write_str(" ")?;
      }

      f.write_str(name)?;
    }

    Ok(())
  }
}

/// Static rule describing how to detect an optional capability.
#[derive(Clone, Copy, Debug)]
pub struct FeatureDescriptor {
  /// Human-readable name.
  pub name: &'static str,
  /// Flag set when the feature is available.
  pub flag: Features,
  /// Minimum desktop version providing the feature in core.
  pub gl_version: Version,
  /// Minimum embedded version providing the feature in core.
  pub gles_version: Version,
  /// Desktop extensions providing the feature on older versions; all must be present.
  pub gl_extensions: &'static [&'static str],
  /// Embedded extensions providing the feature on older versions; all must be present.
  pub gles_extensions: &'static [&'static str],
  /// Entry points that must all be resolved.
  pub functions: &'static [EntryPoint],
}

impl FeatureDescriptor {
  /// Version gate and extension list of an API family.
  pub fn gate(&self, api: Api) -> (Version, &'static [&'static str]) {
    if api.is_es() {
      (self.gles_version, self.gles_extensions)
    } else {
      (self.gl_version, self.gl_extensions)
    }
  }

  /// Evaluate the descriptor against a context state.
  ///
  /// `has_extension` is only called when the version gate is not satisfied.
  pub fn is_available<F>(
    &self,
    api: Api,
    version: Version,
    functions: &FunctionTable,
    mut has_extension: F,
  ) -> bool
  where
    F: FnMut(&str) -> bool,
  {
    let (min_version, extensions) = self.gate(api);

    if version < min_version
      && (extensions.is_empty() || !extensions.iter().all(|&ext| has_extension(ext)))
    {
      return false;
    }

    functions.contains_all(self.functions)
  }
}

/// Known optional capabilities, in probing order.
pub static FEATURES: &[FeatureDescriptor] = &[
  FeatureDescriptor {
    name: "vertex_array_object",
    flag: Features::VERTEX_ARRAY_OBJECT,
    gl_version: Version::new(3, 0),
    gles_version: Version::new(3, 0),
    gl_extensions: &["GL_ARB_vertex_array_object"],
    gles_extensions: &["GL_OES_vertex_array_object"],
    functions: &[
      EntryPoint::GenVertexArrays,
      EntryPoint::BindVertexArray,
      EntryPoint::DeleteVertexArrays,
    ],
  },
  FeatureDescriptor {
    name: "texture3d",
    flag: Features::TEXTURE_3D,
    gl_version: Version::new(2, 0),
    gles_version: Version::new(3, 0),
    gl_extensions: &[],
    gles_extensions: &[],
    functions: &[EntryPoint::TexImage3D, EntryPoint::TexSubImage3D],
  },
  FeatureDescriptor {
    name: "texture_storage",
    flag: Features::TEXTURE_STORAGE,
    gl_version: Version::new(4, 2),
    gles_version: Version::new(3, 1),
    gl_extensions: &["GL_ARB_texture_storage"],
    gles_extensions: &[],
    functions: &[EntryPoint::TexStorage2D, EntryPoint::TexStorage3D],
  },
  FeatureDescriptor {
    name: "compute_shader",
    flag: Features::COMPUTE_SHADER,
    gl_version: Version::new(4, 3),
    gles_version: Version::new(3, 1),
    gl_extensions: &["GL_ARB_compute_shader"],
    gles_extensions: &[],
    functions: &[EntryPoint::DispatchCompute, EntryPoint::MemoryBarrier],
  },
  FeatureDescriptor {
    name: "program_interface_query",
    flag: Features::PROGRAM_INTERFACE_QUERY,
    gl_version: Version::new(4, 3),
    gles_version: Version::new(3, 1),
    gl_extensions: &["GL_ARB_program_interface_query"],
    gles_extensions: &[],
    functions: &[
      EntryPoint::GetProgramResourceIndex,
      EntryPoint::GetProgramResourceiv,
      EntryPoint::GetProgramResourceLocation,
    ],
  },
  FeatureDescriptor {
    name: "shader_image_load_store",
    flag: Features::SHADER_IMAGE_LOAD_STORE,
    gl_version: Version::new(4, 2),
    gles_version: Version::new(3, 1),
    gl_extensions: &["GL_ARB_shader_image_load_store"],
    gles_extensions: &[],
    functions: &[EntryPoint::BindImageTexture],
  },
  FeatureDescriptor {
    name: "shader_storage_buffer_object",
    flag: Features::SHADER_STORAGE_BUFFER_OBJECT,
    gl_version: Version::new(4, 3),
    gles_version: Version::new(3, 1),
    gl_extensions: &["GL_ARB_shader_storage_buffer_object"],
    gles_extensions: &[],
    functions: &[EntryPoint::BindBufferBase],
  },
  FeatureDescriptor {
    name: "framebuffer_object",
    flag: Features::FRAMEBUFFER_OBJECT,
    gl_version: Version::new(3, 0),
    gles_version: Version::new(3, 0),
    gl_extensions: &["GL_ARB_framebuffer_object"],
    gles_extensions: &[],
    functions: &[
      EntryPoint::BlitFramebuffer,
      EntryPoint::RenderbufferStorageMultisample,
    ],
  },
  FeatureDescriptor {
    name: "instanced_draw",
    flag: Features::INSTANCED_DRAW,
    gl_version: Version::new(3, 3),
    gles_version: Version::new(3, 0),
    gl_extensions: &["GL_ARB_draw_instanced", "GL_ARB_instanced_arrays"],
    gles_extensions: &[],
    functions: &[
      EntryPoint::DrawArraysInstanced,
      EntryPoint::DrawElementsInstanced,
      EntryPoint::VertexAttribDivisor,
    ],
  },
  FeatureDescriptor {
    name: "uniform_buffer_object",
    flag: Features::UNIFORM_BUFFER_OBJECT,
    gl_version: Version::new(3, 1),
    gles_version: Version::new(3, 0),
    gl_extensions: &["GL_ARB_uniform_buffer_object"],
    gles_extensions: &[],
    functions: &[
      EntryPoint::GetUniformBlockIndex,
      EntryPoint::UniformBlockBinding,
      EntryPoint::BindBufferBase,
    ],
  },
  FeatureDescriptor {
    name: "sync",
    flag: Features::SYNC,
    gl_version: Version::new(3, 2),
    gles_version: Version::new(3, 0),
    gl_extensions: &["GL_ARB_sync"],
    gles_extensions: &[],
    functions: &[
      EntryPoint::FenceSync,
      EntryPoint::ClientWaitSync,
      EntryPoint::WaitSync,
      EntryPoint::DeleteSync,
    ],
  },
  FeatureDescriptor {
    name: "invalidate_subdata",
    flag: Features::INVALIDATE_SUBDATA,
    gl_version: Version::new(4, 3),
    gles_version: Version::new(3, 0),
    gl_extensions: &["GL_ARB_invalidate_subdata"],
    gles_extensions: &[],
    functions: &[EntryPoint::InvalidateFramebuffer],
  },
  FeatureDescriptor {
    name: "internalformat_query",
    flag: Features::INTERNALFORMAT_QUERY,
    gl_version: Version::new(4, 2),
    gles_version: Version::new(3, 0),
    gl_extensions: &["GL_ARB_internalformat_query"],
    gles_extensions: &[],
    functions: &[EntryPoint::GetInternalformativ],
  },
  FeatureDescriptor {
    name: "draw_buffers",
    flag: Features::DRAW_BUFFERS,
    gl_version: Version::new(3, 0),
    gles_version: Version::new(3, 0),
    gl_extensions: &[],
    gles_extensions: &[],
    functions: &[EntryPoint::DrawBuffers],
  },
];

/// Whether `extension` appears as a whole token in a space-delimited extension list.
///
/// A prefix match is not enough: `GL_OES_foo` is not found in `GL_OES_fooz`.
pub fn check_extension(extension: &str, extensions: &str) -> bool {
  !extension.is_empty() && extensions.split(' ').any(|token| token == extension)
}

// Extensions advertised by the driver, queried at most once per probe.
enum Extensions {
  // GL ES: a single space-delimited string.
  Joined(String),
  // Desktop GL: an indexed list.
  Indexed(Vec<String>),
}

impl Extensions {
  fn query(functions: &FunctionTable, api: Api) -> Self {
    if api.is_es() {
      Extensions::Joined(functions.get_string(gl::EXTENSIONS).unwrap_or_default())
    } else {
      let count = functions.get_integer(gl::NUM_EXTENSIONS).unwrap_or(0).max(0);
      let mut list = Vec::new();

      for i in 0..count {
        match functions.get_string_indexed(gl::EXTENSIONS, i as GLuint) {
          Some(ext) => list.push(ext),
          None => break,
        }
      }

      Extensions::Indexed(list)
    }
  }

  fn contains(&self, extension: &str) -> bool {
    match self {
      Extensions::Joined(s) => check_extension(extension, s),
      Extensions::Indexed(list) => list.iter().any(|ext| ext == extension),
    }
  }
}

/// Evaluate every known feature against a loaded function table.
pub(crate) fn probe(functions: &FunctionTable, api: Api, version: Version) -> Features {
  let mut extensions: Option<Extensions> = None;
  let mut features = Features::empty();

  for desc in FEATURES {
    let available = desc.is_available(api, version, functions, |ext| {
      extensions
        .get_or_insert_with(|| Extensions::query(functions, api))
        .contains(ext)
    });

    if available {
      features |= desc.flag;
    }
  }

  log::info!(
    "{} features: {}",
    if api.is_es() { "OpenGL ES" } else { "OpenGL" },
    features
  );

  features
}
