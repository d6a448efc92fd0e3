//! GL entry points and function table.
//!
//! Each context owns a [`FunctionTable`] mapping every known [`EntryPoint`] to the address
//! resolved by its backend. Mandatory entry points must resolve for the context to be usable;
//! optional ones are stored as missing and later interpreted by the capability prober as
//! “feature unavailable”.

use std::ffi::CStr;
use std::fmt;
use std::mem;
use std::os::raw::{c_char, c_void};
use std::ptr::NonNull;

use crate::error::ContextError;
use crate::metagl::*;

/// Whether an entry point is required for a context to be usable.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Requirement {
  /// Loading fails if the entry point cannot be resolved.
  Mandatory,
  /// The entry point might be missing.
  Optional,
}

macro_rules! entry_points {
  ($($variant:ident => $name:literal, $req:ident;)*) => {
    /// A GL entry point known to the function loader.
    #[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
    pub enum EntryPoint {
      $(
        #[doc = concat!("`", $name, "`")]
        $variant,
      )*
    }

    impl EntryPoint {
      /// All the entry points, in loading order.
      pub const ALL: &'static [EntryPoint] = &[$(EntryPoint::$variant),*];

      /// Number of entry points.
      pub const COUNT: usize = EntryPoint::ALL.len();

      /// Native name of the entry point.
      pub fn name(self) -> &'static str {
        match self {
          $(EntryPoint::$variant => $name),*
        }
      }

      /// Whether the entry point is mandatory.
      pub fn requirement(self) -> Requirement {
        match self {
          $(EntryPoint::$variant => Requirement::$req),*
        }
      }
    }
  };
}

entry_points! {
  ActiveTexture => "glActiveTexture", Mandatory;
  AttachShader => "glAttachShader", Mandatory;
  BindAttribLocation => "glBindAttribLocation", Mandatory;
  BindBuffer => "glBindBuffer", Mandatory;
  BindFramebuffer => "glBindFramebuffer", Mandatory;
  BindRenderbuffer => "glBindRenderbuffer", Mandatory;
  BindTexture => "glBindTexture", Mandatory;
  BlendColor => "glBlendColor", Mandatory;
  BlendEquation => "glBlendEquation", Mandatory;
  BlendEquationSeparate => "glBlendEquationSeparate", Mandatory;
  BlendFunc => "glBlendFunc", Mandatory;
  BlendFuncSeparate => "glBlendFuncSeparate", Mandatory;
  BufferData => "glBufferData", Mandatory;
  BufferSubData => "glBufferSubData", Mandatory;
  CheckFramebufferStatus => "glCheckFramebufferStatus", Mandatory;
  Clear => "glClear", Mandatory;
  ClearColor => "glClearColor", Mandatory;
  ClearStencil => "glClearStencil", Mandatory;
  ColorMask => "glColorMask", Mandatory;
  CompileShader => "glCompileShader", Mandatory;
  CreateProgram => "glCreateProgram", Mandatory;
  CreateShader => "glCreateShader", Mandatory;
  CullFace => "glCullFace", Mandatory;
  DeleteBuffers => "glDeleteBuffers", Mandatory;
  DeleteFramebuffers => "glDeleteFramebuffers", Mandatory;
  DeleteProgram => "glDeleteProgram", Mandatory;
  DeleteRenderbuffers => "glDeleteRenderbuffers", Mandatory;
  DeleteShader => "glDeleteShader", Mandatory;
  DeleteTextures => "glDeleteTextures", Mandatory;
  DepthFunc => "glDepthFunc", Mandatory;
  DepthMask => "glDepthMask", Mandatory;
  DetachShader => "glDetachShader", Mandatory;
  Disable => "glDisable", Mandatory;
  DisableVertexAttribArray => "glDisableVertexAttribArray", Mandatory;
  DrawArrays => "glDrawArrays", Mandatory;
  DrawElements => "glDrawElements", Mandatory;
  Enable => "glEnable", Mandatory;
  EnableVertexAttribArray => "glEnableVertexAttribArray", Mandatory;
  Finish => "glFinish", Mandatory;
  Flush => "glFlush", Mandatory;
  FramebufferRenderbuffer => "glFramebufferRenderbuffer", Mandatory;
  FramebufferTexture2D => "glFramebufferTexture2D", Mandatory;
  FrontFace => "glFrontFace", Mandatory;
  GenBuffers => "glGenBuffers", Mandatory;
  GenFramebuffers => "glGenFramebuffers", Mandatory;
  GenRenderbuffers => "glGenRenderbuffers", Mandatory;
  GenTextures => "glGenTextures", Mandatory;
  GenerateMipmap => "glGenerateMipmap", Mandatory;
  GetActiveAttrib => "glGetActiveAttrib", Mandatory;
  GetActiveUniform => "glGetActiveUniform", Mandatory;
  GetAttribLocation => "glGetAttribLocation", Mandatory;
  GetError => "glGetError", Mandatory;
  GetIntegerv => "glGetIntegerv", Mandatory;
  GetProgramInfoLog => "glGetProgramInfoLog", Mandatory;
  GetProgramiv => "glGetProgramiv", Mandatory;
  GetShaderInfoLog => "glGetShaderInfoLog", Mandatory;
  GetShaderiv => "glGetShaderiv", Mandatory;
  GetString => "glGetString", Mandatory;
  GetUniformLocation => "glGetUniformLocation", Mandatory;
  LinkProgram => "glLinkProgram", Mandatory;
  PixelStorei => "glPixelStorei", Mandatory;
  ReadPixels => "glReadPixels", Mandatory;
  RenderbufferStorage => "glRenderbufferStorage", Mandatory;
  Scissor => "glScissor", Mandatory;
  ShaderSource => "glShaderSource", Mandatory;
  StencilFunc => "glStencilFunc", Mandatory;
  StencilFuncSeparate => "glStencilFuncSeparate", Mandatory;
  StencilMask => "glStencilMask", Mandatory;
  StencilMaskSeparate => "glStencilMaskSeparate", Mandatory;
  StencilOp => "glStencilOp", Mandatory;
  StencilOpSeparate => "glStencilOpSeparate", Mandatory;
  TexImage2D => "glTexImage2D", Mandatory;
  TexParameteri => "glTexParameteri", Mandatory;
  TexSubImage2D => "glTexSubImage2D", Mandatory;
  Uniform1f => "glUniform1f", Mandatory;
  Uniform1fv => "glUniform1fv", Mandatory;
  Uniform1i => "glUniform1i", Mandatory;
  Uniform1iv => "glUniform1iv", Mandatory;
  Uniform2fv => "glUniform2fv", Mandatory;
  Uniform2iv => "glUniform2iv", Mandatory;
  Uniform3fv => "glUniform3fv", Mandatory;
  Uniform3iv => "glUniform3iv", Mandatory;
  Uniform4fv => "glUniform4fv", Mandatory;
  Uniform4iv => "glUniform4iv", Mandatory;
  UniformMatrix3fv => "glUniformMatrix3fv", Mandatory;
  UniformMatrix4fv => "glUniformMatrix4fv", Mandatory;
  UseProgram => "glUseProgram", Mandatory;
  VertexAttribPointer => "glVertexAttribPointer", Mandatory;
  Viewport => "glViewport", Mandatory;

  BindBufferBase => "glBindBufferBase", Optional;
  BindImageTexture => "glBindImageTexture", Optional;
  BindVertexArray => "glBindVertexArray", Optional;
  BlitFramebuffer => "glBlitFramebuffer", Optional;
  ClientWaitSync => "glClientWaitSync", Optional;
  DeleteSync => "glDeleteSync", Optional;
  DeleteVertexArrays => "glDeleteVertexArrays", Optional;
  DispatchCompute => "glDispatchCompute", Optional;
  DrawArraysInstanced => "glDrawArraysInstanced", Optional;
  DrawBuffers => "glDrawBuffers", Optional;
  DrawElementsInstanced => "glDrawElementsInstanced", Optional;
  FenceSync => "glFenceSync", Optional;
  GenVertexArrays => "glGenVertexArrays", Optional;
  GetIntegeriv => "glGetIntegeri_v", Optional;
  GetInternalformativ => "glGetInternalformativ", Optional;
  GetProgramResourceIndex => "glGetProgramResourceIndex", Optional;
  GetProgramResourceLocation => "glGetProgramResourceLocation", Optional;
  GetProgramResourceiv => "glGetProgramResourceiv", Optional;
  GetStringi => "glGetStringi", Optional;
  GetUniformBlockIndex => "glGetUniformBlockIndex", Optional;
  InvalidateFramebuffer => "glInvalidateFramebuffer", Optional;
  MemoryBarrier => "glMemoryBarrier", Optional;
  RenderbufferStorageMultisample => "glRenderbufferStorageMultisample", Optional;
  TexImage3D => "glTexImage3D", Optional;
  TexStorage2D => "glTexStorage2D", Optional;
  TexStorage3D => "glTexStorage3D", Optional;
  TexSubImage3D => "glTexSubImage3D", Optional;
  UniformBlockBinding => "glUniformBlockBinding", Optional;
  VertexAttribDivisor => "glVertexAttribDivisor", Optional;
  WaitSync => "glWaitSync", Optional;
}

impl fmt::Display for EntryPoint {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    f.write_str(self.name())
  }
}

/// Resolved address of a GL function.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct GlProc(NonNull<c_void>);

impl GlProc {
  /// Wrap a resolved address; [`None`] if null.
  pub fn new(addr: *const c_void) -> Option<Self> {
    NonNull::new(addr as *mut c_void).map(GlProc)
  }

  /// Raw address.
  pub fn as_ptr(self) -> *const c_void {
    self.0.as_ptr()
  }
}

/// Resolved GL functions of a context.
///
/// Entries are either a resolved address or missing, never anything in between.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FunctionTable {
  procs: [Option<GlProc>; EntryPoint::COUNT],
}

impl Default for FunctionTable {
  fn default() -> Self {
    FunctionTable {
      procs: [None; EntryPoint::COUNT],
    }
  }
}

impl FunctionTable {
  /// Resolve every entry point, in [`EntryPoint::ALL`] order, with `resolve`.
  ///
  /// Loading stops at the first mandatory entry point that cannot be resolved.
  pub fn load<F>(mut resolve: F) -> Result<Self, ContextError>
  where
    F: FnMut(&str) -> *const c_void,
  {
    let mut table = FunctionTable::default();

    for &entry in EntryPoint::ALL {
      let proc = GlProc::new(resolve(entry.name()));

      if proc.is_none() {
        if entry.requirement() == Requirement::Mandatory {
          log::error!("could not find core function: {}", entry);
          return Err(ContextError::MissingCoreFunction(entry.name()));
        }

        log::debug!("optional function {} is not available", entry);
      }

      table.procs[entry as usize] = proc;
    }

    Ok(table)
  }

  /// Address of an entry point, if resolved.
  pub fn get(&self, entry: EntryPoint) -> Option<GlProc> {
    self.procs[entry as usize]
  }

  /// Whether an entry point is resolved.
  pub fn contains(&self, entry: EntryPoint) -> bool {
    self.get(entry).is_some()
  }

  /// Whether all the given entry points are resolved.
  pub fn contains_all(&self, entries: &[EntryPoint]) -> bool {
    entries.iter().all(|&entry| self.contains(entry))
  }

  /// Number of resolved entry points.
  pub fn resolved_count(&self) -> usize {
    self.procs.iter().filter(|p| p.is_some()).count()
  }

  /// `glGetError`; `GL_NO_ERROR` if the function is not loaded.
  pub(crate) fn get_error(&self) -> GLenum {
    match self.get(EntryPoint::GetError) {
      Some(proc) => unsafe {
        let f: extern "system" fn() -> GLenum = mem::transmute(proc.as_ptr());
        f()
      },
      None => gl::NO_ERROR,
    }
  }

  /// `glGetIntegerv` for a single value; `None` if the function is not loaded.
  pub(crate) fn get_integer(&self, pname: GLenum) -> Option<GLint> {
    let proc = self.get(EntryPoint::GetIntegerv)?;
    let mut value: GLint = 0;

    unsafe {
      let f: extern "system" fn(GLenum, *mut GLint) = mem::transmute(proc.as_ptr());
      f(pname, &mut value);
    }

    Some(value)
  }

  /// `glGetIntegeri_v` for a single value; `None` if the function is not loaded.
  pub(crate) fn get_integer_indexed(&self, target: GLenum, index: GLuint) -> Option<GLint> {
    let proc = self.get(EntryPoint::GetIntegeriv)?;
    let mut value: GLint = 0;

    unsafe {
      let f: extern "system" fn(GLenum, GLuint, *mut GLint) = mem::transmute(proc.as_ptr());
      f(target, index, &mut value);
    }

    Some(value)
  }

  /// `glGetString`; `None` if the function is not loaded or returned null.
  pub(crate) fn get_string(&self, name: GLenum) -> Option<String> {
    let proc = self.get(EntryPoint::GetString)?;

    unsafe {
      let f: extern "system" fn(GLenum) -> *const GLubyte = mem::transmute(proc.as_ptr());
      gl_string(f(name))
    }
  }

  /// `glGetStringi`; `None` if the function is not loaded or returned null.
  pub(crate) fn get_string_indexed(&self, name: GLenum, index: GLuint) -> Option<String> {
    let proc = self.get(EntryPoint::GetStringi)?;

    unsafe {
      let f: extern "system" fn(GLenum, GLuint) -> *const GLubyte = mem::transmute(proc.as_ptr());
      gl_string(f(name, index))
    }
  }
}

unsafe fn gl_string(s: *const GLubyte) -> Option<String> {
  if s.is_null() {
    None
  } else {
    Some(
      CStr::from_ptr(s as *const c_char)
        .to_string_lossy()
        .into_owned(),
    )
  }
}
