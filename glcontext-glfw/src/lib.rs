//! [GLFW](https://crates.io/crates/glfw) backend for [glcontext](https://crates.io/crates/glcontext).
//!
//! With GLFW, the native context is attached to a window: the window pointer is used both as the
//! window and as the context handle, and there is no display.

#![deny(missing_docs)]

use glcontext::{
  Backend, BackendError, BackendRegistry, Context, ContextError, ContextOpt, NativePtr, Platform,
};
use glfw::{ffi, Context as _, Glfw, InitError, Window, WindowEvent};
use std::{error, ffi::CString, fmt, os::raw::c_void, ptr, sync::mpsc::Receiver};

/// GLFW platform backend.
///
/// A wrapped window is never destroyed by the backend. Windows created for shared contexts are
/// hidden and destroyed when the context is torn down.
#[derive(Debug)]
pub struct GlfwBackend {
  window: *mut ffi::GLFWwindow,
  owned: bool,
}

impl Default for GlfwBackend {
  fn default() -> Self {
    GlfwBackend {
      window: ptr::null_mut(),
      owned: false,
    }
  }
}

unsafe impl Backend for GlfwBackend {
  fn init(
    &mut self,
    _display: NativePtr,
    window: NativePtr,
    handle: NativePtr,
  ) -> Result<(), BackendError> {
    let window = if window.is_null() { handle } else { window };

    if window.is_null() {
      return Err(BackendError::new("no GLFW window to wrap"));
    }

    self.window = window as *mut ffi::GLFWwindow;
    Ok(())
  }

  fn create(&mut self, other: &dyn Backend) -> Result<(), BackendError> {
    let title = b"glcontext\0";

    let window = unsafe {
      ffi::glfwWindowHint(ffi::VISIBLE, ffi::FALSE);
      let window = ffi::glfwCreateWindow(
        1,
        1,
        title.as_ptr() as *const _,
        ptr::null_mut(),
        other.window() as *mut ffi::GLFWwindow,
      );
      ffi::glfwDefaultWindowHints();
      window
    };

    if window.is_null() {
      return Err(BackendError::new("could not create a shared GLFW window"));
    }

    log::debug!("created hidden GLFW window {:?} for a shared context", window);

    self.window = window;
    self.owned = true;
    Ok(())
  }

  fn display(&self) -> NativePtr {
    ptr::null_mut()
  }

  fn window(&self) -> NativePtr {
    self.window as NativePtr
  }

  fn handle(&self) -> NativePtr {
    self.window as NativePtr
  }

  fn get_proc_address(&self, name: &str) -> *const c_void {
    match CString::new(name) {
      Ok(name) => unsafe { ffi::glfwGetProcAddress(name.as_ptr()) as *const c_void },
      Err(_) => ptr::null(),
    }
  }

  fn make_current(&mut self, current: bool) -> Result<(), BackendError> {
    let window = if current {
      self.window
    } else {
      ptr::null_mut()
    };

    unsafe { ffi::glfwMakeContextCurrent(window) };
    Ok(())
  }

  fn swap_buffers(&mut self) {
    unsafe { ffi::glfwSwapBuffers(self.window) };
  }

  fn uninit(&mut self, wrapped: bool) {
    if self.owned && !wrapped && !self.window.is_null() {
      unsafe { ffi::glfwDestroyWindow(self.window) };
    }

    self.window = ptr::null_mut();
    self.owned = false;
  }
}

fn new_backend() -> Option<Box<dyn Backend>> {
  Some(Box::new(GlfwBackend::default()))
}

/// Register the GLFW backend for the default platform of the target.
pub fn register(registry: &mut BackendRegistry) {
  registry.register(Platform::Auto, new_backend);
}

/// Error that can be risen while creating a surface.
#[non_exhaustive]
#[derive(Debug)]
pub enum GlfwSurfaceError<E> {
  /// Initialization of GLFW went wrong.
  InitError(InitError),

  /// User error.
  UserError(E),

  /// The context could not be wrapped or loaded.
  ContextError(ContextError),
}

impl<E> fmt::Display for GlfwSurfaceError<E>
where
  E: fmt::Display,
{
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      GlfwSurfaceError::InitError(ref e) => write!(f, "initialization error: {}", e),
      GlfwSurfaceError::UserError(ref e) => write!(f, "user error: {}", e),
      GlfwSurfaceError::ContextError(ref e) => write!(f, "context error: {}", e),
    }
  }
}

impl<E> From<InitError> for GlfwSurfaceError<E> {
  fn from(e: InitError) -> Self {
    GlfwSurfaceError::InitError(e)
  }
}

impl<E> From<ContextError> for GlfwSurfaceError<E> {
  fn from(e: ContextError) -> Self {
    GlfwSurfaceError::ContextError(e)
  }
}

impl<E> error::Error for GlfwSurfaceError<E>
where
  E: 'static + error::Error,
{
  fn source(&self) -> Option<&(dyn error::Error + 'static)> {
    match self {
      GlfwSurfaceError::InitError(e) => Some(e),
      GlfwSurfaceError::UserError(e) => Some(e),
      GlfwSurfaceError::ContextError(e) => Some(e),
    }
  }
}

/// GLFW surface.
///
/// Bundles a GLFW window, its events queue and a loaded [`Context`] wrapping its native context.
#[derive(Debug)]
pub struct GlfwSurface {
  /// Loaded context; dropped before the window.
  pub context: Context,

  /// Wrapped GLFW window.
  pub window: Window,

  /// Wrapped GLFW events queue.
  pub events_rx: Receiver<(f64, WindowEvent)>,
}

impl GlfwSurface {
  /// Initialize GLFW, create a window with `create_window` and wrap its context.
  ///
  /// The context is made current and loaded before being returned.
  pub fn new<E>(
    opt: ContextOpt,
    create_window: impl FnOnce(
      &mut Glfw,
    )
      -> Result<(Window, Receiver<(f64, WindowEvent)>), GlfwSurfaceError<E>>,
  ) -> Result<Self, GlfwSurfaceError<E>> {
    let mut glfw = glfw::init(glfw::FAIL_ON_ERRORS)?;
    let (window, events_rx) = create_window(&mut glfw)?;

    let mut registry = BackendRegistry::new();
    register(&mut registry);

    let handle = window.window_ptr() as NativePtr;
    let mut context = Context::new_wrapped(&registry, ptr::null_mut(), handle, handle, opt)?;
    context.make_current(true)?;
    context.load()?;

    Ok(GlfwSurface {
      context,
      window,
      events_rx,
    })
  }
}
