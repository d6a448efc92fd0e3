//! Backend interface.
//!
//! A backend is the platform-specific part of a context: it knows how to attach to a native
//! context (GLX, EGL, CGL, EAGL, WGL, or any windowing library sitting on top of them), how to
//! resolve GL entry points by name and how to present frames. This crate doesn’t create native
//! contexts by itself; instead, it relies on a backend for each platform, registered in a
//! [`BackendRegistry`] before any context is constructed.
//!
//! Only [`Backend::init`], the native accessors and [`Backend::get_proc_address`] are required.
//! Every other operation has a default implementation matching “not supported”.

use std::os::raw::c_void;
use std::ptr;

use crate::error::BackendError;
use crate::platform::Platform;

/// Opaque native pointer (display, window, context handle, texture cache…).
pub type NativePtr = *mut c_void;

/// Platform backend.
///
/// # Unsafety
///
/// [`Backend::get_proc_address`] must return either a null pointer or the address of the GL
/// function with the given name, callable with the platform GL calling convention. The returned
/// addresses are called as-is by the context.
pub unsafe trait Backend {
  /// Attach the backend to a native display, window and context handle.
  ///
  /// Any of the pointers might be null if the platform doesn’t need it.
  fn init(
    &mut self,
    display: NativePtr,
    window: NativePtr,
    handle: NativePtr,
  ) -> Result<(), BackendError>;

  /// Derive a new native context sharing its resources with `other`.
  ///
  /// This is only called on contexts constructed with [`Context::new_shared`], after
  /// [`Backend::init`] received the display, window and handle of `other`.
  ///
  /// # Defaults
  ///
  /// Does nothing: the backend simply reuses what [`Backend::init`] received.
  ///
  /// [`Context::new_shared`]: crate::Context::new_shared
  fn create(&mut self, other: &dyn Backend) -> Result<(), BackendError> {
    let _ = other;
    Ok(())
  }

  /// Native display.
  fn display(&self) -> NativePtr;

  /// Native window.
  fn window(&self) -> NativePtr;

  /// Native context handle.
  fn handle(&self) -> NativePtr;

  /// Resolve a GL entry point by name, or return null if it is not available.
  fn get_proc_address(&self, name: &str) -> *const c_void;

  /// Make the context current (or release it) on the calling thread.
  ///
  /// # Defaults
  ///
  /// The context is considered always current.
  fn make_current(&mut self, current: bool) -> Result<(), BackendError> {
    let _ = current;
    Ok(())
  }

  /// Present the rendered frame.
  ///
  /// # Defaults
  ///
  /// Does nothing.
  fn swap_buffers(&mut self) {}

  /// Release the backend resources.
  ///
  /// `wrapped` is `true` if the native context was supplied by the caller rather than created by
  /// the backend; in that case the native context must be left untouched.
  ///
  /// # Defaults
  ///
  /// Does nothing.
  fn uninit(&mut self, wrapped: bool) {
    let _ = wrapped;
  }

  /// Platform texture cache, if any (used for zero-copy media uploads on mobile platforms).
  ///
  /// # Defaults
  ///
  /// Returns null.
  fn texture_cache(&self) -> NativePtr {
    ptr::null_mut()
  }
}

/// Allocate the private state of a backend.
///
/// Returns [`None`] if the state cannot be allocated.
pub type BackendFactory = fn() -> Option<Box<dyn Backend>>;

/// Platform to backend mapping.
///
/// A registry is filled once, typically at startup, and then used to construct every context of
/// the application.
#[derive(Clone, Debug, Default)]
pub struct BackendRegistry {
  factories: [Option<BackendFactory>; Platform::COUNT],
}

impl BackendRegistry {
  /// Create an empty registry.
  pub fn new() -> Self {
    Self::default()
  }

  /// Register the backend of a platform, replacing any previously registered one.
  ///
  /// [`Platform::Auto`] registers the backend for the default platform of the target.
  pub fn register(&mut self, platform: Platform, factory: BackendFactory) -> &mut Self {
    if let Some(index) = platform.resolve().ok().and_then(Platform::index) {
      self.factories[index] = Some(factory);
    } else {
      log::warn!("cannot register a backend for platform {}", platform);
    }

    self
  }

  /// Backend factory of a concrete platform, if registered.
  pub fn get(&self, platform: Platform) -> Option<BackendFactory> {
    platform.index().and_then(|index| self.factories[index])
  }

  /// Whether a backend is registered for a given platform.
  pub fn contains(&self, platform: Platform) -> bool {
    self.get(platform).is_some()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  struct Nothing;

  unsafe impl Backend for Nothing {
    fn init(&mut self, _: NativePtr, _: NativePtr, _: NativePtr) -> Result<(), BackendError> {
      Ok(())
    }

    fn display(&self) -> NativePtr {
      ptr::null_mut()
    }

    fn window(&self) -> NativePtr {
      ptr::null_mut()
    }

    fn handle(&self) -> NativePtr {
      ptr::null_mut()
    }

    fn get_proc_address(&self, _: &str) -> *const c_void {
      ptr::null()
    }
  }

  fn nothing() -> Option<Box<dyn Backend>> {
    Some(Box::new(Nothing))
  }

  #[test]
  fn empty_registry() {
    let registry = BackendRegistry::new();

    assert!(!registry.contains(Platform::Glx));
    assert!(!registry.contains(Platform::Auto));
  }

  #[test]
  fn register_concrete_platform() {
    let mut registry = BackendRegistry::new();
    registry.register(Platform::Egl, nothing);

    assert!(registry.contains(Platform::Egl));
    assert!(!registry.contains(Platform::Glx));
    assert!(!registry.contains(Platform::Auto));
  }

  #[cfg(target_os = "linux")]
  #[test]
  fn register_auto_platform() {
    let mut registry = BackendRegistry::new();
    registry.register(Platform::Auto, nothing);

    assert!(registry.contains(Platform::Glx));
  }

  #[test]
  fn default_operations() {
    let mut backend = Nothing;

    assert!(backend.make_current(true).is_ok());
    assert!(backend.create(&Nothing).is_ok());
    assert!(backend.texture_cache().is_null());
    backend.swap_buffers();
    backend.uninit(true);
  }
}
