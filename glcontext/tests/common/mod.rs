//! Scripted fake driver.
//!
//! The fake backend resolves the GL query functions to `extern "system"` functions answering
//! from a per-thread [`Driver`] description. Every other entry point resolves to a dummy
//! function, unless it is listed in [`Driver::missing`].

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::ffi::CString;
use std::os::raw::c_void;
use std::ptr;

use glcontext::{Backend, BackendError, BackendRegistry, NativePtr, Platform};

pub const GL_EXTENSIONS: u32 = 0x1F03;
pub const GL_VERSION: u32 = 0x1F02;
pub const GL_MAJOR_VERSION: u32 = 0x821B;
pub const GL_MINOR_VERSION: u32 = 0x821C;
pub const GL_NUM_EXTENSIONS: u32 = 0x821D;
pub const GL_MAX_TEXTURE_IMAGE_UNITS: u32 = 0x8872;
pub const GL_MAX_COMPUTE_WORK_GROUP_COUNT: u32 = 0x91BE;

/// What the fake driver reports.
#[derive(Debug, Default)]
pub struct Driver {
  pub major: i32,
  pub minor: i32,
  pub version: Option<CString>,
  pub es_extensions: Option<CString>,
  pub extensions: Vec<CString>,
  /// `GL_NUM_EXTENSIONS` override; the length of `extensions` otherwise.
  pub num_extensions: Option<i32>,
  pub max_texture_image_units: i32,
  pub max_compute_work_group_counts: [i32; 3],
  pub errors: Vec<u32>,
  pub missing: HashSet<&'static str>,
  pub fail_init: bool,
  pub fail_create: bool,
  pub no_state: bool,
}

impl Driver {
  /// A desktop driver reporting `major.minor` and no extension.
  pub fn desktop(major: i32, minor: i32) -> Self {
    Driver {
      major,
      minor,
      max_texture_image_units: 32,
      max_compute_work_group_counts: [65535, 65535, 65535],
      ..Driver::default()
    }
  }

  /// An embedded driver reporting the given `GL_VERSION` string and no extension.
  pub fn embedded(version: &str) -> Self {
    Driver {
      version: Some(CString::new(version).unwrap()),
      es_extensions: Some(CString::new("").unwrap()),
      max_texture_image_units: 16,
      max_compute_work_group_counts: [1024, 512, 64],
      ..Driver::default()
    }
  }

  pub fn with_extensions(mut self, extensions: &[&str]) -> Self {
    self.extensions = extensions
      .iter()
      .map(|ext| CString::new(*ext).unwrap())
      .collect();
    self
  }

  pub fn with_es_extensions(mut self, extensions: &str) -> Self {
    self.es_extensions = Some(CString::new(extensions).unwrap());
    self
  }

  pub fn without(mut self, names: &[&'static str]) -> Self {
    self.missing.extend(names.iter().copied());
    self
  }
}

/// Backend operations observed on the current thread.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Calls {
  pub factory: usize,
  pub init: usize,
  pub create: usize,
  pub make_current: usize,
  pub swap_buffers: usize,
  pub uninit: usize,
  pub uninit_wrapped: usize,
  pub resolve: usize,
}

thread_local! {
  static DRIVER: RefCell<Driver> = RefCell::new(Driver::default());
  static CALLS: Cell<Calls> = Cell::new(Calls::default());
}

/// Install a driver for the current thread and reset the call counters.
pub fn install(driver: Driver) {
  DRIVER.with(|d| *d.borrow_mut() = driver);
  CALLS.with(|c| c.set(Calls::default()));
}

pub fn calls() -> Calls {
  CALLS.with(|c| c.get())
}

fn record(f: impl FnOnce(&mut Calls)) {
  CALLS.with(|c| {
    let mut calls = c.get();
    f(&mut calls);
    c.set(calls);
  });
}

pub fn push_error(code: u32) {
  DRIVER.with(|d| d.borrow_mut().errors.push(code));
}

/// Registry with the fake backend registered for GLX and EGL.
pub fn registry() -> BackendRegistry {
  let mut registry = BackendRegistry::new();
  registry
    .register(Platform::Glx, fake_backend)
    .register(Platform::Egl, fake_backend);
  registry
}

pub fn fake_backend() -> Option<Box<dyn Backend>> {
  record(|c| c.factory += 1);

  if DRIVER.with(|d| d.borrow().no_state) {
    None
  } else {
    Some(Box::new(FakeBackend::default()))
  }
}

pub struct FakeBackend {
  display: NativePtr,
  window: NativePtr,
  handle: NativePtr,
  shared_with: NativePtr,
}

impl Default for FakeBackend {
  fn default() -> Self {
    FakeBackend {
      display: ptr::null_mut(),
      window: ptr::null_mut(),
      handle: ptr::null_mut(),
      shared_with: ptr::null_mut(),
    }
  }
}

unsafe impl Backend for FakeBackend {
  fn init(
    &mut self,
    display: NativePtr,
    window: NativePtr,
    handle: NativePtr,
  ) -> Result<(), BackendError> {
    record(|c| c.init += 1);

    if DRIVER.with(|d| d.borrow().fail_init) {
      return Err(BackendError::new("no native context"));
    }

    self.display = display;
    self.window = window;
    self.handle = handle;
    Ok(())
  }

  fn create(&mut self, other: &dyn Backend) -> Result<(), BackendError> {
    record(|c| c.create += 1);

    if DRIVER.with(|d| d.borrow().fail_create) {
      return Err(BackendError::new("cannot share"));
    }

    self.shared_with = other.handle();
    // a new native context, distinct from the shared one
    self.handle = (other.handle() as usize + 1) as NativePtr;
    Ok(())
  }

  fn display(&self) -> NativePtr {
    self.display
  }

  fn window(&self) -> NativePtr {
    self.window
  }

  fn handle(&self) -> NativePtr {
    self.handle
  }

  fn get_proc_address(&self, name: &str) -> *const c_void {
    record(|c| c.resolve += 1);

    if DRIVER.with(|d| d.borrow().missing.contains(name)) {
      return ptr::null();
    }

    match name {
      "glGetError" => get_error as *const c_void,
      "glGetIntegerv" => get_integerv as *const c_void,
      "glGetIntegeri_v" => get_integeri_v as *const c_void,
      "glGetString" => get_string as *const c_void,
      "glGetStringi" => get_stringi as *const c_void,
      _ => noop as *const c_void,
    }
  }

  fn make_current(&mut self, _: bool) -> Result<(), BackendError> {
    record(|c| c.make_current += 1);
    Ok(())
  }

  fn swap_buffers(&mut self) {
    record(|c| c.swap_buffers += 1);
  }

  fn uninit(&mut self, wrapped: bool) {
    record(|c| {
      c.uninit += 1;

      if wrapped {
        c.uninit_wrapped += 1;
      }
    });
  }
}

extern "system" fn noop() {}

extern "system" fn get_error() -> u32 {
  DRIVER.with(|d| {
    let mut d = d.borrow_mut();

    if d.errors.is_empty() {
      0
    } else {
      d.errors.remove(0)
    }
  })
}

extern "system" fn get_integerv(pname: u32, data: *mut i32) {
  let value = DRIVER.with(|d| {
    let d = d.borrow();

    match pname {
      GL_MAJOR_VERSION => Some(d.major),
      GL_MINOR_VERSION => Some(d.minor),
      GL_NUM_EXTENSIONS => Some(d.num_extensions.unwrap_or(d.extensions.len() as i32)),
      GL_MAX_TEXTURE_IMAGE_UNITS => Some(d.max_texture_image_units),
      _ => None,
    }
  });

  if let Some(value) = value {
    unsafe { *data = value };
  }
}

extern "system" fn get_integeri_v(target: u32, index: u32, data: *mut i32) {
  let value = DRIVER.with(|d| {
    let d = d.borrow();

    match target {
      GL_MAX_COMPUTE_WORK_GROUP_COUNT => d.max_compute_work_group_counts.get(index as usize).copied(),
      _ => None,
    }
  });

  if let Some(value) = value {
    unsafe { *data = value };
  }
}

extern "system" fn get_string(name: u32) -> *const u8 {
  DRIVER.with(|d| {
    let d = d.borrow();
    let s = match name {
      GL_VERSION => d.version.as_ref(),
      GL_EXTENSIONS => d.es_extensions.as_ref(),
      _ => None,
    };

    s.map_or(ptr::null(), |s| s.as_ptr() as *const u8)
  })
}

extern "system" fn get_stringi(name: u32, index: u32) -> *const u8 {
  DRIVER.with(|d| {
    let d = d.borrow();

    match name {
      GL_EXTENSIONS => d
        .extensions
        .get(index as usize)
        .map_or(ptr::null(), |s| s.as_ptr() as *const u8),
      _ => ptr::null(),
    }
  })
}
