//! Graphics context.
//!
//! A [`Context`] wraps one native GL context through its [`Backend`] and owns everything that
//! was learnt about it: the resolved [`FunctionTable`], the [`Version`], the available
//! [`Features`] and the derived [`Settings`].
//!
//! # On context and threads
//!
//! A context is `!Send` and `!Sync`: it must be used from the thread on which it is current.
//! Several contexts can coexist (for instance a main one and several shared ones); they never
//! alias each other’s state after construction.
//!
//! # Lifecycle
//!
//! 1. Construct with [`Context::new_wrapped`] (around a native context supplied by the caller)
//!    or [`Context::new_shared`] (from another context).
//! 2. Make it current and call [`Context::load`] once to resolve functions and probe
//!    capabilities.
//! 3. Tear down with [`Context::destroy`], or simply drop it.

use std::fmt;
use std::marker::PhantomData;

use crate::backend::{Backend, BackendFactory, BackendRegistry, NativePtr};
use crate::error::{ContextError, GlError};
use crate::feature::{self, Features};
use crate::function::{EntryPoint, FunctionTable, GlProc};
use crate::platform::{Api, ContextOpt, Platform};
use crate::settings::Settings;
use crate::version::{self, Version};

/// Graphics context handle.
pub struct Context {
  _a: PhantomData<*const ()>, // !Send and !Sync

  backend: Box<dyn Backend>,
  factory: BackendFactory,
  platform: Platform,
  api: Api,
  wrapped: bool,

  loaded: bool,
  version: Version,
  features: Features,
  functions: FunctionTable,
  settings: Settings,
}

impl Context {
  /// Wrap a native context supplied by the caller.
  ///
  /// The platform and API family are read from `opt` and resolved if automatic. The context
  /// doesn’t own the native context: tearing it down leaves the native context alive.
  pub fn new_wrapped(
    registry: &BackendRegistry,
    display: NativePtr,
    window: NativePtr,
    handle: NativePtr,
    opt: ContextOpt,
  ) -> Result<Self, ContextError> {
    let platform = opt.platform().resolve().map_err(|e| {
      log::error!("{}", e);
      e
    })?;
    let api = opt.api().resolve();

    let factory = registry.get(platform).ok_or_else(|| {
      log::error!("no backend registered for platform {}", platform);
      ContextError::InvalidPlatform(format!("no backend registered for {}", platform))
    })?;

    let mut ctx = Self::new(factory, platform, api, true)?;
    ctx.init(display, window, handle)?;

    Ok(ctx)
  }

  /// Create a context sharing its resources with `other`.
  ///
  /// The new context uses the platform, API family and backend of `other`, and is initialized
  /// with its display, window and handle. The backend is then asked to derive its own native
  /// context from `other` ([`Backend::create`]).
  pub fn new_shared(other: &Context) -> Result<Self, ContextError> {
    let display = other.backend.display();
    let window = other.backend.window();
    let handle = other.backend.handle();

    let mut ctx = Self::new(other.factory, other.platform, other.api, false)?;
    ctx.init(display, window, handle)?;

    if let Err(e) = ctx.backend.create(other.backend.as_ref()) {
      log::error!("could not create a shared {} context: {}", ctx.platform, e);
      return Err(ContextError::BackendInitFailed(e));
    }

    Ok(ctx)
  }

  fn new(
    factory: BackendFactory,
    platform: Platform,
    api: Api,
    wrapped: bool,
  ) -> Result<Self, ContextError> {
    let backend = factory().ok_or_else(|| {
      log::error!("could not allocate the {} backend state", platform);
      ContextError::AllocationError
    })?;

    Ok(Context {
      _a: PhantomData,
      backend,
      factory,
      platform,
      api,
      wrapped,
      loaded: false,
      version: Version::default(),
      features: Features::empty(),
      functions: FunctionTable::default(),
      settings: Settings::default(),
    })
  }

  // On failure, `self` is dropped by the caller, which uninitializes the backend.
  fn init(
    &mut self,
    display: NativePtr,
    window: NativePtr,
    handle: NativePtr,
  ) -> Result<(), ContextError> {
    self.backend.init(display, window, handle).map_err(|e| {
      log::error!("could not initialize the {} backend: {}", self.platform, e);
      ContextError::BackendInitFailed(e)
    })
  }

  /// Resolve the GL functions and probe the version, features and settings of the context.
  ///
  /// The context must be current. This is done once: calling it on an already loaded context
  /// does nothing. On failure the context stays unloaded and none of its state changes.
  pub fn load(&mut self) -> Result<(), ContextError> {
    if self.loaded {
      return Ok(());
    }

    let backend = &self.backend;
    let functions = FunctionTable::load(|name| backend.get_proc_address(name))?;
    let version = version::probe(&functions, self.api)?;
    let features = feature::probe(&functions, self.api, version);
    let settings = Settings::derive(&functions, self.api, version, features);

    self.functions = functions;
    self.version = version;
    self.features = features;
    self.settings = settings;
    self.loaded = true;

    Ok(())
  }

  /// Make the context current (or release it) on the calling thread.
  pub fn make_current(&mut self, current: bool) -> Result<(), ContextError> {
    self.backend.make_current(current).map_err(|e| {
      log::error!("could not make the context current: {}", e);
      ContextError::MakeCurrentFailed(e)
    })
  }

  /// Present the rendered frame.
  pub fn swap_buffers(&mut self) {
    self.backend.swap_buffers();
  }

  /// Check for a pending GL error.
  ///
  /// The error, if any, is logged with its symbolic name when it is a well-known one.
  pub fn check_gl_error(&self) -> Result<(), ContextError> {
    match GlError::from_code(self.functions.get_error()) {
      Some(e) => {
        log::error!("GL error: {}", e);
        Err(ContextError::GlRuntimeError(e))
      }
      None => Ok(()),
    }
  }

  /// Tear down a context.
  ///
  /// The slot is emptied, so calling this twice is harmless.
  pub fn destroy(ctx: &mut Option<Context>) {
    drop(ctx.take());
  }

  /// Resolved platform.
  pub fn platform(&self) -> Platform {
    self.platform
  }

  /// Resolved API family.
  pub fn api(&self) -> Api {
    self.api
  }

  /// Whether the native context was supplied by the caller.
  pub fn is_wrapped(&self) -> bool {
    self.wrapped
  }

  /// Whether [`Context::load`] succeeded.
  pub fn is_loaded(&self) -> bool {
    self.loaded
  }

  /// Version of the context; `0.0` until loaded.
  pub fn version(&self) -> Version {
    self.version
  }

  /// Available features; empty until loaded.
  pub fn features(&self) -> Features {
    self.features
  }

  /// Whether all the given features are available.
  pub fn has_feature(&self, features: Features) -> bool {
    self.features.contains(features)
  }

  /// Derived settings; zeroed until loaded.
  pub fn settings(&self) -> &Settings {
    &self.settings
  }

  /// Resolved functions; empty until loaded.
  pub fn functions(&self) -> &FunctionTable {
    &self.functions
  }

  /// Address of a GL function, if resolved.
  pub fn get_proc(&self, entry: EntryPoint) -> Option<GlProc> {
    self.functions.get(entry)
  }

  /// Native display.
  pub fn display(&self) -> NativePtr {
    self.backend.display()
  }

  /// Native window.
  pub fn window(&self) -> NativePtr {
    self.backend.window()
  }

  /// Native context handle.
  pub fn native_handle(&self) -> NativePtr {
    self.backend.handle()
  }

  /// Platform texture cache, if the backend has one.
  pub fn texture_cache(&self) -> NativePtr {
    self.backend.texture_cache()
  }
}

impl Drop for Context {
  fn drop(&mut self) {
    self.backend.uninit(self.wrapped);
  }
}

impl fmt::Debug for Context {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    f.debug_struct("Context")
      .field("platform", &self.platform)
      .field("api", &self.api)
      .field("wrapped", &self.wrapped)
      .field("loaded", &self.loaded)
      .field("version", &self.version)
      .field("features", &self.features)
      .field("settings", &self.settings)
      .finish()
  }
}
