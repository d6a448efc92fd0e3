//! This program wraps the context of a GLFW window and prints what was learnt about it: version,
//! available features and derived settings.

use glcontext::{init_logging, ContextOpt, EntryPoint, LoggingConfig};
use glcontext_glfw::{GlfwSurface, GlfwSurfaceError};
use glfw::{Context as _, WindowMode};

fn main() {
  init_logging(LoggingConfig::default());

  let surface = GlfwSurface::new(ContextOpt::default(), |glfw| {
    glfw.window_hint(glfw::WindowHint::Visible(false));
    glfw
      .create_window(960, 540, "glcontext query-info", WindowMode::Windowed)
      .ok_or(GlfwSurfaceError::UserError("cannot create the window"))
  })
  .expect("GLFW surface creation");

  let ctx = &surface.context;
  let settings = ctx.settings();

  println!("Platform: {}", ctx.platform());
  println!("API: {} {}", ctx.api(), ctx.version());
  println!("Features: {}", ctx.features());
  println!(
    "Resolved entry points: {}/{}",
    ctx.functions().resolved_count(),
    EntryPoint::COUNT
  );
  println!(
    "Component formats: {:#06x} {:#06x}",
    settings.format_1comp, settings.format_2comp
  );
  println!(
    "Maximum texture image units: {}",
    settings.max_texture_image_units
  );
  println!(
    "Maximum compute work group counts: {:?}",
    settings.max_compute_work_group_counts
  );
  println!("Window size: {:?}", surface.window.get_framebuffer_size());
  println!("Window is current: {}", surface.window.is_current());
}
