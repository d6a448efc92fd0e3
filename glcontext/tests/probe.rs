mod common;

use glcontext::{
  Api, Context, ContextOpt, Features, Platform, Version, LUMINANCE, LUMINANCE_ALPHA,
};

use common::{install, registry, Driver};

const GL_RED: u32 = 0x1903;
const GL_RG: u32 = 0x8227;

fn load(api: Api) -> Context {
  let opt = ContextOpt::default()
    .set_platform(Platform::Egl)
    .set_api(api);
  let mut ctx = Context::new_wrapped(
    &registry(),
    std::ptr::null_mut(),
    std::ptr::null_mut(),
    std::ptr::null_mut(),
    opt,
  )
  .unwrap();

  ctx.load().unwrap();
  ctx
}

#[test]
fn desktop_3_0_core_features() {
  install(Driver::desktop(3, 0));
  let ctx = load(Api::OpenGL);

  assert_eq!(
    ctx.features(),
    Features::VERTEX_ARRAY_OBJECT
      | Features::TEXTURE_3D
      | Features::FRAMEBUFFER_OBJECT
      | Features::DRAW_BUFFERS
  );
}

#[test]
fn desktop_4_6_has_everything() {
  install(Driver::desktop(4, 6));
  let ctx = load(Api::OpenGL);

  assert_eq!(ctx.features(), Features::all());
  assert!(ctx.has_feature(Features::COMPUTE_SHADER | Features::SYNC));
}

#[test]
fn version_comparison_is_lexicographic() {
  // 4.0 has a minor version lower than sync’s 3.2 but is still newer
  install(Driver::desktop(4, 0));
  let ctx = load(Api::OpenGL);

  assert!(ctx.has_feature(Features::SYNC));
  assert!(ctx.has_feature(Features::INSTANCED_DRAW));
  assert!(!ctx.has_feature(Features::TEXTURE_STORAGE));
}

#[test]
fn extension_enables_feature_on_older_version() {
  install(Driver::desktop(3, 0).with_extensions(&["GL_ARB_compute_shader", "GL_ARB_sync"]));
  let ctx = load(Api::OpenGL);

  assert!(ctx.has_feature(Features::COMPUTE_SHADER));
  assert!(ctx.has_feature(Features::SYNC));
  assert!(!ctx.has_feature(Features::SHADER_STORAGE_BUFFER_OBJECT));
}

#[test]
fn bogus_extension_count_stops_at_the_first_missing_entry() {
  install(Driver {
    num_extensions: Some(i32::MAX),
    ..Driver::desktop(3, 0).with_extensions(&["GL_ARB_compute_shader"])
  });
  let ctx = load(Api::OpenGL);

  assert!(ctx.has_feature(Features::COMPUTE_SHADER));
  assert!(!ctx.has_feature(Features::SYNC));
}

#[test]
fn every_listed_extension_is_required() {
  install(Driver::desktop(3, 0).with_extensions(&["GL_ARB_draw_instanced"]));
  let ctx = load(Api::OpenGL);
  assert!(!ctx.has_feature(Features::INSTANCED_DRAW));

  install(
    Driver::desktop(3, 0).with_extensions(&["GL_ARB_draw_instanced", "GL_ARB_instanced_arrays"]),
  );
  let ctx = load(Api::OpenGL);
  assert!(ctx.has_feature(Features::INSTANCED_DRAW));
}

#[test]
fn extension_without_functions_is_not_enough() {
  install(
    Driver::desktop(3, 0)
      .with_extensions(&["GL_ARB_compute_shader"])
      .without(&["glMemoryBarrier"]),
  );
  let ctx = load(Api::OpenGL);

  assert!(!ctx.has_feature(Features::COMPUTE_SHADER));
}

#[test]
fn version_without_functions_is_not_enough() {
  install(Driver::desktop(4, 6).without(&["glBindBufferBase"]));
  let ctx = load(Api::OpenGL);

  assert!(!ctx.has_feature(Features::SHADER_STORAGE_BUFFER_OBJECT));
  assert!(!ctx.has_feature(Features::UNIFORM_BUFFER_OBJECT));
  assert_eq!(
    ctx.features(),
    Features::all() - Features::SHADER_STORAGE_BUFFER_OBJECT - Features::UNIFORM_BUFFER_OBJECT
  );
}

#[test]
fn embedded_2_0() {
  install(
    Driver::embedded("OpenGL ES 2.0")
      .with_es_extensions("GL_EXT_texture_format_BGRA8888 GL_OES_vertex_array_object"),
  );
  let ctx = load(Api::OpenGLES);

  assert_eq!(ctx.version(), Version::new(2, 0));
  assert_eq!(ctx.features(), Features::VERTEX_ARRAY_OBJECT);

  let settings = ctx.settings();
  assert_eq!(settings.format_1comp, LUMINANCE);
  assert_eq!(settings.format_2comp, LUMINANCE_ALPHA);
  assert_eq!(settings.max_texture_image_units, 16);
  assert_eq!(settings.max_compute_work_group_counts, [0, 0, 0]);
}

#[test]
fn embedded_extension_must_match_a_whole_token() {
  install(Driver::embedded("OpenGL ES 2.0").with_es_extensions("GL_OES_vertex_array_objectX"));
  let ctx = load(Api::OpenGLES);

  assert!(ctx.features().is_empty());
}

#[test]
fn embedded_3_0() {
  install(Driver::embedded("OpenGL ES 3.0 V@415.0"));
  let ctx = load(Api::OpenGLES);

  assert_eq!(
    ctx.features(),
    Features::all()
      - Features::TEXTURE_STORAGE
      - Features::COMPUTE_SHADER
      - Features::PROGRAM_INTERFACE_QUERY
      - Features::SHADER_IMAGE_LOAD_STORE
      - Features::SHADER_STORAGE_BUFFER_OBJECT
  );

  let settings = ctx.settings();
  assert_eq!(settings.format_1comp, GL_RED);
  assert_eq!(settings.format_2comp, GL_RG);
  assert_eq!(settings.max_compute_work_group_counts, [0, 0, 0]);
}

#[test]
fn embedded_3_1_compute_limits() {
  install(Driver::embedded("OpenGL ES 3.1"));
  let ctx = load(Api::OpenGLES);

  assert_eq!(ctx.features(), Features::all());
  assert_eq!(ctx.settings().max_compute_work_group_counts, [1024, 512, 64]);
}

#[test]
fn desktop_settings() {
  install(Driver::desktop(4, 3));
  let ctx = load(Api::OpenGL);

  let settings = ctx.settings();
  assert_eq!(settings.format_1comp, GL_RED);
  assert_eq!(settings.format_2comp, GL_RG);
  assert_eq!(settings.max_texture_image_units, 32);
  assert_eq!(settings.max_compute_work_group_counts, [65535, 65535, 65535]);
}

#[test]
fn feature_names() {
  install(Driver::desktop(3, 0));
  let ctx = load(Api::OpenGL);

  assert_eq!(
    ctx.features().to_string(),
    "vertex_array_object texture3d framebuffer_object draw_buffers"
  );
}
