use glutin::config::{Config, ConfigTemplateBuilder};
use glutin::context::{
    ContextApi, ContextAttributesBuilder, NotCurrentGlContextSurfaceAccessor,
    PossiblyCurrentContext, Version,
};
use glutin::display::{GetGlDisplay, GlDisplay};
use glutin::surface::{GlSurface, Surface, SurfaceAttributesBuilder, WindowSurface};

use glutin_winit::DisplayBuilder;

use raw_window_handle::HasRawWindowHandle;

use std::ffi::CString;
use std::num::NonZeroU32;
use std::time::Instant;

use thiserror::Error;

use winit::dpi::{PhysicalSize, Size};
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::{Window, WindowBuilder};

use gl_wrapper::geometry::{Geometry, GeometryBuilder, GeometryError, VertexAttribute};
use gl_wrapper::program::{Program, ProgramBuilder, ProgramError};
use gl_wrapper::renderer::GlRenderer;
use gl_wrapper::texture::{Texture2D, TextureError, TextureFilter, TextureFormats};

use crate::image::{self, ImageError};
use crate::quad;

const WINDOW_SIZE: (u32, u32) = (800, 600);

/// Image files looked up in the working directory, bound to texture
/// units 0 and 1 under the matching sampler name.
const TEXTURE_FILES: [&str; 2] = ["sample.png", "sample2.png"];
const SAMPLER_NAMES: [&str; 2] = ["texKitten", "texPuppy"];

pub struct App {
    // GPU resources come first, their delete calls need the context
    // below to still be alive
    renderer: GlRenderer,
    quad: Geometry,
    program: Program,
    textures: [Texture2D; 2],
    trans_location: i32,
    gl_context: PossiblyCurrentContext,
    gl_window: GlWindow,
    event_loop: EventLoop<()>,
}

impl App {
    pub fn new() -> Result<Self, AppError> {
        let event_loop = EventLoop::new();
        let window_builder = WindowBuilder::new()
            .with_inner_size(Size::Physical(PhysicalSize::new(
                WINDOW_SIZE.0,
                WINDOW_SIZE.1,
            )))
            .with_resizable(false)
            .with_title("OpenGL");
        let display_builder = DisplayBuilder::new().with_window_builder(Some(window_builder));
        let template = ConfigTemplateBuilder::new();

        let (window, gl_config) = display_builder
            .build(&event_loop, template, |mut configs| configs.next().unwrap())
            .unwrap();

        let window = window.unwrap();
        let handle = Some(window.raw_window_handle());
        let gl_display = gl_config.display();

        let context_attr = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
            .build(handle);

        let gl_window = GlWindow::new(window, &gl_config);

        let gl_context = unsafe {
            gl_display
                .create_context(&gl_config, &context_attr)
                .unwrap()
        }
        .make_current(&gl_window.surface)
        .unwrap();

        gl::load_with(|s| {
            gl_display
                .get_proc_address(CString::new(s).unwrap().as_c_str())
                .cast()
        });

        let quad = GeometryBuilder::new(&quad::QUAD_VERTICES)
            .with_attribute(VertexAttribute::Vec2)
            .with_attribute(VertexAttribute::Vec3)
            .with_attribute(VertexAttribute::Vec2)
            .with_indices(&quad::QUAD_INDICES)
            .build()?;

        let program = ProgramBuilder::new(
            include_str!("gl_shaders/quad.vert"),
            include_str!("gl_shaders/blend.frag"),
        )
        .build()?;

        let textures = [
            load_texture(TEXTURE_FILES[0])?,
            load_texture(TEXTURE_FILES[1])?,
        ];

        program.bind();

        for (unit, name) in SAMPLER_NAMES.into_iter().enumerate() {
            let location = program
                .uniform_location(name)
                .ok_or(AppError::MissingUniform(name))?;
            program.set_i32(location, unit as i32);
        }

        let trans_location = program
            .uniform_location("trans")
            .ok_or(AppError::MissingUniform("trans"))?;

        Ok(Self {
            renderer: GlRenderer::new(),
            quad,
            program,
            textures,
            trans_location,
            gl_context,
            gl_window,
            event_loop,
        })
    }

    pub fn run(mut self) -> ! {
        let start = Instant::now();

        self.event_loop.run(move |event, _window_target, control_flow| {
            *control_flow = ControlFlow::Poll;
            match event {
                Event::WindowEvent {
                    event: WindowEvent::CloseRequested,
                    ..
                } => {
                    control_flow.set_exit();
                }
                Event::RedrawRequested(_) => {
                    self.renderer.clear_color(0.0, 0.0, 0.0);

                    let trans = quad::rotation(start.elapsed().as_secs_f32());

                    self.program.bind();
                    self.program.set_mat4(self.trans_location, trans.as_ref());

                    for (unit, texture) in self.textures.iter().enumerate() {
                        texture.bind(unit as u8);
                    }

                    self.renderer.draw(&self.quad, &self.program);
                }
                Event::RedrawEventsCleared => {
                    self.gl_window.window.request_redraw();
                    self.gl_window
                        .surface
                        .swap_buffers(&self.gl_context)
                        .unwrap();
                }
                _ => (),
            }
        })
    }
}

fn load_texture(path: &str) -> Result<Texture2D, AppError> {
    let image = image::load_png(path)?;

    let texture = Texture2D::new(
        image.width,
        image.height,
        &image.pixels,
        TextureFormats::Rgb8,
        TextureFilter::Linear,
    )?;

    Ok(texture)
}

pub struct GlWindow {
    // XXX the surface must be dropped before the window.
    pub surface: Surface<WindowSurface>,
    pub window: Window,
}

impl GlWindow {
    pub fn new(window: Window, config: &Config) -> Self {
        let (width, height): (u32, u32) = window.inner_size().into();
        let raw_window_handle = window.raw_window_handle();
        let attrs = SurfaceAttributesBuilder::<WindowSurface>::new().build(
            raw_window_handle,
            NonZeroU32::new(width).unwrap(),
            NonZeroU32::new(height).unwrap(),
        );

        let surface = unsafe {
            config
                .display()
                .create_window_surface(config, &attrs)
                .unwrap()
        };

        Self { window, surface }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Could not upload quad geometry: {0}")]
    Geometry(#[from] GeometryError),
    #[error("Could not build shader program: {0}")]
    Program(#[from] ProgramError),
    #[error("Could not upload texture: {0}")]
    Texture(#[from] TextureError),
    #[error("Could not load texture image: {0}")]
    Image(#[from] ImageError),
    #[error("Shader program has no active uniform named {0:?}")]
    MissingUniform(&'static str),
}
