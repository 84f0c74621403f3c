//! Window, GL context and event loop shared by every step.
//!
//! [`run`] opens the window described by [`Step::window`], creates an OpenGL
//! core context on it, and then drives the step once per redraw until the
//! window is closed. The step owns all of its GL objects; the app only
//! clears, presents, and keeps the viewport in sync with the window size.

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::{Duration, Instant};

use glow::HasContext;
use glutin::config::{ConfigTemplateBuilder, GlConfig};
use glutin::context::{
    ContextApi, ContextAttributesBuilder, GlProfile, NotCurrentGlContext, PossiblyCurrentContext,
    Version,
};
use glutin::display::{GetGlDisplay, GlDisplay};
use glutin::surface::{GlSurface, Surface, SwapInterval, WindowSurface};
use glutin_winit::{DisplayBuilder, GlWindow};
use log::{error, info, warn};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::raw_window_handle::HasWindowHandle;
use winit::window::{Window, WindowId};

use crate::backend::GlowBackend;
use crate::config::{WindowConfig, DEFAULT_LOG_FILTER};
use crate::error::AppError;

/// One tutorial program.
pub trait Step: Sized {
    /// Window parameters for this step.
    fn window() -> WindowConfig;

    /// Create the step's GL objects. Called once, with the context current.
    ///
    /// # Errors
    ///
    /// Any error aborts startup.
    fn init(backend: &mut GlowBackend) -> Result<Self, AppError>;

    /// Draw one frame. The color buffer is already cleared.
    fn frame(&mut self, backend: &mut GlowBackend, elapsed: Duration);

    /// Release the step's GL objects before the context goes away.
    fn destroy(&mut self, backend: &mut GlowBackend);
}

/// Install the `env_logger` backend, honoring `RUST_LOG`.
pub fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(DEFAULT_LOG_FILTER))
        .init();
}

/// Open the window and run `S` until it is closed.
///
/// # Errors
///
/// Returns an error if the event loop, window or context cannot be created,
/// or if [`Step::init`] fails.
///
/// # Panics
///
/// Panics if glutin hands the config picker an empty list, which it does
/// not do: finding no matching config is reported as a window error.
pub fn run<S: Step>() -> Result<(), AppError> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::<S> {
        config: S::window(),
        running: None,
        error: None,
        started: Instant::now(),
    };
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

struct App<S: Step> {
    config: WindowConfig,
    running: Option<Running<S>>,
    error: Option<AppError>,
    started: Instant,
}

/// Everything that exists while the window is open.
///
/// Field order is drop order: GL objects go before the window they render to.
struct Running<S> {
    step: S,
    backend: GlowBackend,
    surface: Surface<WindowSurface>,
    context: PossiblyCurrentContext,
    window: Window,
}

impl<S: Step> App<S> {
    fn open(&self, event_loop: &ActiveEventLoop) -> Result<Running<S>, AppError> {
        let config = &self.config;
        info!("opening {}x{} window '{}'", config.width, config.height, config.title);

        let attributes = Window::default_attributes()
            .with_title(config.title)
            .with_inner_size(PhysicalSize::new(config.width, config.height));
        let (window, gl_config) = DisplayBuilder::new()
            .with_window_attributes(Some(attributes))
            .build(event_loop, ConfigTemplateBuilder::new(), |configs| {
                // glutin's `find_configs` returns an error instead of calling
                // the picker when nothing matches, so `configs` is non-empty.
                configs
                    .max_by_key(GlConfig::num_samples)
                    .expect("display offered no GL configs")
            })
            .map_err(|err| AppError::Window(err.to_string()))?;
        let window = window.ok_or_else(|| AppError::Window("no window was created".to_owned()))?;

        let raw_handle = window
            .window_handle()
            .map_err(|err| AppError::Window(err.to_string()))?
            .as_raw();
        let (major, minor) = config.gl_version;
        let context_attributes = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(major, minor))))
            .with_profile(GlProfile::Core)
            .build(Some(raw_handle));

        let display = gl_config.display();
        let surface_attributes = window
            .build_surface_attributes(glutin::surface::SurfaceAttributesBuilder::new())
            .map_err(|err| AppError::Window(err.to_string()))?;
        // SAFETY: the window outlives the surface and context (see `Running`).
        let (surface, context) = unsafe {
            let not_current = display.create_context(&gl_config, &context_attributes)?;
            let surface = display.create_window_surface(&gl_config, &surface_attributes)?;
            let context = not_current.make_current(&surface)?;
            (surface, context)
        };

        if let Err(err) =
            surface.set_swap_interval(&context, SwapInterval::Wait(NonZeroU32::MIN))
        {
            warn!("vsync unavailable: {err}");
        }

        // SAFETY: the context was just made current on this thread and stays
        // current for as long as `Running` lives.
        let mut backend = unsafe {
            let gl = glow::Context::from_loader_function_cstr(|name| display.get_proc_address(name));
            GlowBackend::new(Arc::new(gl))
        };

        let [r, g, b, a] = config.clear_color;
        // SAFETY: context is current.
        unsafe {
            backend.gl().clear_color(r, g, b, a);
            set_viewport(backend.gl(), window.inner_size());
        }

        let step = S::init(&mut backend)?;

        Ok(Running {
            step,
            backend,
            surface,
            context,
            window,
        })
    }
}

impl<S: Step> ApplicationHandler for App<S> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.running.is_some() {
            return;
        }
        match self.open(event_loop) {
            Ok(running) => {
                self.started = Instant::now();
                self.running = Some(running);
            }
            Err(err) => {
                self.error = Some(err);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(running) = self.running.as_mut() else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                running
                    .window
                    .resize_surface(&running.surface, &running.context);
                // SAFETY: context is current.
                unsafe { set_viewport(running.backend.gl(), size) };
            }
            WindowEvent::RedrawRequested => {
                // SAFETY: context is current.
                unsafe { running.backend.gl().clear(glow::COLOR_BUFFER_BIT) };
                running
                    .step
                    .frame(&mut running.backend, self.started.elapsed());
                if let Err(err) = running.surface.swap_buffers(&running.context) {
                    error!("failed to present frame: {err}");
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(running) = &self.running {
            running.window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(mut running) = self.running.take() {
            running.step.destroy(&mut running.backend);
            // SAFETY: context is still current.
            unsafe { running.backend.gl().flush() };
            info!("window closed");
        }
    }
}

/// Match the GL viewport to the framebuffer size.
///
/// # Safety
///
/// Requires a valid, current OpenGL context.
unsafe fn set_viewport(gl: &glow::Context, size: PhysicalSize<u32>) {
    let width = i32::try_from(size.width).unwrap_or(i32::MAX);
    let height = i32::try_from(size.height).unwrap_or(i32::MAX);
    unsafe { gl.viewport(0, 0, width, height) };
}
