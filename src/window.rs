use std::{num::NonZeroU32, rc::Rc};

use anyhow::{anyhow, Context, Result};
use log::{debug, error, info};
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{Key, NamedKey},
    window::{Window, WindowId},
};

/// Something that draws into the window's pixel buffer.
pub trait AppLoop {
    /// Called with the window's inner size in physical pixels before every draw.
    fn resize(&mut self, width: u32, height: u32) -> Result<()>;

    /// Fills `frame` with `0RGB` pixels, row by row.
    fn draw(&mut self, frame: &mut [u32]);
}

pub struct App {
    title: String,
    size: (u32, u32),
}

impl App {
    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.size = (width, height);
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    /// Opens the window and blocks until it's closed or Escape is pressed.
    pub fn run<T: AppLoop>(self, app_loop: T) -> Result<()> {
        let event_loop = EventLoop::new().context("couldn't create the event loop")?;
        event_loop.set_control_flow(ControlFlow::Wait);

        let mut runner = Runner {
            app: self,
            app_loop,
            viewport: None,
            error: None,
        };
        event_loop
            .run_app(&mut runner)
            .context("event loop exited with an error")?;

        runner.error.map_or(Ok(()), Err)
    }
}

pub fn make_window() -> App {
    App {
        title: "shelter".into(),
        size: (800, 600),
    }
}

struct Viewport {
    window: Rc<Window>,
    surface: softbuffer::Surface<Rc<Window>, Rc<Window>>,
    _context: softbuffer::Context<Rc<Window>>,
}

struct Runner<T> {
    app: App,
    app_loop: T,
    viewport: Option<Viewport>,
    error: Option<anyhow::Error>,
}

fn softbuffer_error(err: softbuffer::SoftBufferError) -> anyhow::Error {
    anyhow!("softbuffer: {}", err)
}

impl<T: AppLoop> Runner<T> {
    fn create_viewport(&self, event_loop: &ActiveEventLoop) -> Result<Viewport> {
        let (width, height) = self.app.size;
        let attrs = Window::default_attributes()
            .with_title(self.app.title.clone())
            .with_inner_size(LogicalSize::new(width, height));
        let window = Rc::new(
            event_loop
                .create_window(attrs)
                .context("couldn't create the window")?,
        );

        let context = softbuffer::Context::new(window.clone()).map_err(softbuffer_error)?;
        let surface =
            softbuffer::Surface::new(&context, window.clone()).map_err(softbuffer_error)?;

        Ok(Viewport {
            window,
            surface,
            _context: context,
        })
    }

    fn redraw(&mut self) -> Result<()> {
        let Some(viewport) = self.viewport.as_mut() else {
            return Ok(());
        };

        let size = viewport.window.inner_size();
        let width = NonZeroU32::new(size.width);
        let height = NonZeroU32::new(size.height);
        let (Some(width), Some(height)) = (width, height) else {
            // minimized, nothing to draw on
            return Ok(());
        };

        viewport
            .surface
            .resize(width, height)
            .map_err(softbuffer_error)?;
        self.app_loop.resize(size.width, size.height)?;

        let mut buffer = viewport.surface.buffer_mut().map_err(softbuffer_error)?;
        self.app_loop.draw(&mut buffer);
        buffer.present().map_err(softbuffer_error)?;
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        error!("{:#}", err);
        self.error = Some(err);
        event_loop.exit();
    }
}

impl<T: AppLoop> ApplicationHandler for Runner<T> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.viewport.is_some() {
            return;
        }

        match self.create_viewport(event_loop) {
            Ok(viewport) => {
                info!("opened window '{}'", self.app.title);
                viewport.window.request_redraw();
                self.viewport = Some(viewport);
            }
            Err(err) => self.fail(event_loop, err),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key: Key::Named(NamedKey::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => event_loop.exit(),
            WindowEvent::Resized(size) => {
                debug!("resized {:?}", size);
                if let Some(viewport) = &self.viewport {
                    viewport.window.request_redraw();
                }
            }
            WindowEvent::RedrawRequested => {
                if let Err(err) = self.redraw() {
                    self.fail(event_loop, err);
                }
            }
            _ => {}
        }
    }
}
