//! Demo host application: drives the canonical frame loop (clear, bind the
//! camera, render every mesh, present) in a winit window, copying the
//! framebuffer out through softbuffer.

use std::{num::NonZeroU32, rc::Rc};

use log::info;
use softbuffer::{Context as SurfaceContext, Surface};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use crate::{
    maths::{AffineMatrix, Vec2f, Vec3f},
    rasterizer::Context,
    scene::{Camera, PolygonBuffer, mesh_library},
};

struct Graphics {
    window: Rc<Window>,
    surface: Surface<Rc<Window>, Rc<Window>>,
}

impl Graphics {
    fn new(event_loop: &ActiveEventLoop) -> Self {
        let window = Rc::new(
            event_loop
                .create_window(Window::default_attributes())
                .expect("Failed to create a window"),
        );
        let context =
            SurfaceContext::new(window.clone()).expect("Failed to create a softbuffer context");
        let surface =
            Surface::new(&context, window.clone()).expect("Failed to create a softbuffer surface");
        Graphics { window, surface }
    }
}

pub struct App {
    graphics: Option<Graphics>,
    context: Context<u32>,
    pyramid: PolygonBuffer<u32>,
    floor: PolygonBuffer<u32>,
    camera: Camera,
    angle: f32,
}

impl App {
    const MOVE_STEP: f32 = 0.25;
    const SPIN_STEP: f32 = 0.01;
    const NEAR: f32 = 1.;
    const FAR: f32 = 100.;
    const FOV: f32 = 90.;

    pub fn run() {
        let event_loop = EventLoop::new().expect("Failed to create the event loop");
        // Poll: render continuously, like a game.
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = App::default();
        event_loop.run_app(&mut app).expect("Event loop failed");
    }

    fn reproject(&mut self, size: PhysicalSize<u32>) {
        let viewport = Vec2f::new(size.width as f32, size.height as f32);
        if let Err(err) = self
            .context
            .set_perspective(viewport, Self::NEAR, Self::FAR, Self::FOV)
        {
            // Window shrunk below the pipeline minimum; keep the previous
            // projection and let presentation crop.
            info!("keeping previous viewport: {err}");
        }
    }
}

impl Default for App {
    fn default() -> Self {
        let mut pyramid = PolygonBuffer::new();
        let speckle = pyramid.add_texture(mesh_library::noise(32, 0x0000_ffff));
        mesh_library::pyramid(&mut pyramid, speckle, Vec3f::new(0., -1., 0.), 2., 3.);

        let mut floor = PolygonBuffer::new();
        let checker =
            floor.add_texture(mesh_library::checkerboard(64, 8, 0xff20_5080, 0xffd0_d0d0));
        mesh_library::floor(&mut floor, checker, -1., 12.);

        App {
            graphics: None,
            context: Context::new(),
            pyramid,
            floor,
            camera: Camera::new(
                Vec3f::new(0., 2., -10.),
                Vec3f::new(0., 0., 1.),
                Vec3f::new(0., 1., 0.),
            ),
            angle: 0.,
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let graphics = Graphics::new(event_loop);
        self.reproject(graphics.window.inner_size());
        self.graphics = Some(graphics);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => self.reproject(size),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                let right = self.camera.up.cross(self.camera.dir);
                match key {
                    KeyCode::Escape => event_loop.exit(),
                    KeyCode::KeyW => self.camera.eye += self.camera.dir * Self::MOVE_STEP,
                    KeyCode::KeyS => self.camera.eye -= self.camera.dir * Self::MOVE_STEP,
                    KeyCode::KeyA => self.camera.eye -= right * Self::MOVE_STEP,
                    KeyCode::KeyD => self.camera.eye += right * Self::MOVE_STEP,
                    KeyCode::Space => self.camera.eye += self.camera.up * Self::MOVE_STEP,
                    KeyCode::ShiftLeft => self.camera.eye -= self.camera.up * Self::MOVE_STEP,
                    _ => (),
                }
            }
            WindowEvent::RedrawRequested => {
                self.angle += Self::SPIN_STEP;

                self.context.clear();
                self.context.look_at(&self.camera);
                let spin = AffineMatrix::rotation_y(self.angle);
                self.context.render(&mut self.pyramid, Some(&spin));
                self.context.render(&mut self.floor, None);

                let gfx = self.graphics.as_mut().unwrap();
                let size = gfx.window.inner_size();
                let (Some(width), Some(height)) =
                    (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
                else {
                    return;
                };

                gfx.surface
                    .resize(width, height)
                    .expect("Failed to resize the softbuffer surface");
                let mut buffer = gfx
                    .surface
                    .buffer_mut()
                    .expect("Failed to get the softbuffer buffer");

                if let Some(frame) = self.context.framebuffer() {
                    // The window and the rendered viewport can disagree for
                    // a frame around resizes; copy the overlap row by row.
                    let copy_w = frame.width().min(size.width as usize);
                    for y in 0..frame.height().min(size.height as usize) {
                        let base = y * size.width as usize;
                        buffer[base..base + copy_w].copy_from_slice(&frame.row(y)[..copy_w]);
                    }
                }

                buffer
                    .present()
                    .expect("Failed to present the softbuffer buffer");

                gfx.window.request_redraw();
            }
            _ => (),
        }
    }
}
