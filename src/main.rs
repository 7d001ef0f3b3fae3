// Hide console window on Windows
#![cfg_attr(target_os = "windows", windows_subsystem = "windows")]

use std::rc::Rc;

use anyhow::Context;
use log::{error, info, warn};
use papercut::config::Settings;
use papercut::debug_println;
use papercut::ui::{theme, CanvasApp};

use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

struct App {
    settings: Settings,
    window: Option<Rc<Window>>,
    canvas_app: Option<CanvasApp>,
}

impl App {
    fn redraw_if(&self, needed: bool) {
        if needed {
            if let Some(window) = &self.window {
                window.request_redraw();
            }
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        // Fit the default window inside the primary monitor, keeping the page shape
        let (mut width, mut height) = (theme::WINDOW_WIDTH, theme::WINDOW_HEIGHT);
        if let Some(monitor) = event_loop
            .primary_monitor()
            .or_else(|| event_loop.available_monitors().next())
        {
            let screen = monitor.size();
            let limit = screen.height * 9 / 10;
            if height > limit {
                width = width * limit / height;
                height = limit;
            }
        }

        let attributes = Window::default_attributes()
            .with_title(theme::WINDOW_TITLE)
            .with_inner_size(winit::dpi::PhysicalSize::new(width, height));

        let window = match event_loop.create_window(attributes) {
            Ok(window) => Rc::new(window),
            Err(e) => {
                error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        match CanvasApp::new(window.clone(), &self.settings) {
            Ok(app) => {
                self.canvas_app = Some(app);
                window.request_redraw();
                self.window = Some(window);
            }
            Err(e) => {
                error!("Failed to create renderer: {}", e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(app) = &mut self.canvas_app else {
            return;
        };
        let redraw = match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
                false
            }
            WindowEvent::Resized(size) => {
                app.resize(size);
                true
            }
            WindowEvent::RedrawRequested => {
                if let Err(e) = app.render() {
                    warn!("Present failed: {}", e);
                }
                false
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                app.update_modifiers(modifiers.state());
                false
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state.is_pressed() {
                    debug_println!("Key pressed: {:?}", event.logical_key);
                }
                app.handle_keyboard(event)
            }
            WindowEvent::MouseInput { state, button, .. } => app.handle_mouse_click(state, button),
            WindowEvent::CursorMoved { position, .. } => app.handle_mouse_move(position),
            WindowEvent::CursorLeft { .. } => {
                app.handle_cursor_left();
                false
            }
            WindowEvent::MouseWheel { delta, .. } => app.handle_mouse_wheel(delta),
            WindowEvent::PinchGesture { delta, .. } => app.handle_pinch_gesture(delta),
            WindowEvent::RotationGesture { delta, phase, .. } => {
                app.handle_rotation_gesture(delta, phase)
            }
            WindowEvent::HoveredFile(_) => app.handle_file_hover(),
            WindowEvent::HoveredFileCancelled => app.handle_file_hover_cancelled(),
            WindowEvent::DroppedFile(path) => {
                match app.handle_dropped_file(&path) {
                    Ok(Some(id)) => info!("Placed {} from {}", id, path.display()),
                    Ok(None) => {}
                    Err(e) => warn!("Rejected drop {}: {}", path.display(), e),
                }
                true
            }
            _ => false,
        };
        self.redraw_if(redraw);
    }
}

fn main() -> anyhow::Result<()> {
    papercut::init_logging();

    let settings = Settings::from_env().context("Invalid environment settings")?;
    info!("Starting with {:?}", settings);

    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    // One full redraw per state change; nothing animates
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App {
        settings,
        window: None,
        canvas_app: None,
    };
    event_loop.run_app(&mut app).context("Event loop failed")?;
    Ok(())
}
