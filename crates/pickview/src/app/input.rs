use super::{
    ActiveEventLoop, App, ApplicationHandler, Arc, ElementState, FutureExt, KeyCode, LogicalSize,
    MouseButton, MouseScrollDelta, PhysicalKey, RenderEngine, Vec2, Window, WindowEvent, WindowId,
};

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attributes = Window::default_attributes()
            .with_title("pickview")
            .with_inner_size(LogicalSize::new(1280, 720));

        let window = Arc::new(
            event_loop
                .create_window(window_attributes)
                .expect("failed to create window"),
        );

        let engine = RenderEngine::new_windowed(window.clone())
            .block_on()
            .expect("failed to create render engine");

        self.window = Some(window);
        self.engine = Some(engine);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                self.close_requested = true;
            }
            WindowEvent::Resized(size) => {
                if let Some(engine) = &mut self.engine {
                    engine.resize(size.width, size.height);
                }
            }
            WindowEvent::RedrawRequested => {
                self.render();
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                let delta_x = position.x - self.mouse_pos.0;
                let delta_y = position.y - self.mouse_pos.1;
                self.mouse_pos = (position.x, position.y);

                if self.left_mouse_down {
                    self.drag_distance += delta_x.abs() + delta_y.abs();
                }

                // Normalized cursor in [-1, 1], y up; retained while
                // dragging so the release frame evaluates immediately.
                if let Some(window) = &self.window {
                    let size = window.inner_size();
                    if size.width > 0 && size.height > 0 {
                        #[allow(clippy::cast_possible_truncation)]
                        let nx = ((position.x / f64::from(size.width)) * 2.0 - 1.0) as f32;
                        #[allow(clippy::cast_possible_truncation)]
                        let ny = (-((position.y / f64::from(size.height)) * 2.0 - 1.0)) as f32;
                        self.cursor = Some(Vec2::new(nx, ny));
                    }
                }

                if self.left_mouse_down {
                    if let Some(engine) = &mut self.engine {
                        #[allow(clippy::cast_possible_truncation)]
                        self.orbit
                            .rotate(&mut engine.camera, delta_x as f32, delta_y as f32);
                    }
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if let MouseButton::Left = button {
                    match state {
                        ElementState::Pressed => {
                            self.left_mouse_down = true;
                            self.drag_distance = 0.0;
                            self.orbit.halt();
                        }
                        ElementState::Released => {
                            self.left_mouse_down = false;
                        }
                    }
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let amount = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y * 0.5,
                    #[allow(clippy::cast_possible_truncation)]
                    MouseScrollDelta::PixelDelta(pos) => (pos.y * 0.01) as f32,
                };
                if let Some(engine) = &mut self.engine {
                    engine.camera.zoom(amount);
                }
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed {
                    match event.physical_key {
                        PhysicalKey::Code(KeyCode::Space) => {
                            self.regenerate_points();
                        }
                        PhysicalKey::Code(KeyCode::Escape) => {
                            self.close_requested = true;
                        }
                        _ => {}
                    }
                }
            }
            _ => {}
        }

        if self.close_requested {
            event_loop.exit();
        }
    }
}
