use super::{App, BACKGROUND, POINT_SIZE};

use pickview_render::PointUniforms;

impl App {
    /// Renders a single frame.
    pub(super) fn render(&mut self) {
        self.sync_generation();

        // Coasting continues after the drag ends; picking is only paused
        // while the button is actually held.
        if !self.left_mouse_down {
            if let Some(engine) = &mut self.engine {
                self.orbit.update(&mut engine.camera);
            }
        }

        if let Some(engine) = &self.engine {
            engine.update_camera_uniforms();
        }

        if let (Some(engine), Some(cloud)) = (&self.engine, &self.cloud) {
            #[allow(clippy::cast_precision_loss)]
            let uniforms = PointUniforms {
                viewport: [engine.width as f32, engine.height as f32],
                point_size: POINT_SIZE,
                _padding: 0.0,
            };
            cloud.update_uniforms(&engine.queue, &uniforms);
        }

        // Pick pass and hover update run before the visible pass, so the
        // frame already shows the new highlight.
        self.picking_step();

        let Some(engine) = &self.engine else {
            return;
        };
        let Some(surface) = &engine.surface else {
            return;
        };

        let frame = match surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                surface.configure(&engine.device, &engine.surface_config);
                return;
            }
            Err(err) => {
                log::warn!("dropping frame: {err}");
                return;
            }
        };

        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = engine
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        if let Some(cloud) = &self.cloud {
            engine.render_visible_pass(&mut encoder, &view, cloud, BACKGROUND);
        } else {
            // Nothing to draw, still clear the frame
            let _pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Clear Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: BACKGROUND[0],
                            g: BACKGROUND[1],
                            b: BACKGROUND[2],
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                ..Default::default()
            });
        }

        engine.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
    }
}
