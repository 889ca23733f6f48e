use super::{App, FrameInput, PointCloudRenderData};

impl App {
    /// Rebuilds GPU resources when the data generation changes.
    ///
    /// The whole per-generation bundle (positions, visible colors, picking
    /// colors) is replaced in one step; nothing from the old generation is
    /// patched or reused.
    pub(super) fn sync_generation(&mut self) {
        let Some(engine) = self.engine.as_ref() else {
            return;
        };
        let generation = self.store.generation();
        if self
            .cloud
            .as_ref()
            .is_some_and(|c| c.generation == generation)
        {
            return;
        }

        self.colors.rebuild(self.store.len());
        match PointCloudRenderData::new(
            &engine.device,
            engine.point_bind_group_layout(),
            engine.camera_buffer(),
            self.store.points(),
            self.colors.data(),
            generation,
        ) {
            Ok(cloud) => {
                self.cloud = Some(cloud);
                // Creation already uploaded the rebuilt colors; without this
                // the still-set flag would schedule a second identical upload.
                self.colors.take_dirty();
            }
            Err(err) => {
                log::error!("failed to build point cloud GPU data: {err}");
                self.cloud = None;
            }
        }
    }

    /// Runs one frame of hover picking.
    ///
    /// The driver decides whether the pick pass runs at all; while the
    /// camera is being dragged the closure is never invoked and no GPU work
    /// happens. Color uploads go out only when the hover state actually
    /// changed something.
    pub(super) fn picking_step(&mut self) {
        let (Some(engine), Some(cloud)) = (self.engine.as_ref(), self.cloud.as_ref()) else {
            return;
        };

        let input = FrameInput {
            cursor: self.cursor,
            viewport: (engine.width, engine.height),
            dragging: self.is_dragging(),
            generation: self.store.generation(),
        };

        self.driver
            .step(&input, self.store.len(), &mut self.colors, |x, y| {
                let mut encoder =
                    engine
                        .device
                        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                            label: Some("Pick Pass Encoder"),
                        });
                engine.render_pick_pass(&mut encoder, cloud);
                engine.queue.submit(std::iter::once(encoder.finish()));
                engine.pick_at(x, y)
            });

        if self.colors.take_dirty() {
            cloud.update_visible_colors(&engine.queue, self.colors.data());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::App;
    use pickview_render::RenderEngine;
    use pollster::FutureExt;

    fn headless_app() -> Option<App> {
        let engine = match RenderEngine::new_headless(800, 600).block_on() {
            Ok(engine) => engine,
            Err(err) => {
                eprintln!("Skipping headless test: no GPU adapter available ({err})");
                return None;
            }
        };
        let mut app = App::new();
        app.engine = Some(engine);
        Some(app)
    }

    #[test]
    fn test_generation_sync_uploads_colors_exactly_once() {
        let Some(mut app) = headless_app() else {
            return;
        };

        app.sync_generation();
        assert!(app.cloud.is_some());
        assert!(
            !app.colors.take_dirty(),
            "buffer creation consumed the rebuilt colors; no second upload"
        );

        app.regenerate_points();
        app.sync_generation();
        let generation = app.generation();
        assert_eq!(app.cloud.as_ref().map(|c| c.generation), Some(generation));
        assert!(!app.colors.take_dirty());
    }
}
