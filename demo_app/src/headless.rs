//! Renderer that logs frames instead of drawing them

use scene_engine::foundation::math::matrix_translation;
use scene_engine::render::{Camera, FramePacket, LightUniform, RenderError, Renderer};
use scene_engine::scene::Scene;

/// Summary of the last frame a [`LogRenderer`] saw
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameSummary {
    /// Opaque draw items
    pub opaque: usize,
    /// Transparent draw items
    pub transparent: usize,
    /// Lights
    pub lights: usize,
    /// Lights with a shadow camera
    pub shadow_casters: usize,
    /// Whether fog was enabled
    pub fog: bool,
    /// Bytes of light data staged for upload
    pub light_bytes: usize,
}

/// Extracts a [`FramePacket`] per frame and logs what a backend would draw
#[derive(Debug)]
pub struct LogRenderer {
    frames: u64,
    log_every: u64,
    last: FrameSummary,
    light_staging: Vec<u8>,
}

impl LogRenderer {
    /// Log a summary every `log_every` frames (at least every frame)
    pub fn new(log_every: u64) -> Self {
        Self {
            frames: 0,
            log_every: log_every.max(1),
            last: FrameSummary::default(),
            light_staging: Vec::new(),
        }
    }

    /// Frames rendered so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Contents of the most recent frame
    pub fn last_frame(&self) -> FrameSummary {
        self.last
    }
}

impl Renderer for LogRenderer {
    fn render(&mut self, scene: &Scene, camera: &Camera) -> Result<(), RenderError> {
        let packet = FramePacket::extract(scene, camera);
        let uniforms = packet.light_uniforms();
        self.light_staging.clear();
        self.light_staging.extend_from_slice(LightUniform::as_bytes(&uniforms));
        self.last = FrameSummary {
            opaque: packet.opaque().len(),
            transparent: packet.transparent().len(),
            lights: packet.lights().len(),
            shadow_casters: packet.shadow_casters().count(),
            fog: packet.fog.is_some(),
            light_bytes: self.light_staging.len(),
        };

        if self.frames % self.log_every == 0 {
            log::info!(
                "Frame {}: {} opaque, {} transparent, {} lights ({} shadowed, {} bytes), eye at {:.2?}",
                self.frames,
                self.last.opaque,
                self.last.transparent,
                self.last.lights,
                self.last.shadow_casters,
                self.last.light_bytes,
                packet.eye.as_slice()
            );
            for item in packet.opaque().iter().chain(packet.transparent()) {
                log::debug!(
                    "  {} at {:.2?} depth {:.2}",
                    item.geometry.kind_name(),
                    matrix_translation(&item.world).as_slice(),
                    item.depth
                );
            }
        }

        self.frames += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenes::lit_scene;
    use scene_engine::config::EngineSettings;

    #[test]
    fn test_lit_frame_stages_light_blocks() {
        let (stage, _) = lit_scene(&EngineSettings::default()).unwrap();
        let mut renderer = LogRenderer::new(10);
        renderer.render(&stage.scene, &stage.camera).unwrap();

        let frame = renderer.last_frame();
        assert_eq!(frame.lights, 2);
        assert_eq!(frame.shadow_casters, 1);
        assert_eq!(frame.light_bytes, 2 * std::mem::size_of::<LightUniform>());
        assert_eq!(renderer.frames(), 1);
    }
}
