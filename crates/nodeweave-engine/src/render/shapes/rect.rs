use bytemuck::{Pod, Zeroable};

use crate::render::{RenderCtx, RenderTarget};
use crate::scene::{DrawCmd, DrawList};

use super::common::{QuadBatch, QuadInstance};

/// Solid rectangle renderer.
///
/// Geometry is provided as logical pixels, converted to NDC in the vertex shader using viewport.
/// Color is expected to be linear premultiplied RGBA (`paint::Color`).
pub struct RectRenderer {
    batch: QuadBatch<RectInstance>,
    scratch: Vec<RectInstance>,
}

impl Default for RectRenderer {
    fn default() -> Self {
        Self {
            batch: QuadBatch::new("nodeweave rect", include_str!("shaders/rect.wgsl")),
            scratch: Vec::new(),
        }
    }
}

impl RectRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders every `DrawCmd::Rect` in `draw_list` in paint order.
    pub fn render(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>, draw_list: &mut DrawList) {
        self.scratch.clear();
        self.scratch.extend(draw_list.iter_in_paint_order().filter_map(|item| {
            let DrawCmd::Rect(cmd) = &item.cmd else { return None };
            let r = cmd.rect.normalized();
            (!r.is_empty()).then(|| RectInstance {
                origin: [r.origin.x, r.origin.y],
                size: [r.size.x, r.size.y],
                color: cmd.color.to_array(),
            })
        }));

        self.batch.draw(ctx, target, &self.scratch);
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct RectInstance {
    origin: [f32; 2],
    size: [f32; 2],
    color: [f32; 4],
}

impl QuadInstance for RectInstance {
    fn layout() -> wgpu::VertexBufferLayout<'static> {
        const ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
            1 => Float32x2, // origin
            2 => Float32x2, // size
            3 => Float32x4  // color
        ];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<RectInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &ATTRS,
        }
    }
}
