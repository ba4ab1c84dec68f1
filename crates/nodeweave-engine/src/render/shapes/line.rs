use bytemuck::{Pod, Zeroable};

use crate::render::{RenderCtx, RenderTarget};
use crate::scene::{DrawCmd, DrawList};

use super::common::{QuadBatch, QuadInstance};

/// Line segment renderer.
///
/// The vertex shader stretches the unit quad along `to - from` and extrudes it
/// by `width` along the segment normal.
pub struct LineRenderer {
    batch: QuadBatch<LineInstance>,
    scratch: Vec<LineInstance>,
}

impl Default for LineRenderer {
    fn default() -> Self {
        Self {
            batch: QuadBatch::new("nodeweave line", include_str!("shaders/line.wgsl")),
            scratch: Vec::new(),
        }
    }
}

impl LineRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders every `DrawCmd::Line` in `draw_list` in paint order.
    ///
    /// Zero-length segments and non-positive widths are skipped.
    pub fn render(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>, draw_list: &mut DrawList) {
        self.scratch.clear();
        self.scratch.extend(draw_list.iter_in_paint_order().filter_map(|item| {
            let DrawCmd::Line(cmd) = &item.cmd else { return None };
            if cmd.from.distance(cmd.to) <= f32::EPSILON || !(cmd.width > 0.0) {
                return None;
            }
            Some(LineInstance {
                from: [cmd.from.x, cmd.from.y],
                to: [cmd.to.x, cmd.to.y],
                color: cmd.color.to_array(),
                width: cmd.width,
                _pad: [0.0; 3],
            })
        }));

        self.batch.draw(ctx, target, &self.scratch);
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct LineInstance {
    from: [f32; 2],
    to: [f32; 2],
    color: [f32; 4],
    width: f32,
    _pad: [f32; 3],
}

impl QuadInstance for LineInstance {
    fn layout() -> wgpu::VertexBufferLayout<'static> {
        const ATTRS: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
            1 => Float32x2, // from
            2 => Float32x2, // to
            3 => Float32x4, // color
            4 => Float32    // width
        ];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<LineInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &ATTRS,
        }
    }
}
