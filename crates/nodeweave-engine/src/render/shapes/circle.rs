use bytemuck::{Pod, Zeroable};

use crate::render::{RenderCtx, RenderTarget};
use crate::scene::{DrawCmd, DrawList};

use super::common::{QuadBatch, QuadInstance};

/// Filled circle renderer.
///
/// Each circle is a screen-aligned quad; the fragment shader evaluates a
/// signed distance so edges are anti-aliased at any radius.
pub struct CircleRenderer {
    batch: QuadBatch<CircleInstance>,
    scratch: Vec<CircleInstance>,
}

impl Default for CircleRenderer {
    fn default() -> Self {
        Self {
            batch: QuadBatch::new("nodeweave circle", include_str!("shaders/circle.wgsl")),
            scratch: Vec::new(),
        }
    }
}

impl CircleRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders every `DrawCmd::Circle` in `draw_list` in paint order.
    ///
    /// Circles with a non-positive radius are skipped.
    pub fn render(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>, draw_list: &mut DrawList) {
        self.scratch.clear();
        self.scratch.extend(draw_list.iter_in_paint_order().filter_map(|item| {
            let DrawCmd::Circle(cmd) = &item.cmd else { return None };
            if !(cmd.radius > 0.0) {
                return None;
            }
            Some(CircleInstance {
                center: [cmd.center.x, cmd.center.y],
                radius: cmd.radius,
                color: cmd.color.to_array(),
            })
        }));

        self.batch.draw(ctx, target, &self.scratch);
    }
}

/// Instance data layout (28 bytes):
///
///  offset  0  center  [f32; 2]   loc 1
///  offset  8  radius  f32        loc 2
///  offset 12  color   [f32; 4]   loc 3
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct CircleInstance {
    center: [f32; 2],
    radius: f32,
    color: [f32; 4],
}

impl QuadInstance for CircleInstance {
    fn layout() -> wgpu::VertexBufferLayout<'static> {
        const ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
            1 => Float32x2,
            2 => Float32,
            3 => Float32x4
        ];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<CircleInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &ATTRS,
        }
    }
}
