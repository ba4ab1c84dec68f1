use std::collections::HashMap;

use bytemuck::{Pod, Zeroable};
use fontdue::layout::{CoordinateSystem, GlyphRasterConfig, Layout, LayoutSettings, TextStyle};

use crate::render::{RenderCtx, RenderTarget};
use crate::scene::{DrawCmd, DrawList, shapes::TextCmd};
use crate::text::FontSystem;

use super::common::{
    create_instanced_pipeline, create_viewport_ubo, viewport_bgl_entry, InstanceBuffer, QuadBuffers,
    QuadInstance, ViewportUniform,
};

const LABEL: &str = "nodeweave text";

// ── atlas packing ─────────────────────────────────────────────────────────

const ATLAS_SIZE: u32 = 2048;
const GLYPH_PADDING: u32 = 1; // pixels between glyphs in the atlas

/// Zoom produces arbitrary font sizes; snapping keeps the glyph cache bounded.
const SIZE_QUANTUM: f32 = 0.5;

fn quantize_size(size: f32) -> f32 {
    ((size / SIZE_QUANTUM).round() * SIZE_QUANTUM).max(SIZE_QUANTUM)
}

/// Largest size glyphs are rasterized at. Bigger text stretches these
/// bitmaps, so deep zoom cannot exhaust the atlas.
const MAX_RASTER_PX: f32 = 96.0;

/// Atlas key for a laid-out glyph: same glyph and font, size capped.
fn raster_key(key: GlyphRasterConfig) -> GlyphRasterConfig {
    GlyphRasterConfig { px: key.px.min(MAX_RASTER_PX), ..key }
}

/// Shelf allocator over a square atlas.
#[derive(Debug)]
struct ShelfPacker {
    size: u32,
    cursor_x: u32,
    cursor_y: u32,
    row_height: u32,
}

impl ShelfPacker {
    fn new(size: u32) -> Self {
        Self { size, cursor_x: GLYPH_PADDING, cursor_y: GLYPH_PADDING, row_height: 0 }
    }

    fn reset(&mut self) {
        *self = Self::new(self.size);
    }

    /// Reserves a `w x h` cell; `None` when the atlas has no room left.
    fn allocate(&mut self, w: u32, h: u32) -> Option<(u32, u32)> {
        if w + 2 * GLYPH_PADDING > self.size {
            return None;
        }

        if self.cursor_x + w + GLYPH_PADDING > self.size {
            self.cursor_y += self.row_height + GLYPH_PADDING;
            self.cursor_x = GLYPH_PADDING;
            self.row_height = 0;
        }

        if self.cursor_y + h + GLYPH_PADDING > self.size {
            return None;
        }

        let pos = (self.cursor_x, self.cursor_y);
        self.cursor_x += w + GLYPH_PADDING;
        self.row_height = self.row_height.max(h);
        Some(pos)
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
struct CachedGlyph {
    uv_min: [f32; 2],
    uv_max: [f32; 2],
}

/// CPU side of the glyph atlas: cell allocation plus the UV cache.
#[derive(Debug)]
struct GlyphAtlas {
    packer: ShelfPacker,
    cache: HashMap<GlyphRasterConfig, CachedGlyph>,
}

impl GlyphAtlas {
    fn new() -> Self {
        Self { packer: ShelfPacker::new(ATLAS_SIZE), cache: HashMap::new() }
    }

    fn clear(&mut self) {
        self.packer.reset();
        self.cache.clear();
    }

    fn get(&self, key: &GlyphRasterConfig) -> Option<CachedGlyph> {
        self.cache.get(key).copied()
    }

    /// Reserves a `w x h` cell for `key` and caches its UVs. Returns the
    /// texel origin to upload the bitmap to, or `None` when it does not fit.
    fn reserve(&mut self, key: GlyphRasterConfig, w: u32, h: u32) -> Option<(u32, u32)> {
        let (gx, gy) = self.packer.allocate(w, h)?;
        let atlas_f = self.packer.size as f32;
        self.cache.insert(key, CachedGlyph {
            uv_min: [gx as f32 / atlas_f, gy as f32 / atlas_f],
            uv_max: [(gx + w) as f32 / atlas_f, (gy + h) as f32 / atlas_f],
        });
        Some((gx, gy))
    }
}

// ── renderer ──────────────────────────────────────────────────────────────

/// Renderer for `DrawCmd::Text`.
///
/// Maintains a 2048 × 2048 R8Unorm glyph atlas. Glyphs are rasterized on
/// first use via fontdue and cached by `GlyphRasterConfig` (font, glyph and
/// pixel size, capped at [`MAX_RASTER_PX`]). When a frame's glyphs do not
/// fit, the atlas is wiped and packed again once; glyphs that still do not
/// fit are skipped.
pub struct TextRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,
    bind_group: Option<wgpu::BindGroup>,
    viewport_ubo: Option<wgpu::Buffer>,

    atlas_texture: Option<wgpu::Texture>,
    atlas: GlyphAtlas,
    /// Set while frames overflow the atlas, so the warning is logged once.
    overflow_warned: bool,

    quad: Option<QuadBuffers>,
    instances: InstanceBuffer<GlyphInstance>,
    scratch: Vec<GlyphInstance>,

    // reusable fontdue layout
    layout: Layout<()>,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self {
            pipeline_format: None,
            pipeline: None,
            bind_group: None,
            viewport_ubo: None,
            atlas_texture: None,
            atlas: GlyphAtlas::new(),
            overflow_warned: false,
            quad: None,
            instances: InstanceBuffer::default(),
            scratch: Vec::new(),
            layout: Layout::new(CoordinateSystem::PositiveYDown),
        }
    }
}

impl TextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders all `DrawCmd::Text` entries in `draw_list`.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        draw_list: &mut DrawList,
        font_system: &FontSystem,
    ) {
        self.ensure_pipeline(ctx);
        if self.quad.is_none() {
            self.quad = Some(QuadBuffers::new(ctx.device, LABEL));
        }

        let cmds: Vec<&TextCmd> = draw_list
            .iter_in_paint_order()
            .filter_map(|item| match &item.cmd {
                DrawCmd::Text(cmd) => Some(cmd),
                _ => None,
            })
            .collect();

        if self.collect_instances(ctx, &cmds, font_system) > 0 {
            log::debug!("{LABEL}: glyph atlas full; clearing and repacking");
            self.atlas.clear();
            let skipped = self.collect_instances(ctx, &cmds, font_system);
            if skipped == 0 {
                self.overflow_warned = false;
            } else if !self.overflow_warned {
                log::warn!("{LABEL}: {skipped} glyph(s) do not fit the atlas and are not drawn");
                self.overflow_warned = true;
            }
        } else {
            self.overflow_warned = false;
        }

        if self.scratch.is_empty() {
            return;
        }

        let Some(ubo) = self.viewport_ubo.as_ref() else { return };
        ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&ViewportUniform::from_viewport(ctx.viewport)));

        let Some(instance_vbo) = self.instances.upload(ctx, LABEL, &self.scratch) else { return };
        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some(bind_group) = self.bind_group.as_ref() else { return };
        let Some(quad) = self.quad.as_ref() else { return };

        let mut rpass = target.begin_overlay_pass(LABEL);
        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, bind_group, &[]);
        rpass.set_vertex_buffer(0, quad.vbo.slice(..));
        rpass.set_vertex_buffer(1, instance_vbo.slice(..));
        rpass.set_index_buffer(quad.ibo.slice(..), wgpu::IndexFormat::Uint16);
        rpass.draw_indexed(0..QuadBuffers::INDEX_COUNT, 0, 0..self.scratch.len() as u32);
    }

    /// Lays out every command into `self.scratch`, uploading missing glyphs.
    ///
    /// Returns how many glyphs were left out because the atlas had no room.
    fn collect_instances(&mut self, ctx: &RenderCtx<'_>, cmds: &[&TextCmd], font_system: &FontSystem) -> usize {
        self.scratch.clear();
        let mut skipped = 0;

        for cmd in cmds {
            let Some(font) = font_system.get(cmd.font) else {
                log::warn!("{LABEL}: unknown {:?}, skipping", cmd.font);
                continue;
            };

            let color = cmd.color.to_array();

            self.layout.reset(&LayoutSettings {
                x: cmd.origin.x,
                y: cmd.origin.y,
                ..LayoutSettings::default()
            });
            self.layout.append(&[font], &TextStyle::new(&cmd.text, quantize_size(cmd.size), 0));

            // Copy out so the borrow on `self.layout` ends before uploading.
            let placed: Vec<(GlyphRasterConfig, f32, f32, usize, usize)> = self
                .layout
                .glyphs()
                .iter()
                .filter(|g| g.char_data.rasterize() && g.width > 0 && g.height > 0)
                .map(|g| (g.key, g.x, g.y, g.width, g.height))
                .collect();

            for (key, x, y, w, h) in placed {
                let key = raster_key(key);
                let cached = match self.atlas.get(&key) {
                    Some(c) => c,
                    None => {
                        let (metrics, bitmap) = font.rasterize_config(key);
                        if metrics.width == 0 || metrics.height == 0 {
                            continue;
                        }
                        let (w, h) = (metrics.width as u32, metrics.height as u32);
                        let Some(origin) = self.atlas.reserve(key, w, h) else {
                            skipped += 1;
                            continue;
                        };
                        self.upload_glyph(ctx, &bitmap, origin, w, h);
                        match self.atlas.get(&key) {
                            Some(c) => c,
                            None => continue,
                        }
                    }
                };

                // Layout boxes are at display size; capped bitmaps stretch to fill them.
                self.scratch.push(GlyphInstance {
                    dst_min: [x, y],
                    dst_max: [x + w as f32, y + h as f32],
                    uv_min: cached.uv_min,
                    uv_max: cached.uv_max,
                    color,
                });
            }
        }

        skipped
    }

    fn upload_glyph(&self, ctx: &RenderCtx<'_>, bitmap: &[u8], (gx, gy): (u32, u32), w: u32, h: u32) {
        let Some(atlas) = self.atlas_texture.as_ref() else { return };

        ctx.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: atlas,
                mip_level: 0,
                origin: wgpu::Origin3d { x: gx, y: gy, z: 0 },
                aspect: wgpu::TextureAspect::All,
            },
            bitmap,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(w),
                rows_per_image: Some(h),
            },
            wgpu::Extent3d { width: w, height: h, depth_or_array_layers: 1 },
        );
    }

    /// Builds pipeline, atlas, sampler and bind group together; they are only
    /// ever invalidated together (surface format change).
    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let bgl = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("nodeweave text bgl"),
            entries: &[
                viewport_bgl_entry(),
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline = create_instanced_pipeline(
            ctx.device,
            ctx.surface_format,
            LABEL,
            include_str!("shaders/text.wgsl"),
            &bgl,
            GlyphInstance::layout(),
        );

        let atlas = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("nodeweave text atlas"),
            size: wgpu::Extent3d {
                width: ATLAS_SIZE,
                height: ATLAS_SIZE,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::R8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let atlas_view = atlas.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = ctx.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("nodeweave text sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        let viewport_ubo = create_viewport_ubo(ctx.device, "nodeweave text viewport ubo");

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("nodeweave text bind group"),
            layout: &bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: viewport_ubo.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&atlas_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        // Fresh texture: previously cached UVs point at nothing.
        self.atlas.clear();

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.atlas_texture = Some(atlas);
        self.viewport_ubo = Some(viewport_ubo);
        self.bind_group = Some(bind_group);
    }
}

// ── GPU types ─────────────────────────────────────────────────────────────

/// Instance data layout (48 bytes):
///
///  offset  0  dst_min  [f32; 2]   loc 1
///  offset  8  dst_max  [f32; 2]   loc 2
///  offset 16  uv_min   [f32; 2]   loc 3
///  offset 24  uv_max   [f32; 2]   loc 4
///  offset 32  color    [f32; 4]   loc 5
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct GlyphInstance {
    dst_min: [f32; 2],
    dst_max: [f32; 2],
    uv_min: [f32; 2],
    uv_max: [f32; 2],
    color: [f32; 4],
}

impl QuadInstance for GlyphInstance {
    fn layout() -> wgpu::VertexBufferLayout<'static> {
        const ATTRS: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
            1 => Float32x2, // dst_min
            2 => Float32x2, // dst_max
            3 => Float32x2, // uv_min
            4 => Float32x2, // uv_max
            5 => Float32x4  // color
        ];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<GlyphInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &ATTRS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_snap_to_half_pixels() {
        assert_eq!(quantize_size(24.0), 24.0);
        assert_eq!(quantize_size(26.4), 26.5);
        assert_eq!(quantize_size(26.1), 26.0);
        assert_eq!(quantize_size(0.01), SIZE_QUANTUM);
    }

    #[test]
    fn packer_wraps_to_next_shelf() {
        let mut p = ShelfPacker::new(32);
        assert_eq!(p.allocate(20, 10), Some((1, 1)));
        // 22 + 20 + 1 > 32: new shelf below the first row.
        assert_eq!(p.allocate(20, 5), Some((1, 12)));
    }

    #[test]
    fn packer_reports_full_and_recovers_after_reset() {
        let mut p = ShelfPacker::new(16);
        assert!(p.allocate(14, 14).is_some());
        assert_eq!(p.allocate(14, 14), None);

        p.reset();
        assert_eq!(p.allocate(14, 14), Some((1, 1)));
    }

    #[test]
    fn packer_rejects_oversized_glyph() {
        let mut p = ShelfPacker::new(16);
        assert_eq!(p.allocate(15, 2), None);
    }

    fn key(glyph_index: u16, px: f32) -> GlyphRasterConfig {
        GlyphRasterConfig { glyph_index, px, font_hash: 7 }
    }

    #[test]
    fn raster_size_is_capped_for_deep_zoom() {
        assert_eq!(raster_key(key(3, 24.0)), key(3, 24.0));
        assert_eq!(raster_key(key(3, 24.0 * 60.0)), key(3, MAX_RASTER_PX));
        // Every zoom beyond the cap shares one atlas cell.
        assert_eq!(raster_key(key(3, 2000.0)), raster_key(key(3, 5000.0)));
    }

    #[test]
    fn capped_label_fits_the_atlas() {
        // A long label at the cap, with generous cells for tall glyphs.
        let cell = (MAX_RASTER_PX * 1.5) as u32;
        let mut atlas = GlyphAtlas::new();
        for i in 0..100 {
            assert!(atlas.reserve(key(i, MAX_RASTER_PX), cell, cell).is_some(), "glyph {i}");
        }
    }

    #[test]
    fn glyph_that_does_not_fit_leaves_later_ones_placeable() {
        let mut atlas = GlyphAtlas::new();
        assert_eq!(atlas.reserve(key(1, 9999.0), ATLAS_SIZE, 8), None);
        assert!(atlas.get(&key(1, 9999.0)).is_none());

        assert_eq!(atlas.reserve(key(2, 24.0), 10, 12), Some((1, 1)));
        let uv = atlas.get(&key(2, 24.0)).unwrap();
        let texel = 1.0 / ATLAS_SIZE as f32;
        assert_eq!(uv.uv_min, [texel, texel]);
        assert_eq!(uv.uv_max, [11.0 * texel, 13.0 * texel]);
    }

    #[test]
    fn clearing_the_atlas_forgets_cached_uvs() {
        let mut atlas = GlyphAtlas::new();
        atlas.reserve(key(1, 24.0), 10, 10);
        atlas.clear();
        assert!(atlas.get(&key(1, 24.0)).is_none());
        assert_eq!(atlas.reserve(key(2, 24.0), 10, 10), Some((1, 1)));
    }
}
