use nodeweave_engine::coords::{Rect, Vec2};
use nodeweave_engine::paint::Color;
use nodeweave_engine::scene::{DrawList, ZIndex};
use nodeweave_engine::text::{FontId, FontSystem};

use crate::camera::Camera;

/// Connection line thickness in world units.
pub const LINE_WIDTH: f32 = 2.0;

/// World-space drawing surface.
///
/// Wraps the engine's `DrawList` and maps every coordinate through the camera,
/// so geometry and text scale with zoom. Each call gets the next z-index, so
/// within one shape kind later calls paint on top.
pub struct GraphPainter<'a> {
    draw_list: &'a mut DrawList,
    font_system: &'a FontSystem,
    camera: Camera,
    font: FontId,
    /// Text height in world units.
    font_size: f32,
    z: i32,
}

impl<'a> GraphPainter<'a> {
    pub fn new(
        draw_list: &'a mut DrawList,
        font_system: &'a FontSystem,
        camera: Camera,
        font: FontId,
        font_size: f32,
    ) -> Self {
        Self { draw_list, font_system, camera, font, font_size, z: 0 }
    }

    #[inline]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Axis-aligned filled rectangle centered on `center`.
    pub fn draw_rect(&mut self, center: Vec2, size: Vec2, color: Color) {
        let top_left = self.camera.world_to_screen(center - size / 2.0);
        let extent = size * self.camera.scale();
        let z = self.next_z();
        self.draw_list
            .push_solid_rect(z, Rect::new(top_left.x, top_left.y, extent.x, extent.y), color);
    }

    pub fn draw_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        let c = self.camera.world_to_screen(center);
        let z = self.next_z();
        self.draw_list.push_solid_circle(z, c, radius * self.camera.scale(), color);
    }

    pub fn draw_line(&mut self, a: Vec2, b: Vec2, color: Color) {
        let from = self.camera.world_to_screen(a);
        let to = self.camera.world_to_screen(b);
        let z = self.next_z();
        self.draw_list.push_line(z, from, to, LINE_WIDTH * self.camera.scale(), color);
    }

    /// Single-line text with its top-left corner at `origin`.
    pub fn draw_text(&mut self, text: &str, origin: Vec2, color: Color) {
        if text.is_empty() {
            return;
        }
        let o = self.camera.world_to_screen(origin);
        let size = self.font_size * self.camera.scale();
        let z = self.next_z();
        self.draw_list.push_text(z, text, self.font, size, color, o);
    }

    /// Extent of `text` in world units at the painter's font size.
    pub fn measure_text(&self, text: &str) -> Vec2 {
        self.font_system.measure_text(text, self.font, self.font_size)
    }

    fn next_z(&mut self) -> ZIndex {
        let z = ZIndex::new(self.z);
        self.z += 1;
        z
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nodeweave_engine::scene::DrawCmd;

    #[test]
    fn geometry_is_mapped_through_camera() {
        let mut list = DrawList::new();
        let fonts = FontSystem::new();
        let cam = Camera::new(100.0, 50.0, 2.0);
        {
            let mut p = GraphPainter::new(&mut list, &fonts, cam, FontId::from_index(0), 10.0);
            p.draw_rect(Vec2::new(150.0, 100.0), Vec2::new(20.0, 20.0), Color::white());
            p.draw_circle(Vec2::new(100.0, 50.0), 6.0, Color::white());
            p.draw_line(Vec2::new(100.0, 50.0), Vec2::new(110.0, 50.0), Color::white());
            p.draw_text("hi", Vec2::new(101.0, 51.0), Color::white());
        }

        let items = list.items();
        let DrawCmd::Rect(r) = &items[0].cmd else { panic!("expected rect") };
        assert_eq!(r.rect, Rect::new(80.0, 80.0, 40.0, 40.0));

        let DrawCmd::Circle(c) = &items[1].cmd else { panic!("expected circle") };
        assert_eq!((c.center, c.radius), (Vec2::new(0.0, 0.0), 12.0));

        let DrawCmd::Line(l) = &items[2].cmd else { panic!("expected line") };
        assert_eq!((l.from, l.to, l.width), (Vec2::zero(), Vec2::new(20.0, 0.0), 4.0));

        let DrawCmd::Text(t) = &items[3].cmd else { panic!("expected text") };
        assert_eq!((t.origin, t.size), (Vec2::new(2.0, 2.0), 20.0));
    }

    #[test]
    fn each_call_gets_a_higher_z() {
        let mut list = DrawList::new();
        let fonts = FontSystem::new();
        {
            let mut p = GraphPainter::new(&mut list, &fonts, Camera::default(), FontId::from_index(0), 10.0);
            p.draw_circle(Vec2::zero(), 1.0, Color::white());
            p.draw_circle(Vec2::zero(), 1.0, Color::white());
        }
        assert!(list.items()[0].key.z < list.items()[1].key.z);
    }

    #[test]
    fn empty_text_is_not_recorded() {
        let mut list = DrawList::new();
        let fonts = FontSystem::new();
        GraphPainter::new(&mut list, &fonts, Camera::default(), FontId::from_index(0), 10.0)
            .draw_text("", Vec2::zero(), Color::white());
        assert!(list.is_empty());
    }
}
