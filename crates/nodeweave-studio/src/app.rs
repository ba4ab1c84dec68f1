use nodeweave_engine::core::{App, AppControl, FrameCtx};
use nodeweave_engine::render::shapes::{CircleRenderer, LineRenderer, RectRenderer, TextRenderer};
use nodeweave_engine::scene::DrawList;
use nodeweave_engine::text::{FontId, FontSystem};
use nodeweave_graph::scene::{self, CLEAR_COLOR, Theme};
use nodeweave_graph::{Document, GraphPainter, Interaction};

/// GPU-backed renderers, in the order they are invoked each frame.
#[derive(Default)]
struct Renderers {
    line: LineRenderer,
    rect: RectRenderer,
    circle: CircleRenderer,
    text: TextRenderer,
}

/// The graph editor: owns the document and everything needed to draw it.
pub struct StudioApp {
    doc: Document,
    interaction: Interaction,
    theme: Theme,

    fonts: FontSystem,
    font: FontId,
    draw_list: DrawList,

    /// `None` once `on_exit` has released GPU resources.
    renderers: Option<Renderers>,
}

impl StudioApp {
    pub fn new(doc: Document, fonts: FontSystem, font: FontId) -> Self {
        Self {
            doc,
            interaction: Interaction::new(),
            theme: Theme::default(),
            fonts,
            font,
            draw_list: DrawList::new(),
            renderers: Some(Renderers::default()),
        }
    }

    /// Gives back the document for the caller to drop last.
    pub fn into_document(self) -> Document {
        self.doc
    }
}

impl App for StudioApp {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        self.interaction.handle_frame(&mut self.doc, ctx.input_frame);

        self.draw_list.clear();
        {
            let mut painter = GraphPainter::new(
                &mut self.draw_list,
                &self.fonts,
                self.doc.camera,
                self.font,
                self.doc.settings.font_size,
            );
            scene::record(&mut painter, &self.doc, &self.interaction, &self.theme);
        }

        let Some(r) = self.renderers.as_mut() else {
            return AppControl::Exit;
        };
        let dl = &mut self.draw_list;
        let fonts = &self.fonts;

        ctx.render(CLEAR_COLOR, |rctx, target| {
            r.line.render(rctx, target, dl);
            r.rect.render(rctx, target, dl);
            r.circle.render(rctx, target, dl);
            r.text.render(rctx, target, dl, fonts);
        })
    }

    fn on_exit(&mut self) {
        self.renderers = None;
        log::debug!("renderers and glyph atlas released");
    }
}
