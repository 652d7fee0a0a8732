use quill_style::Rgba;

use crate::geometry::Rect;
use crate::metrics::FontSpec;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    FillRect { rect: Rect, color: Rgba },
    StrokeRect { rect: Rect, width: f32, color: Rgba },
    Line { from: [f32; 2], to: [f32; 2], width: f32, color: Rgba },
    /// Text drawn with its baseline at `baseline`.
    DrawText { x: f32, baseline: f32, text: String, font: FontSpec, color: Rgba },
    FillEllipse { rect: Rect, color: Rgba },
    StrokeEllipse { rect: Rect, color: Rgba },
    /// An image reference; decoding is up to the consumer.
    DrawImage { rect: Rect, src: String },
    PushClip(Rect),
    PopClip,
}

#[derive(Clone, Debug, Default)]
pub struct DisplayList {
    pub viewport: Viewport,
    pub commands: Vec<Command>,
}

impl DisplayList {
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            Command::DrawText { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

pub struct Painter {
    list: DisplayList,
    clip_depth: usize,
}

impl Painter {
    pub fn begin_frame(viewport: Viewport) -> Self {
        Self {
            list: DisplayList {
                viewport,
                commands: Vec::new(),
            },
            clip_depth: 0,
        }
    }

    pub fn push_clip_rect(&mut self, rect: Rect) {
        self.clip_depth += 1;
        self.list.commands.push(Command::PushClip(rect));
    }

    pub fn pop_clip(&mut self) {
        if self.clip_depth > 0 {
            self.clip_depth -= 1;
            self.list.commands.push(Command::PopClip);
        }
    }

    pub fn rect(&mut self, rect: Rect, color: Rgba) {
        self.list.commands.push(Command::FillRect { rect, color });
    }

    pub fn stroke_rect(&mut self, rect: Rect, width: f32, color: Rgba) {
        self.list.commands.push(Command::StrokeRect { rect, width, color });
    }

    pub fn line(&mut self, from: [f32; 2], to: [f32; 2], width: f32, color: Rgba) {
        self.list.commands.push(Command::Line { from, to, width, color });
    }

    pub fn text(&mut self, x: f32, baseline: f32, text: impl Into<String>, font: &FontSpec, color: Rgba) {
        self.list.commands.push(Command::DrawText {
            x,
            baseline,
            text: text.into(),
            font: font.clone(),
            color,
        });
    }

    pub fn ellipse(&mut self, rect: Rect, color: Rgba) {
        self.list.commands.push(Command::FillEllipse { rect, color });
    }

    pub fn stroke_ellipse(&mut self, rect: Rect, color: Rgba) {
        self.list.commands.push(Command::StrokeEllipse { rect, color });
    }

    pub fn image(&mut self, rect: Rect, src: impl Into<String>) {
        self.list.commands.push(Command::DrawImage { rect, src: src.into() });
    }

    /// Close any clips left open and hand back the list.
    pub fn finish(mut self) -> DisplayList {
        while self.clip_depth > 0 {
            self.pop_clip();
        }
        self.list
    }
}
