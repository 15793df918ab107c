// pathfinder/turtle/src/canvas.rs
//
// Copyright © 2019 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Drawing surfaces the turtle emits line segments to.

use crate::error::CanvasError;
use crate::state::Stroke;
use kurbo::{Line, Rect, Size};
use serde::{Deserialize, Serialize};
use std::io::Write;

/// A fixed-size 2D surface. Segments are drawn in the order the turtle
/// emits them.
pub trait Canvas {
    fn size(&self) -> Size;
    fn clear(&mut self) -> Result<(), CanvasError>;
    fn draw_line(&mut self, line: Line, stroke: &Stroke) -> Result<(), CanvasError>;
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub line: Line,
    pub stroke: Stroke,
}

impl Segment {
    #[inline]
    pub fn length(&self) -> f64 {
        (self.line.p1 - self.line.p0).hypot()
    }
}

/// Records every segment, for export once playback is done.
#[derive(Clone, Debug)]
pub struct Scene {
    pub segments: Vec<Segment>,
    /// Union of all segment endpoints, or `None` before the first draw.
    pub bounds: Option<Rect>,
    size: Size,
}

impl Scene {
    pub fn new(size: Size) -> Scene {
        Scene {
            segments: Vec::new(),
            bounds: None,
            size,
        }
    }

    #[inline]
    pub fn view_box(&self) -> Rect {
        self.size.to_rect()
    }

    fn update_bounds(&mut self, line: &Line) {
        let rect = Rect::from_points(line.p0, line.p1);
        self.bounds = Some(match self.bounds {
            Some(bounds) => bounds.union(rect),
            None => rect,
        });
    }
}

impl Canvas for Scene {
    #[inline]
    fn size(&self) -> Size {
        self.size
    }

    fn clear(&mut self) -> Result<(), CanvasError> {
        self.segments.clear();
        self.bounds = None;
        Ok(())
    }

    fn draw_line(&mut self, line: Line, stroke: &Stroke) -> Result<(), CanvasError> {
        self.update_bounds(&line);
        self.segments.push(Segment {
            line,
            stroke: *stroke,
        });
        Ok(())
    }
}

/// Streams each segment as one JSON object per line as soon as it is drawn.
#[derive(Debug)]
pub struct JsonLines<W: Write> {
    writer: W,
    size: Size,
}

#[derive(Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum Event<'a> {
    Clear,
    Line(&'a Segment),
}

impl<W: Write> JsonLines<W> {
    pub fn new(writer: W, size: Size) -> JsonLines<W> {
        JsonLines { writer, size }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    // Encoded up front so a failing writer reports `CanvasError::Io`.
    fn emit(&mut self, event: &Event) -> Result<(), CanvasError> {
        let mut line = serde_json::to_vec(event)?;
        line.push(b'\n');
        self.writer.write_all(&line)?;
        self.writer.flush()?;
        Ok(())
    }
}

impl<W: Write> Canvas for JsonLines<W> {
    #[inline]
    fn size(&self) -> Size {
        self.size
    }

    fn clear(&mut self) -> Result<(), CanvasError> {
        self.emit(&Event::Clear)
    }

    fn draw_line(&mut self, line: Line, stroke: &Stroke) -> Result<(), CanvasError> {
        let segment = Segment {
            line,
            stroke: *stroke,
        };
        self.emit(&Event::Line(&segment))
    }
}

/// Draws to both canvases. The first one determines the size.
impl<A: Canvas, B: Canvas> Canvas for (A, B) {
    #[inline]
    fn size(&self) -> Size {
        self.0.size()
    }

    fn clear(&mut self) -> Result<(), CanvasError> {
        self.0.clear()?;
        self.1.clear()
    }

    fn draw_line(&mut self, line: Line, stroke: &Stroke) -> Result<(), CanvasError> {
        self.0.draw_line(line, stroke)?;
        self.1.draw_line(line, stroke)
    }
}

/// `None` discards everything.
impl<C: Canvas> Canvas for Option<C> {
    fn size(&self) -> Size {
        self.as_ref().map_or(Size::ZERO, Canvas::size)
    }

    fn clear(&mut self) -> Result<(), CanvasError> {
        match self {
            Some(canvas) => canvas.clear(),
            None => Ok(()),
        }
    }

    fn draw_line(&mut self, line: Line, stroke: &Stroke) -> Result<(), CanvasError> {
        match self {
            Some(canvas) => canvas.draw_line(line, stroke),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;
    use uturtle::Color;

    const STROKE: Stroke = Stroke {
        color: Color::BLACK,
        width: 2.0,
    };

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn scene_tracks_bounds() {
        let mut scene = Scene::new(Size::new(100.0, 100.0));
        assert_eq!(scene.bounds, None);
        scene
            .draw_line(Line::new((10.0, 20.0), (30.0, 5.0)), &STROKE)
            .unwrap();
        scene
            .draw_line(Line::new((40.0, 50.0), (35.0, 45.0)), &STROKE)
            .unwrap();
        assert_eq!(scene.bounds, Some(Rect::new(10.0, 5.0, 40.0, 50.0)));
        assert_eq!(scene.segments.len(), 2);
        scene.clear().unwrap();
        assert!(scene.segments.is_empty());
        assert_eq!(scene.bounds, None);
    }

    #[test]
    fn json_lines_writes_one_object_per_segment() {
        let mut canvas = JsonLines::new(Vec::new(), Size::new(10.0, 10.0));
        canvas
            .draw_line(Line::new(Point::ZERO, (3.0, 4.0)), &STROKE)
            .unwrap();
        canvas.clear().unwrap();
        let text = String::from_utf8(canvas.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["op"], "line");
        assert_eq!(first["stroke"]["width"], 2.0);
        assert_eq!(lines[1], r#"{"op":"clear"}"#);
    }

    #[test]
    fn json_lines_reports_write_failures_as_io() {
        let mut canvas = JsonLines::new(FailingWriter, Size::new(10.0, 10.0));
        assert!(matches!(
            canvas.draw_line(Line::new(Point::ZERO, (1.0, 1.0)), &STROKE),
            Err(CanvasError::Io(_))
        ));
        assert!(matches!(canvas.clear(), Err(CanvasError::Io(_))));
    }

    #[test]
    fn pair_draws_to_both() {
        let mut pair = (
            Scene::new(Size::new(10.0, 10.0)),
            Scene::new(Size::new(20.0, 20.0)),
        );
        pair.draw_line(Line::new(Point::ZERO, (1.0, 1.0)), &STROKE)
            .unwrap();
        assert_eq!(pair.size(), Size::new(10.0, 10.0));
        assert_eq!(pair.0.segments, pair.1.segments);
    }

    #[test]
    fn absent_canvas_discards() {
        let mut nothing: Option<Scene> = None;
        assert_eq!(nothing.size(), Size::ZERO);
        nothing
            .draw_line(Line::new(Point::ZERO, (1.0, 1.0)), &STROKE)
            .unwrap();
    }
}
