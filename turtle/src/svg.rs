// pathfinder/turtle/src/svg.rs
//
// Copyright © 2019 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Serializes a recorded scene as an SVG document.

use crate::canvas::Scene;
use crate::state::Cursor;
use kurbo::{Point, Vec2};
use std::fmt::Write;
use uturtle::Color;

const CURSOR_LENGTH: f64 = 12.0;
const CURSOR_HALF_WIDTH: f64 = 5.0;

pub fn render(scene: &Scene, background: Color, cursor: Option<Cursor>) -> String {
    let view_box = scene.view_box();
    let mut svg = String::new();

    // Writing into a `String` cannot fail.
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="{x} {y} {w} {h}">"#,
        x = view_box.x0,
        y = view_box.y0,
        w = view_box.width(),
        h = view_box.height(),
    );
    let _ = writeln!(
        svg,
        r#"  <rect width="100%" height="100%" fill="{}"/>"#,
        background
    );
    for segment in &scene.segments {
        let _ = writeln!(
            svg,
            r#"  <line x1="{:.3}" y1="{:.3}" x2="{:.3}" y2="{:.3}" stroke="{}" stroke-width="{}" stroke-linecap="round"/>"#,
            segment.line.p0.x,
            segment.line.p0.y,
            segment.line.p1.x,
            segment.line.p1.y,
            segment.stroke.color,
            segment.stroke.width,
        );
    }
    if let Some(cursor) = cursor {
        let [tip, left, right] = cursor_triangle(cursor);
        let _ = writeln!(
            svg,
            r#"  <polygon points="{:.3},{:.3} {:.3},{:.3} {:.3},{:.3}" fill="none" stroke="{}"/>"#,
            tip.x, tip.y, left.x, left.y, right.x, right.y, Color::BLACK,
        );
    }
    svg.push_str("</svg>\n");
    svg
}

/// An arrowhead whose tip sits on the turtle and points along its heading.
fn cursor_triangle(cursor: Cursor) -> [Point; 3] {
    let (s, c) = cursor.heading.to_radians().sin_cos();
    let forward = Vec2::new(c, s);
    let side = Vec2::new(-s, c);
    let tip = cursor.position;
    let base = tip - forward * CURSOR_LENGTH;
    [
        tip,
        base + side * CURSOR_HALF_WIDTH,
        base - side * CURSOR_HALF_WIDTH,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Canvas;
    use crate::state::Stroke;
    use kurbo::{Line, Size};

    #[test]
    fn one_line_element_per_segment() {
        let mut scene = Scene::new(Size::new(200.0, 100.0));
        let stroke = Stroke {
            color: Color::rgb(70, 130, 180),
            width: 3.0,
        };
        scene
            .draw_line(Line::new((0.0, 0.0), (10.0, 0.0)), &stroke)
            .unwrap();
        scene
            .draw_line(Line::new((10.0, 0.0), (10.0, 10.0)), &stroke)
            .unwrap();
        let svg = render(&scene, Color::WHITE, None);
        assert!(svg.starts_with("<svg "));
        assert!(svg.contains(r#"viewBox="0 0 200 100""#));
        assert!(svg.contains(r##"fill="#ffffff""##));
        assert_eq!(svg.matches("<line ").count(), 2);
        assert!(svg.contains(r##"stroke="#4682b4" stroke-width="3""##));
        assert!(!svg.contains("<polygon"));
        assert!(svg.ends_with("</svg>\n"));
    }

    #[test]
    fn cursor_points_along_heading() {
        let [tip, left, right] = cursor_triangle(Cursor {
            position: Point::new(50.0, 50.0),
            heading: 0.0,
        });
        assert_eq!(tip, Point::new(50.0, 50.0));
        assert!(left.x < tip.x && right.x < tip.x);
        assert!((left.y - right.y).abs() > 1.0);

        let scene = Scene::new(Size::new(100.0, 100.0));
        let svg = render(
            &scene,
            Color::WHITE,
            Some(Cursor {
                position: Point::new(50.0, 50.0),
                heading: 90.0,
            }),
        );
        assert_eq!(svg.matches("<polygon").count(), 1);
    }
}
