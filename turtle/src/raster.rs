// pathfinder/turtle/src/raster.rs
//
// Copyright © 2019 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A pixel-buffer canvas.

use crate::canvas::Canvas;
use crate::error::CanvasError;
use crate::state::Stroke;
use image::{ImageResult, RgbaImage};
use kurbo::{Line, Rect, Size};
use std::path::Path;
use uturtle::Color;

/// Largest supported side, in pixels.
pub const MAX_SIDE: usize = 16_384;

/// RGBA pixel buffer, cleared to a background color.
#[derive(Clone, Debug)]
pub struct Raster {
    width: usize,
    height: usize,
    background: Color,
    pixels: Vec<u8>,
}

impl Raster {
    /// Sides above `MAX_SIDE` are clamped to it.
    pub fn new(width: usize, height: usize, background: Color) -> Raster {
        let (width, height) = (width.min(MAX_SIDE), height.min(MAX_SIDE));
        let mut raster = Raster {
            width,
            height,
            background,
            pixels: vec![0; width * height * 4],
        };
        raster.fill(background);
        raster
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y * self.width + x) * 4;
        Some(Color::rgb(
            self.pixels[offset],
            self.pixels[offset + 1],
            self.pixels[offset + 2],
        ))
    }

    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> ImageResult<()> {
        self.to_image().save(path)
    }

    pub fn to_image(&self) -> RgbaImage {
        // Both sides are at most `MAX_SIDE`, and the buffer length always
        // matches them.
        let (width, height) = (self.width as u32, self.height as u32);
        RgbaImage::from_fn(width, height, |x, y| {
            let offset = (y as usize * self.width + x as usize) * 4;
            image::Rgba([
                self.pixels[offset],
                self.pixels[offset + 1],
                self.pixels[offset + 2],
                self.pixels[offset + 3],
            ])
        })
    }

    /// Downsamples to one character per `cell` x `cell` block: `#` where any
    /// pixel differs from the background, `.` elsewhere.
    pub fn to_ascii(&self, cell: usize) -> String {
        let cell = cell.max(1);
        let mut out = String::new();
        for row in (0..self.height).step_by(cell) {
            for column in (0..self.width).step_by(cell) {
                let inked = (row..(row + cell).min(self.height)).any(|y| {
                    (column..(column + cell).min(self.width))
                        .any(|x| self.pixel(x, y) != Some(self.background))
                });
                out.push(if inked { '#' } else { '.' });
            }
            out.push('\n');
        }
        out
    }

    fn fill(&mut self, color: Color) {
        for pixel in self.pixels.chunks_exact_mut(4) {
            pixel.copy_from_slice(&[color.r, color.g, color.b, 255]);
        }
    }

    // `radius` is at most the larger side, so neither bound can overflow.
    fn stamp(&mut self, x: isize, y: isize, radius: isize, color: Color) {
        let rows = (y - radius).max(0)..(y + radius + 1).min(self.height as isize);
        let columns = (x - radius).max(0)..(x + radius + 1).min(self.width as isize);
        for py in rows {
            for px in columns.clone() {
                let offset = (py as usize * self.width + px as usize) * 4;
                self.pixels[offset..offset + 4].copy_from_slice(&[color.r, color.g, color.b, 255]);
            }
        }
    }
}

impl Canvas for Raster {
    #[inline]
    fn size(&self) -> Size {
        Size::new(self.width as f64, self.height as f64)
    }

    fn clear(&mut self) -> Result<(), CanvasError> {
        self.fill(self.background);
        Ok(())
    }

    /// Bresenham, stamping a square of the stroke width at each step.
    fn draw_line(&mut self, line: Line, stroke: &Stroke) -> Result<(), CanvasError> {
        let max_radius = self.width.max(self.height) as isize;
        let radius = (((stroke.width - 1.0) / 2.0).max(0.0).round() as isize).min(max_radius);
        let margin = radius as f64 + 1.0;
        let bounds = Rect::new(
            -margin,
            -margin,
            self.width as f64 + margin,
            self.height as f64 + margin,
        );
        let line = match clip(line, bounds) {
            Some(line) => line,
            None => return Ok(()),
        };
        let (mut x0, mut y0, x1, y1) = (
            line.p0.x.round() as isize,
            line.p0.y.round() as isize,
            line.p1.x.round() as isize,
            line.p1.y.round() as isize,
        );
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.stamp(x0, y0, radius, stroke.color);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
        Ok(())
    }
}

/// Liang-Barsky clipping against `bounds`.
fn clip(line: Line, bounds: Rect) -> Option<Line> {
    let delta = line.p1 - line.p0;
    let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
    let edges = [
        (-delta.x, line.p0.x - bounds.x0),
        (delta.x, bounds.x1 - line.p0.x),
        (-delta.y, line.p0.y - bounds.y0),
        (delta.y, bounds.y1 - line.p0.y),
    ];
    for &(p, q) in &edges {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
        } else {
            let r = q / p;
            if p < 0.0 {
                if r > t1 {
                    return None;
                }
                t0 = t0.max(r);
            } else {
                if r < t0 {
                    return None;
                }
                t1 = t1.min(r);
            }
        }
    }
    Some(Line::new(line.p0 + delta * t0, line.p0 + delta * t1))
}
