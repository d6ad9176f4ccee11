// src/sprite/layout.rs

//! Diagonal sprite layout: every icon gets its own row and column, so
//! boxes never overlap.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpriteLayout {
    pub width: f64,
    pub height: f64,
    /// Padded boxes, one per input size, in input order.
    pub boxes: Vec<Rect>,
    pub padding: f64,
}

impl SpriteLayout {
    /// Where the glyph itself is drawn inside box `index`.
    pub fn glyph_origin(&self, index: usize) -> Option<(f64, f64)> {
        self.boxes
            .get(index)
            .map(|b| (b.x + self.padding, b.y + self.padding))
    }
}

pub fn diagonal_layout(sizes: &[(f64, f64)], padding: f64) -> SpriteLayout {
    let mut boxes = Vec::with_capacity(sizes.len());
    let (mut x, mut y) = (0.0, 0.0);

    for &(width, height) in sizes {
        let padded = Rect {
            x,
            y,
            width: width + 2.0 * padding,
            height: height + 2.0 * padding,
        };
        x += padded.width;
        y += padded.height;
        boxes.push(padded);
    }

    SpriteLayout {
        width: x,
        height: y,
        boxes,
        padding,
    }
}
