//! Recursive binary partition of the unit square ("parcel" datasets).

use std::collections::VecDeque;

use rand::Rng;

use spatialgen_core::Rectangle;

use crate::distributions::random::uniform_between;

/// Splits the unit square into exactly `cardinality` boxes.
///
/// Boxes are taken from the front of a FIFO work-list. A box wider than it is
/// tall is cut along x, otherwise along y, at a fraction drawn uniformly from
/// `[split_range, 1 - split_range]`; both halves go to the back. The result
/// tiles the unit square with no gaps or overlaps.
pub fn partition(cardinality: usize, split_range: f64, rng: &mut impl Rng) -> Vec<Rectangle> {
    if cardinality == 0 {
        return Vec::new();
    }

    let mut boxes = VecDeque::new();
    boxes.push_back(Rectangle::UNIT);

    while boxes.len() < cardinality {
        let Some(parent) = boxes.pop_front() else {
            break;
        };
        let (first, second) = split(&parent, split_range, rng);
        boxes.push_back(first);
        boxes.push_back(second);
    }

    boxes.into()
}

fn split(parent: &Rectangle, split_range: f64, rng: &mut impl Rng) -> (Rectangle, Rectangle) {
    let fraction = uniform_between(split_range, 1.0 - split_range, rng);
    if parent.w > parent.h {
        let size = parent.w * fraction;
        (
            Rectangle::new(parent.x, parent.y, size, parent.h),
            Rectangle::new(parent.x + size, parent.y, parent.w - size, parent.h),
        )
    } else {
        let size = parent.h * fraction;
        (
            Rectangle::new(parent.x, parent.y, parent.w, size),
            Rectangle::new(parent.x, parent.y + size, parent.w, parent.h - size),
        )
    }
}

/// Shrinks every box toward its own origin.
///
/// Width and height are scaled independently by `1 - u * dither` with fresh
/// uniform `u` (width first), so sizes never turn negative for
/// `dither` in [0, 1].
pub fn dither(boxes: &mut [Rectangle], dither: f64, rng: &mut impl Rng) {
    for rect in boxes.iter_mut() {
        rect.w *= 1.0 - uniform_between(0.0, dither, rng);
        rect.h *= 1.0 - uniform_between(0.0, dither, rng);
    }
}
