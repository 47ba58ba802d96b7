use rand::Rng;

use spatialgen_core::Point;

use super::random::dice;

/// Height of the equilateral triangle, `sqrt(3) / 2`.
const APEX_Y: f64 = 0.866_025_403_784_438_6;

pub(super) const VERTICES: [[f64; 2]; 3] = [[0.0, 0.0], [1.0, 0.0], [0.5, APEX_Y]];

/// Chaos-game step of the Sierpinski triangle.
///
/// The first three indices return the vertices themselves. Later indices move
/// halfway from the previous accepted point towards a vertex picked by a
/// five-sided die: faces 1-2 pick V0, 3-4 pick V1 and 5 picks V2.
pub(super) fn sample(index: u64, previous: Option<&Point>, rng: &mut impl Rng) -> Option<Point> {
    if let Some(vertex) = usize::try_from(index)
        .ok()
        .and_then(|index| VERTICES.get(index))
    {
        return Some(Point::new(vertex.to_vec()));
    }

    let previous = previous?;
    let vertex = match dice(5, rng) {
        1 | 2 => VERTICES[0],
        3 | 4 => VERTICES[1],
        _ => VERTICES[2],
    };
    Some(previous.midpoint(&Point::new(vertex.to_vec())))
}
