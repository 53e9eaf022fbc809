//! The fixed vocabulary of patch shapes.
//!
//! Each patch is a polygon whose vertices sit on a 5x5 point grid. Grid
//! points are numbered 0 to 24 from the top-left corner, left to right and
//! top to bottom:
//!
//! ```text
//!  0  1  2  3  4
//!  5  6  7  8  9
//! 10 11 12 13 14
//! 15 16 17 18 19
//! 20 21 22 23 24
//! ```
//!
//! The vertex and flag tables below define what every existing identicon
//! looks like. Any edit that changes pixels for an existing code requires
//! bumping `identicon_common::RENDER_FORMAT_VERSION`.

/// Number of cells along one side of the vertex grid.
pub const PATCH_CELLS: i64 = 4;

/// Number of grid points along one side.
pub const PATCH_GRIDS: i64 = PATCH_CELLS + 1;

/// Number of shapes in the library.
pub const PATCH_COUNT: usize = 16;

/// Shapes allowed in the center position, selected by a 2-bit field.
pub const CENTER_PATCHES: [usize; 4] = [0, 4, 8, 15];

const PATCH_VERTICES: [&[u8]; PATCH_COUNT] = [
    &[0, 4, 24, 20, 0],
    &[0, 4, 20, 0],
    &[2, 24, 20, 2],
    &[0, 2, 20, 22, 0],
    &[2, 14, 22, 10, 2],
    &[0, 14, 24, 22, 0],
    &[2, 24, 22, 13, 11, 22, 20, 2],
    &[0, 14, 22, 0],
    &[6, 8, 18, 16, 6],
    &[4, 20, 10, 12, 2, 4],
    &[0, 2, 12, 10, 0],
    &[10, 14, 22, 10],
    &[20, 12, 24, 20],
    &[10, 2, 12, 10],
    &[0, 2, 10, 0],
    // same outline as 0, drawn inverted
    &[0, 4, 24, 20, 0],
];

const PATCH_FLAGS: [PatchFlags; PATCH_COUNT] = [
    PatchFlags::SYMMETRIC,
    PatchFlags::NONE,
    PatchFlags::NONE,
    PatchFlags::NONE,
    PatchFlags::SYMMETRIC,
    PatchFlags::NONE,
    PatchFlags::NONE,
    PatchFlags::NONE,
    PatchFlags::SYMMETRIC,
    PatchFlags::NONE,
    PatchFlags::NONE,
    PatchFlags::NONE,
    PatchFlags::NONE,
    PatchFlags::NONE,
    PatchFlags::NONE,
    PatchFlags::SYMMETRIC.union(PatchFlags::INVERTED),
];

/// Per-shape flag bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PatchFlags(u8);

impl PatchFlags {
    pub const NONE: PatchFlags = PatchFlags(0);
    /// Looks the same under every quarter turn.
    pub const SYMMETRIC: PatchFlags = PatchFlags(1);
    /// Fill and background are swapped by definition.
    pub const INVERTED: PatchFlags = PatchFlags(2);

    pub const fn union(self, other: PatchFlags) -> PatchFlags {
        PatchFlags(self.0 | other.0)
    }

    pub const fn contains(self, other: PatchFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn bits(self) -> u8 {
        self.0
    }
}

/// A closed polygon in patch-local pixel coordinates, centered on the patch.
#[derive(Debug, Clone, PartialEq)]
pub struct PatchShape {
    vertices: Vec<(i64, i64)>,
    /// Per edge: whether it runs along the border of the vertex grid.
    on_border: Vec<bool>,
}

impl PatchShape {
    fn from_grid(indices: &[u8], scale: i64, offset: i64) -> Self {
        let mut vertices: Vec<(i64, i64)> = indices
            .iter()
            .map(|&v| {
                let v = v as i64;
                ((v % PATCH_GRIDS) * scale - offset, (v / PATCH_GRIDS) * scale - offset)
            })
            .collect();

        // Close the path explicitly if the table entry doesn't.
        if let (Some(&first), Some(&last)) = (vertices.first(), vertices.last()) {
            if first != last {
                vertices.push(first);
            }
        }

        let lo = -offset;
        let hi = PATCH_CELLS * scale - offset;
        let on_border = vertices
            .windows(2)
            .map(|w| {
                let ((x0, y0), (x1, y1)) = (w[0], w[1]);
                (x0 == x1 && (x0 == lo || x0 == hi)) || (y0 == y1 && (y0 == lo || y0 == hi))
            })
            .collect();

        Self {
            vertices,
            on_border,
        }
    }

    /// Vertices with the first vertex repeated at the end.
    pub fn vertices(&self) -> &[(i64, i64)] {
        &self.vertices
    }

    fn edges(&self) -> impl Iterator<Item = ((f64, f64), (f64, f64))> + '_ {
        self.vertices.windows(2).map(|w| {
            (
                (w[0].0 as f64, w[0].1 as f64),
                (w[1].0 as f64, w[1].1 as f64),
            )
        })
    }

    /// Even-odd point-in-polygon test.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        let mut inside = false;
        for ((x0, y0), (x1, y1)) in self.edges() {
            if (y0 > y) != (y1 > y) {
                let xi = x0 + (y - y0) * (x1 - x0) / (y1 - y0);
                if x < xi {
                    inside = !inside;
                }
            }
        }
        inside
    }

    /// Whether any edge passes through the closed square of half-width
    /// `half` centered at `(x, y)`.
    pub fn outline_touches(&self, x: f64, y: f64, half: f64) -> bool {
        self.edges()
            .any(|(a, b)| segment_hits_box(a, b, (x - half, y - half), (x + half, y + half)))
    }

    /// Like [`outline_touches`](Self::outline_touches), restricted to edges
    /// lying on the border of the vertex grid.
    ///
    /// The outside of such an edge belongs to the neighboring cell, so its
    /// outline is traced on the pixels just inside instead.
    pub fn border_touches(&self, x: f64, y: f64, half: f64) -> bool {
        self.edges()
            .zip(&self.on_border)
            .filter(|(_, border)| **border)
            .any(|((a, b), _)| segment_hits_box(a, b, (x - half, y - half), (x + half, y + half)))
    }
}

/// Liang-Barsky clip of segment `a`-`b` against a closed axis-aligned box.
fn segment_hits_box(a: (f64, f64), b: (f64, f64), min: (f64, f64), max: (f64, f64)) -> bool {
    let dx = b.0 - a.0;
    let dy = b.1 - a.1;
    let mut t0 = 0.0_f64;
    let mut t1 = 1.0_f64;

    for (p, q) in [
        (-dx, a.0 - min.0),
        (dx, max.0 - a.0),
        (-dy, a.1 - min.1),
        (dy, max.1 - a.1),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return false;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return false;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return false;
            }
            t1 = t1.min(r);
        }
    }
    true
}

/// All 16 shapes scaled to a patch size.
#[derive(Debug, Clone)]
pub struct PatchLibrary {
    patch_size: u32,
    offset: i64,
    shapes: Vec<PatchShape>,
}

impl PatchLibrary {
    /// Build the shapes for `patch_size` pixel patches.
    ///
    /// Grid point `v` maps to `((v % 5) * scale - offset, (v / 5) * scale - offset)`
    /// with `scale = patch_size / 4` and `offset = patch_size / 2`.
    pub fn new(patch_size: u32) -> Self {
        let scale = patch_size as i64 / PATCH_CELLS;
        let offset = patch_size as i64 / 2;
        let shapes = PATCH_VERTICES
            .iter()
            .map(|indices| PatchShape::from_grid(indices, scale, offset))
            .collect();

        Self {
            patch_size,
            offset,
            shapes,
        }
    }

    pub fn patch_size(&self) -> u32 {
        self.patch_size
    }

    /// Distance from a patch's top-left corner to its center.
    pub fn offset(&self) -> i64 {
        self.offset
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Shape for `index`, taken modulo the library size.
    pub fn shape(&self, index: usize) -> &PatchShape {
        &self.shapes[index % PATCH_COUNT]
    }

    /// Flags for `index`, taken modulo the library size.
    pub fn flags(&self, index: usize) -> PatchFlags {
        PATCH_FLAGS[index % PATCH_COUNT]
    }

    /// Library index of the center shape chosen by a 2-bit selector.
    pub fn center_shape(selector: u32) -> usize {
        CENTER_PATCHES[(selector & 0x3) as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_shapes_are_closed() {
        let library = PatchLibrary::new(20);
        assert_eq!(library.len(), PATCH_COUNT);
        for i in 0..PATCH_COUNT {
            let v = library.shape(i).vertices();
            assert_eq!(v.first(), v.last(), "shape {} not closed", i);
        }
    }

    #[test]
    fn test_implicitly_closed_shape_gets_closing_vertex() {
        let shape = PatchShape::from_grid(&[0, 4, 20], 5, 10);
        assert_eq!(shape.vertices(), &[(-10, -10), (10, -10), (-10, 10), (-10, -10)]);
    }

    #[test]
    fn test_vertex_mapping_default_size() {
        let library = PatchLibrary::new(20);
        assert_eq!(library.offset(), 10);
        assert_eq!(
            library.shape(0).vertices(),
            &[(-10, -10), (10, -10), (10, 10), (-10, 10), (-10, -10)]
        );
        assert_eq!(
            library.shape(8).vertices(),
            &[(-5, -5), (5, -5), (5, 5), (-5, 5), (-5, -5)]
        );
    }

    #[test]
    fn test_shape_index_wraps() {
        let library = PatchLibrary::new(20);
        assert_eq!(library.shape(17), library.shape(1));
        assert_eq!(library.flags(31), library.flags(15));
    }

    #[test]
    fn test_flags_table() {
        let library = PatchLibrary::new(20);
        for i in [0, 4, 8] {
            assert!(library.flags(i).contains(PatchFlags::SYMMETRIC));
            assert!(!library.flags(i).contains(PatchFlags::INVERTED));
        }
        assert_eq!(library.flags(15).bits(), 3);
        for i in [1, 2, 3, 5, 6, 7, 9, 10, 11, 12, 13, 14] {
            assert_eq!(library.flags(i), PatchFlags::NONE);
        }
    }

    #[test]
    fn test_center_shapes() {
        assert_eq!(PatchLibrary::center_shape(0), 0);
        assert_eq!(PatchLibrary::center_shape(1), 4);
        assert_eq!(PatchLibrary::center_shape(2), 8);
        assert_eq!(PatchLibrary::center_shape(3), 15);
        assert_eq!(PatchLibrary::center_shape(7), 15);
    }

    #[test]
    fn test_contains_triangle() {
        // patch 1: top edge plus the diagonal down to the bottom-left corner
        let library = PatchLibrary::new(20);
        let tri = library.shape(1);
        assert!(tri.contains(-5.5, -5.5));
        assert!(!tri.contains(5.5, 5.5));
    }

    #[test]
    fn test_outline_touches_edges_only() {
        let library = PatchLibrary::new(20);
        let square = library.shape(8);
        assert!(square.outline_touches(-4.5, 0.5, 0.5));
        assert!(square.outline_touches(-5.5, 0.5, 0.5));
        assert!(!square.outline_touches(0.5, 0.5, 0.5));
        assert!(!square.outline_touches(-7.5, 0.5, 0.5));
    }

    #[test]
    fn test_border_edges() {
        let library = PatchLibrary::new(20);

        // full square: every edge is on the border
        let full = library.shape(0);
        assert!(full.border_touches(-9.5, 0.5, 0.5));
        assert!(full.border_touches(0.5, 9.5, 0.5));
        assert!(!full.border_touches(-8.5, 0.5, 0.5));

        // patch 1: top and left edges are on the border, the diagonal is not
        let tri = library.shape(1);
        assert!(tri.border_touches(-5.5, -9.5, 0.5));
        assert!(tri.border_touches(-9.5, -5.5, 0.5));
        assert!(!tri.border_touches(0.5, -0.5, 0.5));
        assert!(tri.outline_touches(0.5, -0.5, 0.5));

        // inner square never reaches the border
        let inner = library.shape(8);
        assert!(!inner.border_touches(-4.5, 0.5, 0.5));
    }

    #[test]
    fn test_segment_hits_box() {
        assert!(segment_hits_box((0.0, 0.0), (10.0, 10.0), (4.0, 4.0), (5.0, 5.0)));
        assert!(!segment_hits_box((0.0, 0.0), (10.0, 0.0), (4.0, 1.0), (5.0, 2.0)));
        // touching the box boundary counts
        assert!(segment_hits_box((0.0, 1.0), (10.0, 1.0), (4.0, 1.0), (5.0, 2.0)));
    }
}
