use crate::{defs::MAX_SCREEN_WIDTH, renderer::RenderError, world::TextureId};

pub type VisplaneId = u16;

/// Record 0 is never handed out; its columns all read as defined, which
/// forces the first lookup of every wall to go through [`PlaneMap::find_plane`].
pub const SENTINEL_PLANE: VisplaneId = 0;

/// Most records a pool can hold, sentinel included, before ids would wrap
/// back onto the sentinel.
pub const MAX_PLANE_RECORDS: usize = VisplaneId::MAX as usize + 1;

/// Inclusive vertical span of one plane column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScreenYPair {
    pub top: u16,
    pub bottom: u16,
}

impl ScreenYPair {
    pub const UNDEFINED: Self = Self {
        top: u16::MAX,
        bottom: 0,
    };

    #[inline(always)]
    pub fn is_undefined(self) -> bool {
        self.top == u16::MAX
    }

    #[inline(always)]
    pub fn is_defined(self) -> bool {
        !self.is_undefined()
    }
}

/// One floor or ceiling surface visible somewhere on screen.
#[derive(Clone, Debug)]
pub struct VisPlane {
    /// View-relative height of the surface.
    pub height: f32,
    pub flat: TextureId,
    pub light: u32,

    /// Inclusive horizontal range that the plane touches.
    pub min_x: i32,
    pub max_x: i32,

    /// Vertical span per screen column, [`ScreenYPair::UNDEFINED`] where the
    /// plane does not reach.
    pub cols: Vec<ScreenYPair>,
}

impl VisPlane {
    fn sentinel() -> Self {
        Self {
            height: 0.0,
            flat: 0,
            light: 0,
            min_x: 0,
            max_x: -1,
            cols: vec![ScreenYPair { top: 0, bottom: 0 }; MAX_SCREEN_WIDTH],
        }
    }

    /// Horizontal runs of this plane, row by row, in the order a span
    /// rasterizer walks them.
    pub fn spans(&self, screen_height: u32) -> Vec<PlaneSpan> {
        let mut out = Vec::new();
        if self.min_x > self.max_x {
            return out;
        }

        for y in 0..screen_height.min(u16::MAX as u32) as u16 {
            let mut xs = None; // start of the current run

            for x in self.min_x..=self.max_x {
                let c = self.cols[x as usize];
                let inside = c.is_defined() && c.top <= y && c.bottom >= y;

                if inside {
                    xs.get_or_insert(x);
                } else if let Some(start) = xs.take() {
                    out.push(PlaneSpan {
                        y,
                        x_start: start,
                        x_end: x - 1,
                    });
                }
            }

            if let Some(start) = xs {
                // tail-run
                out.push(PlaneSpan {
                    y,
                    x_start: start,
                    x_end: self.max_x,
                });
            }
        }
        out
    }
}

/// One horizontal run of a visplane, both ends inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlaneSpan {
    pub y: u16,
    pub x_start: i32,
    pub x_end: i32,
}

/// Fixed-capacity visplane pool, reused frame after frame.
pub struct PlaneMap {
    planes: Vec<VisPlane>,
    /// One past the last record in use; 1 when only the sentinel exists.
    end: usize,
    limit: usize,
    width: usize,
}

impl PlaneMap {
    /// `capacity` counts the sentinel record and is capped at
    /// [`MAX_PLANE_RECORDS`].
    pub fn new(capacity: usize, width: usize) -> Self {
        let capacity = capacity.min(MAX_PLANE_RECORDS);
        let mut planes = Vec::with_capacity(capacity);
        planes.push(VisPlane::sentinel());
        Self {
            planes,
            end: 1,
            limit: capacity,
            width,
        }
    }

    /// Forget every plane of the previous frame; allocations are kept.
    pub fn clear(&mut self, width: usize) {
        self.end = 1;
        self.width = width;
    }

    /// Planes in use, sentinel excluded.
    #[inline]
    pub fn len(&self) -> usize {
        self.end - 1
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.end == 1
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.limit
    }

    #[inline]
    pub fn get(&self, id: VisplaneId) -> &VisPlane {
        &self.planes[..self.end][id as usize]
    }

    #[inline]
    pub fn get_mut(&mut self, id: VisplaneId) -> &mut VisPlane {
        &mut self.planes[..self.end][id as usize]
    }

    /// Finished planes in allocation order, sentinel excluded.
    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &VisPlane> + '_ {
        self.planes[1..self.end].iter()
    }

    /// Find a plane after `after` with the same height, flat and light whose
    /// column `start` is still free, widening it to `start..=stop`; otherwise
    /// allocate a fresh one.
    ///
    /// Only planes *after* `after` are scanned and only column `start` is
    /// tested, so two records with equal keys may coexist. Rendering stays
    /// correct, only less batched.
    pub fn find_plane(
        &mut self,
        after: VisplaneId,
        height: f32,
        flat: TextureId,
        start: i32,
        stop: i32,
        light: u32,
    ) -> Result<VisplaneId, RenderError> {
        let first = after as usize + 1;
        for idx in first..self.end {
            let plane = &mut self.planes[idx];
            if plane.height == height
                && plane.flat == flat
                && plane.light == light
                && plane.cols[start as usize].is_undefined()
            {
                plane.min_x = plane.min_x.min(start);
                plane.max_x = plane.max_x.max(stop);
                return Ok(idx as VisplaneId);
            }
        }

        self.alloc(height, flat, start, stop, light)
    }

    fn alloc(
        &mut self,
        height: f32,
        flat: TextureId,
        start: i32,
        stop: i32,
        light: u32,
    ) -> Result<VisplaneId, RenderError> {
        if self.end >= self.limit {
            return Err(RenderError::VisplaneOverflow { limit: self.limit });
        }

        if self.end == self.planes.len() {
            self.planes.push(VisPlane {
                height,
                flat,
                light,
                min_x: start,
                max_x: stop,
                cols: vec![ScreenYPair::UNDEFINED; MAX_SCREEN_WIDTH],
            });
        } else {
            let plane = &mut self.planes[self.end];
            plane.height = height;
            plane.flat = flat;
            plane.light = light;
            plane.min_x = start;
            plane.max_x = stop;
            plane.cols[..self.width].fill(ScreenYPair::UNDEFINED);
        }

        let id = self.end as VisplaneId;
        self.end += 1;
        Ok(id)
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
#[cfg(test)]
mod tests {
    use super::*;

    fn mark(planes: &mut PlaneMap, id: VisplaneId, cols: std::ops::RangeInclusive<i32>) {
        for x in cols {
            planes.get_mut(id).cols[x as usize] = ScreenYPair { top: 10, bottom: 20 };
        }
    }

    #[test]
    fn first_lookup_always_allocates() {
        let mut planes = PlaneMap::new(8, 224);
        assert!(planes.get(SENTINEL_PLANE).cols[0].is_defined());
        let id = planes.find_plane(SENTINEL_PLANE, 0.0, 5, 0, 50, 128).unwrap();
        assert_eq!(id, 1);
        assert_eq!(planes.len(), 1);
        assert!(planes.get(id).cols[..224].iter().all(|c| c.is_undefined()));
    }

    #[test]
    fn adjacent_ranges_with_equal_keys_merge() {
        let mut planes = PlaneMap::new(8, 224);
        let a = planes.find_plane(SENTINEL_PLANE, 0.0, 5, 0, 50, 128).unwrap();
        mark(&mut planes, a, 0..=50);

        // column 51 is still undefined when the second run starts
        let b = planes.find_plane(SENTINEL_PLANE, 0.0, 5, 51, 100, 128).unwrap();
        assert_eq!(a, b);
        assert_eq!(planes.len(), 1);
        let p = planes.get(a);
        assert_eq!((p.min_x, p.max_x), (0, 100));
    }

    #[test]
    fn different_light_never_merges() {
        let mut planes = PlaneMap::new(8, 224);
        let a = planes.find_plane(SENTINEL_PLANE, 0.0, 5, 0, 50, 128).unwrap();
        let b = planes.find_plane(SENTINEL_PLANE, 0.0, 5, 51, 100, 96).unwrap();
        assert_ne!(a, b);
        assert_eq!(planes.len(), 2);
    }

    #[test]
    fn occupied_start_column_forces_a_new_plane() {
        let mut planes = PlaneMap::new(8, 224);
        let a = planes.find_plane(SENTINEL_PLANE, 8.0, 1, 10, 20, 64).unwrap();
        mark(&mut planes, a, 10..=20);
        let b = planes.find_plane(SENTINEL_PLANE, 8.0, 1, 15, 30, 64).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn scan_starts_after_the_given_plane() {
        let mut planes = PlaneMap::new(8, 224);
        let a = planes.find_plane(SENTINEL_PLANE, 0.0, 5, 0, 10, 128).unwrap();
        // an equal-keyed, free plane *before* `after` is not considered
        let b = planes.find_plane(a, 0.0, 5, 11, 20, 128).unwrap();
        assert_ne!(a, b);
        assert_eq!(planes.len(), 2);
    }

    #[test]
    fn pool_exhaustion_is_reported() {
        let mut planes = PlaneMap::new(3, 224);
        planes.find_plane(SENTINEL_PLANE, 0.0, 1, 0, 1, 0).unwrap();
        planes.find_plane(SENTINEL_PLANE, 0.0, 2, 0, 1, 0).unwrap();
        assert_eq!(
            planes.find_plane(SENTINEL_PLANE, 0.0, 3, 0, 1, 0),
            Err(RenderError::VisplaneOverflow { limit: 3 })
        );
    }

    #[test]
    fn clear_recycles_records() {
        let mut planes = PlaneMap::new(3, 224);
        let a = planes.find_plane(SENTINEL_PLANE, 0.0, 1, 0, 1, 0).unwrap();
        mark(&mut planes, a, 0..=1);
        planes.clear(224);
        assert!(planes.is_empty());

        let b = planes.find_plane(SENTINEL_PLANE, 4.0, 2, 3, 9, 7).unwrap();
        assert_eq!(a, b);
        let p = planes.get(b);
        assert_eq!((p.height, p.flat, p.light, p.min_x, p.max_x), (4.0, 2, 7, 3, 9));
        assert!(p.cols[0].is_undefined());
    }

    #[test]
    fn spans_split_rows_into_runs() {
        let mut planes = PlaneMap::new(4, 16);
        let id = planes.find_plane(SENTINEL_PLANE, 0.0, 1, 2, 6, 0).unwrap();
        let p = planes.get_mut(id);
        for x in [2, 3, 5, 6] {
            p.cols[x] = ScreenYPair { top: 1, bottom: 1 };
        }

        let spans = planes.get(id).spans(4);
        assert_eq!(
            spans,
            vec![
                PlaneSpan { y: 1, x_start: 2, x_end: 3 },
                PlaneSpan { y: 1, x_start: 5, x_end: 6 },
            ]
        );
    }

    #[test]
    fn oversized_pools_stop_before_ids_wrap() {
        let mut planes = PlaneMap::new(70_000, 0);
        assert_eq!(planes.capacity(), MAX_PLANE_RECORDS);

        // stand in for 65 534 earlier allocations without their columns
        let spare = VisPlane {
            cols: Vec::new(),
            ..VisPlane::sentinel()
        };
        planes.planes.resize(MAX_PLANE_RECORDS - 1, spare);
        planes.end = MAX_PLANE_RECORDS - 1;

        let last = planes.find_plane(VisplaneId::MAX - 1, 1.0, 1, 0, 0, 0).unwrap();
        assert_eq!(last, VisplaneId::MAX);
        assert_ne!(last, SENTINEL_PLANE);
        assert_eq!(
            planes.find_plane(VisplaneId::MAX, 2.0, 1, 0, 0, 0),
            Err(RenderError::VisplaneOverflow {
                limit: MAX_PLANE_RECORDS
            })
        );
    }
}
