//! Destructible per-cell terrain.

use crate::config::TerrainProfile;

/// Dense solid/empty grid with one column per horizontal world unit.
///
/// Cells are addressed by integer `(x, y)` with `y` growing toward the world
/// floor. Solidity inside a column is not required to be contiguous: blasts
/// may leave floating islands behind and those are kept as they are.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Terrain {
    width: u32,
    height: u32,
    // column-major: index = x * height + y
    cells: Vec<bool>,
    revision: u64,
}

impl Terrain {
    /// Creates a terrain without any solid cells.
    #[must_use]
    pub fn empty(width: u32, height: u32) -> Self {
        let capacity = usize::try_from(u64::from(width) * u64::from(height)).unwrap_or(0);
        Self {
            width,
            height,
            cells: vec![false; capacity],
            revision: 0,
        }
    }

    /// Builds a terrain whose column `x` is solid from `surface(x)` down to the floor.
    ///
    /// Surfaces below the floor leave the column empty.
    #[must_use]
    pub fn from_surface<F>(width: u32, height: u32, mut surface: F) -> Self
    where
        F: FnMut(u32) -> u32,
    {
        let mut terrain = Self::empty(width, height);
        for x in 0..width {
            let top = surface(x).min(height);
            for y in top..height {
                if let Some(index) = terrain.index(i64::from(x), i64::from(y)) {
                    terrain.cells[index] = true;
                }
            }
        }
        terrain
    }

    /// Generates the rolling hills described by `profile`.
    #[must_use]
    pub fn generate(width: u32, height: u32, profile: &TerrainProfile) -> Self {
        Self::from_surface(width, height, |x| profile_height(profile, height, x))
    }

    /// Number of columns.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Counter bumped whenever a carve removes at least one cell.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Reports whether the cell is solid. Cells outside the grid are empty.
    #[must_use]
    pub fn is_solid(&self, x: i64, y: i64) -> bool {
        self.index(x, y)
            .and_then(|index| self.cells.get(index).copied())
            .unwrap_or(false)
    }

    /// Topmost solid row of column `x`, or the world floor when the column is empty.
    #[must_use]
    pub fn surface_y(&self, x: i64) -> u32 {
        let Some(column) = self.column(x) else {
            return self.height;
        };
        column
            .iter()
            .position(|solid| *solid)
            .and_then(|row| u32::try_from(row).ok())
            .unwrap_or(self.height)
    }

    /// Clears every cell within `radius` of `(cx, cy)` and returns how many were solid.
    ///
    /// Only the bounding square of the circle is scanned; each cell is kept or
    /// cleared by the Euclidean distance between its integer coordinate and
    /// the centre.
    pub fn carve(&mut self, cx: f32, cy: f32, radius: f32) -> u32 {
        if !(radius >= 0.0) || !cx.is_finite() || !cy.is_finite() || self.cells.is_empty() {
            return 0;
        }

        let max_x = i64::from(self.width) - 1;
        let max_y = i64::from(self.height) - 1;
        let x0 = ((cx - radius).floor() as i64).max(0);
        let x1 = ((cx + radius).ceil() as i64).min(max_x);
        let y0 = ((cy - radius).floor() as i64).max(0);
        let y1 = ((cy + radius).ceil() as i64).min(max_y);

        let mut cleared = 0;
        for x in x0..=x1 {
            let dx = x as f32 - cx;
            for y in y0..=y1 {
                let dy = y as f32 - cy;
                if (dx * dx + dy * dy).sqrt() > radius {
                    continue;
                }
                if let Some(index) = self.index(x, y) {
                    if self.cells[index] {
                        self.cells[index] = false;
                        cleared += 1;
                    }
                }
            }
        }

        if cleared > 0 {
            self.revision = self.revision.wrapping_add(1);
        }
        cleared
    }

    /// Cells of column `x` ordered from the top row to the floor.
    #[must_use]
    pub fn column(&self, x: i64) -> Option<&[bool]> {
        if x < 0 || x >= i64::from(self.width) {
            return None;
        }
        let height = usize::try_from(self.height).ok()?;
        let start = usize::try_from(x).ok()? * height;
        self.cells.get(start..start + height)
    }

    /// Total number of solid cells.
    #[must_use]
    pub fn solid_count(&self) -> usize {
        self.cells.iter().filter(|solid| **solid).count()
    }

    fn index(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return None;
        }
        let height = usize::try_from(self.height).ok()?;
        Some(usize::try_from(x).ok()? * height + usize::try_from(y).ok()?)
    }
}

fn profile_height(profile: &TerrainProfile, height: u32, x: u32) -> u32 {
    let x = x as f32;
    let base = height as f32 - profile.base_offset;
    let surface = base
        + profile.primary_amplitude * (x / profile.primary_period).sin()
        + profile.secondary_amplitude * (x / profile.secondary_period).sin();
    surface.floor().clamp(0.0, height as f32) as u32
}
