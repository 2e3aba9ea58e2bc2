//! House Grid
//!
//! Discretized house map with wall and dust occupancy.
//!
//! # Features
//!
//! - Wall and dust occupancy with mutual exclusion
//! - Four-ray inside/outside test
//! - Rejection sampling of free spots inside the house
//! - Fixed-grid neighbourhood lookup for collision and vacuum checks
//! - Front/back wall sensors cast as short rays
//!
//! # Example
//!
//! ```rust
//! use vacuum_core::algorithms::house_grid::HouseGrid;
//! use vacuum_core::algorithms::layout;
//!
//! let mut house = HouseGrid::new(10, 10).unwrap();
//! house.set_walls(layout::rectangle(1, 1, 8, 8), (0, 0));
//!
//! assert!(house.is_inside(4, 4));
//! assert!(!house.is_inside(0, 4));
//! ```
//!
//! # Known approximation
//!
//! `is_inside` scans outward along the four axis directions and calls a cell
//! inside when every ray meets a wall. That is exact for a single, roughly
//! axis-spanning enclosure only. Concave or multi-room layouts can be
//! misclassified, e.g. an enclosed courtyard reads as inside.

use crate::error::{Result, VacuumError};
use crate::messages::{Pose2D, SensorDirection};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Default bound on rejection-sampling attempts
pub const DEFAULT_MAX_SAMPLE_ATTEMPTS: usize = 10_000;

/// Ray step along a sensor beam, in cells
const SENSOR_STEP: f64 = 0.5;

/// Axis-aligned cell rectangle used for sampling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: usize,
    pub max_x: usize,
    pub min_y: usize,
    pub max_y: usize,
}

impl Bounds {
    /// Shrink by `margin` on every side without ever inverting the rectangle
    pub fn inset(&self, margin: (usize, usize)) -> Bounds {
        let (mx, my) = margin;
        let lo_x = self.min_x.saturating_add(mx);
        let hi_x = self.max_x.saturating_sub(mx);
        let lo_y = self.min_y.saturating_add(my);
        let hi_y = self.max_y.saturating_sub(my);

        Bounds {
            min_x: lo_x.min(hi_x),
            max_x: hi_x.max(lo_x),
            min_y: lo_y.min(hi_y),
            max_y: hi_y.max(lo_y),
        }
    }

    /// Whether `[min+1, max)` is non-empty on both axes
    pub fn is_sampleable(&self) -> bool {
        self.min_x + 1 < self.max_x && self.min_y + 1 < self.max_y
    }

    /// Draw a cell from `[min_x+1, max_x) x [min_y+1, max_y)`
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> (usize, usize) {
        let x = rng.gen_range(self.min_x + 1..self.max_x);
        let y = rng.gen_range(self.min_y + 1..self.max_y);
        (x, y)
    }
}

/// Wall sensor beam model
///
/// The front sensor sits on the front rim and the back sensor on the rear
/// rim. Each casts a ray of `range_factor * radius` cells. Beam angles are
/// relative to the heading: by default the front beam looks straight ahead
/// and the back beam straight behind. Setting both to `-π/2` gives
/// side-looking sensors aimed at the robot's right.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorModel {
    pub range_factor: f64,
    pub front_beam: f64,
    pub back_beam: f64,
}

impl Default for SensorModel {
    fn default() -> Self {
        Self {
            range_factor: 1.5,
            front_beam: 0.0,
            back_beam: PI,
        }
    }
}

/// House map: wall and dust occupancy over a fixed grid
#[derive(Debug, Clone)]
pub struct HouseGrid {
    width: usize,
    height: usize,
    wall: Vec<bool>, // row-major, width * height
    dust: Vec<bool>,
    wall_bounds: Bounds,
    sample_bounds: Bounds,
    max_sample_attempts: usize,
}

impl HouseGrid {
    /// Create an empty house
    ///
    /// # Arguments
    /// * `width` - Grid width in cells
    /// * `height` - Grid height in cells
    pub fn new(width: usize, height: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(VacuumError::InvalidConfig(format!(
                "house dimensions must be positive, got {}x{}",
                width, height
            )));
        }

        let whole = Bounds {
            min_x: 0,
            max_x: width,
            min_y: 0,
            max_y: height,
        };

        Ok(Self {
            width,
            height,
            wall: vec![false; width * height],
            dust: vec![false; width * height],
            wall_bounds: whole,
            sample_bounds: whole,
            max_sample_attempts: DEFAULT_MAX_SAMPLE_ATTEMPTS,
        })
    }

    /// Set the rejection-sampling guard
    pub fn with_max_sample_attempts(mut self, attempts: usize) -> Self {
        self.max_sample_attempts = attempts.max(1);
        self
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Check if cell coordinates are on the grid
    pub fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    fn index(&self, x: usize, y: usize) -> usize {
        assert!(
            self.in_bounds(x, y),
            "cell ({}, {}) outside {}x{} house",
            x,
            y,
            self.width,
            self.height
        );
        y * self.width + x
    }

    /// Mark cells as walls and recompute the cached bounding rectangle
    ///
    /// `margin` is the (x, y) inset applied to the rectangle used by
    /// [`free_spot`](Self::free_spot). Dust under a new wall is removed.
    pub fn set_walls<I>(&mut self, cells: I, margin: (usize, usize))
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        for (x, y) in cells {
            let idx = self.index(x, y);
            self.wall[idx] = true;
            self.dust[idx] = false;
        }

        self.wall_bounds = self.compute_wall_bounds();
        self.sample_bounds = self.wall_bounds.inset(margin);
    }

    fn compute_wall_bounds(&self) -> Bounds {
        let mut bounds: Option<Bounds> = None;

        for (x, y) in self.wall_cells() {
            bounds = Some(match bounds {
                None => Bounds {
                    min_x: x,
                    max_x: x,
                    min_y: y,
                    max_y: y,
                },
                Some(b) => Bounds {
                    min_x: b.min_x.min(x),
                    max_x: b.max_x.max(x),
                    min_y: b.min_y.min(y),
                    max_y: b.max_y.max(y),
                },
            });
        }

        // No walls: the whole grid
        bounds.unwrap_or(Bounds {
            min_x: 0,
            max_x: self.width,
            min_y: 0,
            max_y: self.height,
        })
    }

    /// Smallest rectangle containing every wall cell
    pub fn wall_bounds(&self) -> Bounds {
        self.wall_bounds
    }

    /// Rectangle used by `free_spot`
    pub fn sample_bounds(&self) -> Bounds {
        self.sample_bounds
    }

    /// Wall bounds inset by a different margin
    pub fn inset_bounds(&self, margin: (usize, usize)) -> Bounds {
        self.wall_bounds.inset(margin)
    }

    pub fn is_wall(&self, x: usize, y: usize) -> bool {
        self.wall[self.index(x, y)]
    }

    pub fn is_dusty(&self, x: usize, y: usize) -> bool {
        self.dust[self.index(x, y)]
    }

    /// Check if a cell is inside the house (four-ray test)
    pub fn is_inside(&self, x: usize, y: usize) -> bool {
        // Bounds check up front so the scans below can index freely
        let _ = self.index(x, y);

        let left = (0..=x).rev().any(|i| self.wall[y * self.width + i]);
        let right = (x..self.width).any(|i| self.wall[y * self.width + i]);
        let up = (0..=y).rev().any(|j| self.wall[j * self.width + x]);
        let down = (y..self.height).any(|j| self.wall[j * self.width + x]);

        left && right && up && down
    }

    fn is_free(&self, x: usize, y: usize) -> bool {
        !self.is_wall(x, y) && !self.is_dusty(x, y) && self.is_inside(x, y)
    }

    /// Sample a free cell inside the house from the cached bounds
    pub fn free_spot<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<(usize, usize)> {
        self.free_spot_in(self.sample_bounds, rng)
    }

    /// Sample a cell that is not a wall, not dusty and inside the house
    ///
    /// Gives up after the configured number of attempts.
    pub fn free_spot_in<R: Rng + ?Sized>(
        &self,
        bounds: Bounds,
        rng: &mut R,
    ) -> Result<(usize, usize)> {
        self.sample_where(bounds, rng, |x, y| self.is_free(x, y))
    }

    /// Sample a free cell from the cached bounds with no wall center closer
    /// than `clearance`
    ///
    /// A robot of radius `clearance` placed here starts out of contact, even
    /// with walls inside the house.
    pub fn clear_spot<R: Rng + ?Sized>(
        &self,
        clearance: f64,
        rng: &mut R,
    ) -> Result<(usize, usize)> {
        self.sample_where(self.sample_bounds, rng, |x, y| {
            self.is_free(x, y) && self.walls_near(x as f64, y as f64, clearance).is_empty()
        })
    }

    fn sample_where<R, F>(
        &self,
        bounds: Bounds,
        rng: &mut R,
        accept: F,
    ) -> Result<(usize, usize)>
    where
        R: Rng + ?Sized,
        F: Fn(usize, usize) -> bool,
    {
        if !bounds.is_sampleable() {
            return Err(VacuumError::EmptyRegion);
        }

        for _ in 0..self.max_sample_attempts {
            let (x, y) = bounds.sample(rng);
            if self.in_bounds(x, y) && accept(x, y) {
                return Ok((x, y));
            }
        }

        Err(VacuumError::GeometryExhausted {
            attempts: self.max_sample_attempts,
        })
    }

    /// Check that the wall layout encloses at least one cell
    ///
    /// Samples up to `max_tries` cells from the wall bounds and succeeds on
    /// the first one that is inside.
    pub fn has_interior<R: Rng + ?Sized>(&self, rng: &mut R, max_tries: usize) -> bool {
        let bounds = self.wall_bounds;
        if !bounds.is_sampleable() {
            return false;
        }

        (0..max_tries).any(|_| {
            let (x, y) = bounds.sample(rng);
            self.in_bounds(x, y) && self.is_inside(x, y)
        })
    }

    /// Put dust on a cell. Returns false for wall cells, which never hold dust.
    pub fn dirty(&mut self, x: usize, y: usize) -> bool {
        let idx = self.index(x, y);
        if self.wall[idx] {
            return false;
        }
        self.dust[idx] = true;
        true
    }

    /// Remove dust from a cell. Returns whether there was dust.
    pub fn clean(&mut self, x: usize, y: usize) -> bool {
        let idx = self.index(x, y);
        std::mem::replace(&mut self.dust[idx], false)
    }

    /// Scatter `count` dust cells inside the house
    ///
    /// `margin` keeps the dust away from the wall bounds. Returns the number
    /// of cells placed, which is `count` on success.
    pub fn generate_dust<R: Rng + ?Sized>(
        &mut self,
        count: usize,
        margin: (usize, usize),
        rng: &mut R,
    ) -> Result<usize> {
        let bounds = self.inset_bounds(margin);

        for _ in 0..count {
            let (x, y) = self.free_spot_in(bounds, rng)?;
            self.dirty(x, y);
        }

        Ok(count)
    }

    /// All wall cells, row by row
    pub fn wall_cells(&self) -> Vec<(usize, usize)> {
        self.cells_where(&self.wall)
    }

    /// All dust cells, row by row
    pub fn dust_cells(&self) -> Vec<(usize, usize)> {
        self.cells_where(&self.dust)
    }

    pub fn dust_count(&self) -> usize {
        self.dust.iter().filter(|&&d| d).count()
    }

    fn cells_where(&self, layer: &[bool]) -> Vec<(usize, usize)> {
        layer
            .iter()
            .enumerate()
            .filter(|(_, &set)| set)
            .map(|(idx, _)| (idx % self.width, idx / self.width))
            .collect()
    }

    /// Wall cells whose centers lie strictly within `radius` of (x, y)
    pub fn walls_near(&self, x: f64, y: f64, radius: f64) -> Vec<(usize, usize)> {
        self.cells_near(&self.wall, x, y, radius)
    }

    /// Dust cells whose centers lie strictly within `radius` of (x, y)
    pub fn dust_near(&self, x: f64, y: f64, radius: f64) -> Vec<(usize, usize)> {
        self.cells_near(&self.dust, x, y, radius)
    }

    fn cells_near(&self, layer: &[bool], x: f64, y: f64, radius: f64) -> Vec<(usize, usize)> {
        let mut cells = Vec::new();

        let x_lo = (x - radius).floor().max(0.0);
        let y_lo = (y - radius).floor().max(0.0);
        let x_hi = (x + radius).ceil().min(self.width as f64 - 1.0);
        let y_hi = (y + radius).ceil().min(self.height as f64 - 1.0);

        if x_hi < x_lo || y_hi < y_lo {
            return cells;
        }

        for cy in y_lo as usize..=y_hi as usize {
            for cx in x_lo as usize..=x_hi as usize {
                if !layer[cy * self.width + cx] {
                    continue;
                }
                let dist = ((cx as f64 - x).powi(2) + (cy as f64 - y).powi(2)).sqrt();
                if dist < radius {
                    cells.push((cx, cy));
                }
            }
        }

        cells
    }

    /// Binary wall sensor
    ///
    /// Casts the front or back beam described by `model` from the matching
    /// rim of a robot of `radius` at `pose`. The beam stops at the grid edge.
    pub fn sense_wall(
        &self,
        pose: &Pose2D,
        radius: f64,
        direction: SensorDirection,
        model: &SensorModel,
    ) -> bool {
        let (mount_offset, beam) = match direction {
            SensorDirection::Front => (0.0, model.front_beam),
            SensorDirection::Back => (PI, model.back_beam),
        };
        let (mx, my) = pose.direction(mount_offset);
        let origin_x = pose.x + mx * radius;
        let origin_y = pose.y + my * radius;

        let (bx, by) = pose.direction(beam);
        let range = model.range_factor * radius;

        let steps = (range / SENSOR_STEP).ceil() as usize;
        for step in 0..=steps {
            let t = (step as f64 * SENSOR_STEP).min(range);
            let cx = (origin_x + bx * t).round();
            let cy = (origin_y + by * t).round();

            if cx < 0.0 || cy < 0.0 || cx >= self.width as f64 || cy >= self.height as f64 {
                return false;
            }
            if self.wall[cy as usize * self.width + cx as usize] {
                return true;
            }
        }

        false
    }
}
