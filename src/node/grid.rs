use super::error::GridError;
use super::{Pixel, Quadrant};

/// A rectangular block of pixels, stored as `height` rows of `width`
/// pixels each.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
	pub(crate) width: u32,
	pub(crate) height: u32,
	pub(crate) pixels: Vec<Pixel>,
}

impl Grid {
	/// Allocates a `width` x `height` grid of transparent black pixels.
	///
	/// Fails instead of aborting if the pixel buffer can't be reserved.
	pub fn allocate(width: u32, height: u32) -> Result<Grid, GridError> {
		let len = (width as usize).checked_mul(height as usize)
			.ok_or(GridError::Allocation { width, height })?;
		let mut pixels = Vec::new();
		pixels.try_reserve_exact(len)
			.map_err(|_| GridError::Allocation { width, height })?;
		pixels.resize(len, image::Rgba([0; 4]));
		Ok(Grid { width, height, pixels })
	}

	/// Wraps a row-major pixel buffer.
	pub fn from_pixels(width: u32, height: u32, pixels: Vec<Pixel>) -> Result<Grid, GridError> {
		let expected = width as usize * height as usize;
		if pixels.len() != expected {
			return Err(GridError::LengthMismatch { expected, found: pixels.len() });
		}
		Ok(Grid { width, height, pixels })
	}

	/// A grid filled with a single color.
	pub fn from_pixel(width: u32, height: u32, pixel: Pixel) -> Result<Grid, GridError> {
		let mut grid = Grid::allocate(width, height)?;
		grid.pixels.iter_mut().for_each(|p| *p = pixel);
		Ok(grid)
	}

	pub fn width(&self) -> u32 {
		self.width
	}

	pub fn height(&self) -> u32 {
		self.height
	}

	/// All pixels, row by row.
	pub fn pixels(&self) -> &[Pixel] {
		&self.pixels
	}

	pub fn into_pixels(self) -> Vec<Pixel> {
		self.pixels
	}

	fn index(&self, x: u32, y: u32) -> usize {
		y as usize * self.width as usize + x as usize
	}

	/// The pixel at column `x` of row `y`, if it exists.
	pub fn get(&self, x: u32, y: u32) -> Option<Pixel> {
		if x < self.width && y < self.height {
			Some(self.pixels[self.index(x, y)])
		} else {
			None
		}
	}

	pub fn put(&mut self, x: u32, y: u32, pixel: Pixel) -> Result<(), GridError> {
		if x >= self.width || y >= self.height {
			return Err(GridError::OutOfBounds);
		}
		let ind = self.index(x, y);
		self.pixels[ind] = pixel;
		Ok(())
	}

	/// Paints the `width` x `height` block whose top-left corner is at
	/// (`x`, `y`) in a single color.
	pub fn fill_rect(
		&mut self,
		x: u32,
		y: u32,
		width: u32,
		height: u32,
		pixel: Pixel
	) -> Result<(), GridError> {
		let fits = |start: u32, len: u32, max: u32| start.checked_add(len).map_or(false, |end| end <= max);
		if !fits(x, width, self.width) || !fits(y, height, self.height) {
			return Err(GridError::OutOfBounds);
		}
		for row in y..(y + height) {
			let start = self.index(x, row);
			self.pixels[start..start + width as usize]
				.iter_mut()
				.for_each(|p| *p = pixel);
		}
		Ok(())
	}

	/// Splits the grid along its center into four newly allocated grids
	/// of half the width and height, ordered top-left, top-right,
	/// bottom-left, bottom-right.
	pub fn split4(&self) -> Result<[Grid; 4], GridError> {
		if self.width < 2 || self.height < 2 {
			return Err(GridError::TooSmall);
		}
		let (half_w, half_h) = (self.width / 2, self.height / 2);
		let mut quads = [
			Grid::allocate(half_w, half_h)?,
			Grid::allocate(half_w, half_h)?,
			Grid::allocate(half_w, half_h)?,
			Grid::allocate(half_w, half_h)?,
		];
		for (quadrant, quad) in Quadrant::ALL.iter().zip(quads.iter_mut()) {
			let (x_off, y_off) = quadrant.offset(half_w, half_h);
			for row in 0..half_h {
				let src = self.index(x_off, y_off + row);
				let dst = quad.index(0, row);
				quad.pixels[dst..dst + half_w as usize]
					.copy_from_slice(&self.pixels[src..src + half_w as usize]);
			}
		}
		Ok(quads)
	}
}
