use super::error::*;
use super::grid::Grid;
use super::{Quadrant, Quadtree, QuadtreeNode};

impl QuadtreeNode {
	/// Draws this node and its sections into the `width` x `height` block
	/// of `out` whose top-left corner is at (`x`, `y`).
	///
	/// A leaf covering more than one pixel is drawn as a solid block of its
	/// color. Will return an `Err` if a branch is reached at single-pixel
	/// extent, or if the block doesn't fit in `out`.
	pub fn render(
		&self,
		out: &mut Grid,
		x: u32,
		y: u32,
		width: u32,
		height: u32
	) -> Result<(), RenderError> {
		match self {
			QuadtreeNode::Leaf(c) if width == 1 && height == 1 => out.put(x, y, *c)?,
			QuadtreeNode::Leaf(c) => out.fill_rect(x, y, width, height, *c)?,
			QuadtreeNode::Branch(sects) => {
				if width < 2 || height < 2 {
					return Err(RenderError::TooDeep { x, y });
				}
				let (half_w, half_h) = (width / 2, height / 2);
				for (quadrant, section) in Quadrant::ALL.iter().zip(sects.iter()) {
					let (x_off, y_off) = quadrant.offset(half_w, half_h);
					section.render(out, x + x_off, y + y_off, half_w, half_h)?;
				}
			}
		}
		Ok(())
	}
}

impl Quadtree {
	/// Reconstructs a `width` x `height` grid from the tree.
	///
	/// The target must be a square with power-of-two sides, at least as
	/// large as the deepest branch requires; larger targets scale each
	/// leaf up to a bigger block.
	pub fn render(&self, width: u32, height: u32) -> Result<Grid, RenderError> {
		if width != height {
			return Err(RenderError::NonSquare);
		}
		if !width.is_power_of_two() {
			return Err(RenderError::NonPowerOfTwo);
		}
		let mut out = Grid::allocate(width, height)?;
		self.root.render(&mut out, 0, 0, width, height)?;
		tracing::debug!(width, leaves = self.leaf_count(), "rendered quadtree");
		Ok(out)
	}

	/// Analyzes an image into a full-depth quadtree.
	///
	/// See `Quadtree::from_grid` for the meaning of `parallel`.
	pub fn from_image(img: &image::RgbaImage, parallel: bool) -> Result<Quadtree, BuildError> {
		Quadtree::from_grid(&Grid::from_image(img), parallel)
	}

	/// Renders the tree into a new image of `size` x `size` pixels.
	pub fn to_image(&self, size: u32) -> Result<image::RgbaImage, RenderError> {
		Ok(self.render(size, size)?.to_image())
	}
}

impl Grid {
	/// Copies the pixels of a decoded image.
	pub fn from_image(img: &image::RgbaImage) -> Grid {
		Grid {
			width: img.width(),
			height: img.height(),
			pixels: img.pixels().copied().collect(),
		}
	}

	/// Copies the grid into an image buffer for encoding.
	pub fn to_image(&self) -> image::RgbaImage {
		image::RgbaImage::from_fn(self.width, self.height, |x, y| {
			self.pixels[y as usize * self.width as usize + x as usize]
		})
	}
}

impl From<&image::RgbaImage> for Grid {
	fn from(img: &image::RgbaImage) -> Grid {
		Grid::from_image(img)
	}
}

impl From<&Grid> for image::RgbaImage {
	fn from(grid: &Grid) -> image::RgbaImage {
		grid.to_image()
	}
}
