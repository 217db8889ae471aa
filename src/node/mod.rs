pub mod error;
pub mod grid;
pub mod metrics;

use error::BuildError;
use grid::Grid;

/// A single RGBA color with 8 bits per channel.
pub type Pixel = ::image::Rgba<u8>;

/// Grids at most this wide are built and pruned on the current thread
/// even when parallel recursion is requested.
#[cfg(feature = "threads")]
const PARALLEL_CUTOFF: u32 = 64;

/// One of the four sections of a square, in the order children are stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Quadrant {
	TopLeft,
	TopRight,
	BottomLeft,
	BottomRight,
}

impl Quadrant {
	pub const ALL: [Quadrant; 4] = [
		Quadrant::TopLeft,
		Quadrant::TopRight,
		Quadrant::BottomLeft,
		Quadrant::BottomRight,
	];

	/// Position of this quadrant's top-left corner relative to the parent's,
	/// given the quadrant's own width and height.
	pub fn offset(self, half_w: u32, half_h: u32) -> (u32, u32) {
		let ind = self as u32;
		((ind & 1) * half_w, (ind >> 1) * half_h)
	}
}

/// Node in a quadtree for storing an image.
///
/// A leaf stands for a uniformly colored square of any size; a branch
/// splits its square into four sections, stored in `Quadrant` order.
#[derive(Clone, Debug, PartialEq)]
pub enum QuadtreeNode {
	Leaf(Pixel),
	Branch(Box<[QuadtreeNode; 4]>),
}

impl QuadtreeNode {
	/// Recursively splits `grid` into quadrants until single pixels are
	/// reached, one leaf per pixel.
	///
	/// Both dimensions must be the same power of two; this is not checked
	/// here beyond failing when a dimension runs out before the other.
	pub fn build(grid: &Grid) -> Result<QuadtreeNode, BuildError> {
		match (grid.width(), grid.height()) {
			(1, 1) => grid.get(0, 0).map(QuadtreeNode::Leaf).ok_or(BuildError::Empty),
			(0, _) | (_, 0) => Err(BuildError::Empty),
			(1, _) | (_, 1) => Err(BuildError::NonSquare),
			_ => {
				let [tl, tr, bl, br] = grid.split4()?;
				Ok(QuadtreeNode::Branch(Box::new([
					QuadtreeNode::build(&tl)?,
					QuadtreeNode::build(&tr)?,
					QuadtreeNode::build(&bl)?,
					QuadtreeNode::build(&br)?,
				])))
			}
		}
	}

	/// Same as `build`, but sections larger than `PARALLEL_CUTOFF` are
	/// built on separate rayon tasks.
	#[cfg(feature = "threads")]
	pub fn build_par(grid: &Grid) -> Result<QuadtreeNode, BuildError> {
		if grid.width() <= PARALLEL_CUTOFF || grid.height() <= PARALLEL_CUTOFF {
			return QuadtreeNode::build(grid);
		}
		let [tl, tr, bl, br] = grid.split4()?;
		let ((a, b), (c, d)) = rayon::join(
			|| rayon::join(|| QuadtreeNode::build_par(&tl), || QuadtreeNode::build_par(&tr)),
			|| rayon::join(|| QuadtreeNode::build_par(&bl), || QuadtreeNode::build_par(&br)),
		);
		Ok(QuadtreeNode::Branch(Box::new([a?, b?, c?, d?])))
	}

	pub fn is_leaf(&self) -> bool {
		matches!(self, QuadtreeNode::Leaf(_))
	}

	/// The color of a leaf; `None` for a branch.
	pub fn color(&self) -> Option<Pixel> {
		match self {
			QuadtreeNode::Leaf(c) => Some(*c),
			QuadtreeNode::Branch(_) => None,
		}
	}

	pub fn section(&self, quadrant: Quadrant) -> Option<&QuadtreeNode> {
		match self {
			QuadtreeNode::Leaf(_) => None,
			QuadtreeNode::Branch(sects) => Some(&sects[quadrant as usize]),
		}
	}

	/// Number of nodes in this subtree, including itself.
	pub fn node_count(&self) -> usize {
		match self {
			QuadtreeNode::Leaf(_) => 1,
			QuadtreeNode::Branch(sects) => 1 + sects.iter().map(QuadtreeNode::node_count).sum::<usize>(),
		}
	}

	pub fn leaf_count(&self) -> usize {
		match self {
			QuadtreeNode::Leaf(_) => 1,
			QuadtreeNode::Branch(sects) => sects.iter().map(QuadtreeNode::leaf_count).sum(),
		}
	}

	/// Number of branch levels below this node; 0 for a leaf.
	pub fn depth(&self) -> u32 {
		match self {
			QuadtreeNode::Leaf(_) => 0,
			QuadtreeNode::Branch(sects) => 1 + sects.iter().map(QuadtreeNode::depth).max().unwrap_or(0),
		}
	}
}

/// Checks that a `width` x `height` grid can be turned into a quadtree:
/// both dimensions must be equal powers of two.
pub fn validate_dimensions(width: u32, height: u32) -> Result<(), BuildError> {
	if width == 0 || height == 0 {
		return Err(BuildError::Empty);
	}
	if !width.is_power_of_two() || !height.is_power_of_two() {
		return Err(BuildError::NonPowerOfTwo);
	}
	if width != height {
		return Err(BuildError::NonSquare);
	}
	Ok(())
}

/// A quadtree covering a whole image.
///
/// The tree doesn't know its own extent; it is supplied again when
/// rendering, and may differ from the size the tree was built from.
#[derive(Clone, Debug, PartialEq)]
pub struct Quadtree {
	pub root: QuadtreeNode,
}

impl Quadtree {
	/// Validates the dimensions of `grid` and builds a full-depth tree from it.
	///
	/// With `parallel` set (and the `threads` feature enabled), large
	/// sections are built concurrently; the result is identical.
	pub fn from_grid(grid: &Grid, parallel: bool) -> Result<Quadtree, BuildError> {
		validate_dimensions(grid.width(), grid.height())?;
		#[cfg(feature = "threads")]
		let root = if parallel {
			QuadtreeNode::build_par(grid)?
		} else {
			QuadtreeNode::build(grid)?
		};
		#[cfg(not(feature = "threads"))]
		let root = {
			let _ = parallel;
			QuadtreeNode::build(grid)?
		};
		tracing::debug!(
			width = grid.width(),
			nodes = root.node_count(),
			"built quadtree"
		);
		Ok(Quadtree { root })
	}

	pub fn node_count(&self) -> usize {
		self.root.node_count()
	}

	pub fn leaf_count(&self) -> usize {
		self.root.leaf_count()
	}

	pub fn depth(&self) -> u32 {
		self.root.depth()
	}
}

pub mod image;
pub mod prune;

#[cfg(test)]
mod tests {
	use super::*;

	fn gray(v: u8) -> Pixel {
		::image::Rgba([v, v, v, 255])
	}

	fn numbered(size: u32) -> Grid {
		let pixels = (0..size * size).map(|n| gray(n as u8)).collect();
		Grid::from_pixels(size, size, pixels).unwrap()
	}

	#[test]
	fn single_pixel_is_a_leaf() {
		let grid = Grid::from_pixel(1, 1, gray(7)).unwrap();
		assert_eq!(QuadtreeNode::build(&grid), Ok(QuadtreeNode::Leaf(gray(7))));
	}

	#[test]
	fn build_follows_quadrant_order() {
		let tree = QuadtreeNode::build(&numbered(2)).unwrap();
		let colors = Quadrant::ALL.iter()
			.map(|q| tree.section(*q).and_then(QuadtreeNode::color))
			.collect::<Vec<_>>();
		assert_eq!(colors, vec![Some(gray(0)), Some(gray(1)), Some(gray(2)), Some(gray(3))]);
	}

	#[test]
	fn build_is_full_depth() {
		let tree = QuadtreeNode::build(&numbered(8)).unwrap();
		assert_eq!(tree.depth(), 3);
		assert_eq!(tree.leaf_count(), 64);
		assert_eq!(tree.node_count(), 1 + 4 + 16 + 64);
		let deep = tree.section(Quadrant::BottomRight)
			.and_then(|n| n.section(Quadrant::TopLeft))
			.and_then(|n| n.section(Quadrant::TopRight))
			.and_then(QuadtreeNode::color);
		// Row 4, column 5
		assert_eq!(deep, Some(gray(4 * 8 + 5)));
	}

	#[test]
	fn build_rejects_running_out_of_one_dimension() {
		let grid = Grid::allocate(4, 2).unwrap();
		assert_eq!(QuadtreeNode::build(&grid), Err(BuildError::NonSquare));
		let grid = Grid::allocate(1, 8).unwrap();
		assert_eq!(QuadtreeNode::build(&grid), Err(BuildError::NonSquare));
	}

	#[test]
	fn quadrant_offsets() {
		assert_eq!(Quadrant::TopLeft.offset(4, 2), (0, 0));
		assert_eq!(Quadrant::TopRight.offset(4, 2), (4, 0));
		assert_eq!(Quadrant::BottomLeft.offset(4, 2), (0, 2));
		assert_eq!(Quadrant::BottomRight.offset(4, 2), (4, 2));
	}

	#[test]
	fn dimension_validation() {
		assert_eq!(validate_dimensions(0, 0), Err(BuildError::Empty));
		assert_eq!(validate_dimensions(6, 6), Err(BuildError::NonPowerOfTwo));
		assert_eq!(validate_dimensions(8, 4), Err(BuildError::NonSquare));
		assert_eq!(validate_dimensions(16, 16), Ok(()));
		assert_eq!(validate_dimensions(1, 1), Ok(()));
	}

	#[test]
	fn from_grid_validates_first() {
		let grid = Grid::allocate(8, 4).unwrap();
		assert_eq!(Quadtree::from_grid(&grid, false), Err(BuildError::NonSquare));
	}

	#[cfg(feature = "threads")]
	#[test]
	fn parallel_build_matches_sequential() {
		let grid = numbered(256);
		assert_eq!(
			QuadtreeNode::build_par(&grid),
			QuadtreeNode::build(&grid)
		);
	}
}
