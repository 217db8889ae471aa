pub mod node;

pub use node::{validate_dimensions, Pixel, Quadrant, Quadtree, QuadtreeNode};
pub use node::error::CompressError;
pub use node::grid::Grid;
pub use node::prune::DEFAULT_THRESHOLD;

/// Parameters for one compression run.
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
	/// Maximum color variance (on the normalized 0 to 1 scale) of four
	/// sibling leaves that still allows merging them.
	pub threshold: f32,
	/// Whether to build and prune large trees on multiple threads.
	/// Has no effect without the `threads` feature.
	pub parallel: bool,
}

impl Default for Settings {
	fn default() -> Self {
		Settings {
			threshold: DEFAULT_THRESHOLD,
			parallel: true,
		}
	}
}

/// Builds a quadtree from `grid`, prunes it with the given settings and
/// renders it back into a grid of the same size.
///
/// Fails before doing any work if the grid isn't a square with
/// power-of-two sides or the threshold is outside `0.0..=1.0`.
pub fn compress(grid: &Grid, settings: &Settings) -> Result<Grid, CompressError> {
	if !(0.0..=1.0).contains(&settings.threshold) {
		return Err(CompressError::InvalidThreshold);
	}
	let mut tree = Quadtree::from_grid(grid, settings.parallel)?;
	let merges = tree.prune(settings.threshold, settings.parallel)?;
	tracing::info!(
		width = grid.width(),
		height = grid.height(),
		nodes = tree.node_count(),
		merges,
		"compressed grid"
	);
	Ok(tree.render(grid.width(), grid.height())?)
}
