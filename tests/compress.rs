//! End-to-end tests: grid -> quadtree -> pruned quadtree -> grid.

use proptest::prelude::*;

use quadtree_prune::node::error::{BuildError, CompressError};
use quadtree_prune::{compress, Grid, Pixel, Quadtree, QuadtreeNode, Settings, DEFAULT_THRESHOLD};

const PALETTE: [Pixel; 4] = [
	image::Rgba([10, 20, 30, 255]),
	image::Rgba([11, 20, 30, 255]),
	image::Rgba([200, 40, 0, 255]),
	image::Rgba([0, 0, 0, 0]),
];

fn sequential(threshold: f32) -> Settings {
	Settings { threshold, parallel: false }
}

/// Square grids of 1x1 up to 32x32, colored from a small palette so that
/// some sibling groups are similar and some are not.
fn palette_grid() -> impl Strategy<Value = Grid> {
	(0u32..=5).prop_flat_map(|log| {
		let size = 1u32 << log;
		prop::collection::vec(0usize..PALETTE.len(), (size * size) as usize)
			.prop_map(move |inds| {
				let pixels = inds.into_iter().map(|i| PALETTE[i]).collect();
				Grid::from_pixels(size, size, pixels).unwrap()
			})
	})
}

#[test]
fn uniform_grid_is_lossless() {
	let color = image::Rgba([10, 20, 30, 255]);
	let grid = Grid::from_pixel(4, 4, color).unwrap();
	let mut tree = Quadtree::from_grid(&grid, false).unwrap();
	tree.prune(DEFAULT_THRESHOLD, false).unwrap();
	assert_eq!(tree.root, QuadtreeNode::Leaf(color));
	let out = tree.render(4, 4).unwrap();
	assert_eq!((out.width(), out.height()), (4, 4));
	assert!(out.pixels().iter().all(|p| *p == color));
}

#[test]
fn large_uniform_grid_collapses() {
	let color = image::Rgba([1, 2, 3, 4]);
	let grid = Grid::from_pixel(128, 128, color).unwrap();
	let mut tree = Quadtree::from_grid(&grid, true).unwrap();
	tree.prune(DEFAULT_THRESHOLD, true).unwrap();
	assert_eq!(tree.node_count(), 1);
	assert_eq!(compress(&grid, &Settings::default()), Ok(grid));
}

#[test]
fn stripes_are_lossless() {
	// Every 2x2 group holds two black and two white pixels.
	let pixels = (0..16u32 * 16)
		.map(|n| if n % 2 == 0 { image::Rgba([0, 0, 0, 255]) } else { image::Rgba([255, 255, 255, 255]) })
		.collect();
	let grid = Grid::from_pixels(16, 16, pixels).unwrap();
	let mut tree = Quadtree::from_grid(&grid, false).unwrap();
	assert_eq!(tree.prune(DEFAULT_THRESHOLD, false), Ok(0));
	assert_eq!(tree.leaf_count(), 256);
	assert_eq!(tree.render(16, 16).unwrap(), grid);
}

#[test]
fn near_identical_quadrants_merge() {
	// Left half differs by one unit of red, which is well below the threshold.
	let pixels = (0..8u32 * 8).map(|n| PALETTE[(n % 8 < 4) as usize]).collect();
	let grid = Grid::from_pixels(8, 8, pixels).unwrap();
	let out = compress(&grid, &sequential(DEFAULT_THRESHOLD)).unwrap();
	let first = out.pixels()[0];
	assert!(out.pixels().iter().all(|p| *p == first));
	assert_eq!(first, image::Rgba([10, 20, 30, 255]));
}

#[test]
fn non_power_of_two_is_rejected() {
	let grid = Grid::allocate(12, 12).unwrap();
	assert_eq!(
		compress(&grid, &Settings::default()),
		Err(CompressError::Build(BuildError::NonPowerOfTwo))
	);
}

#[test]
fn empty_grid_is_rejected() {
	let grid = Grid::allocate(0, 0).unwrap();
	assert_eq!(Quadtree::from_grid(&grid, false), Err(BuildError::Empty));
}

proptest! {
	#![proptest_config(ProptestConfig::with_cases(64))]

	#[test]
	fn output_has_input_dimensions(grid in palette_grid()) {
		let out = compress(&grid, &sequential(DEFAULT_THRESHOLD)).unwrap();
		prop_assert_eq!((out.width(), out.height()), (grid.width(), grid.height()));
	}

	#[test]
	fn zero_threshold_is_lossless(grid in palette_grid()) {
		prop_assert_eq!(compress(&grid, &sequential(0.)), Ok(grid));
	}

	#[test]
	fn prune_is_idempotent(grid in palette_grid(), threshold in 0f32..0.05) {
		let mut tree = Quadtree::from_grid(&grid, false).unwrap();
		tree.prune(threshold, false).unwrap();
		let once = tree.clone();
		prop_assert_eq!(tree.prune(threshold, false), Ok(0));
		prop_assert_eq!(tree, once);
	}

	#[test]
	fn pruning_never_adds_leaves(grid in palette_grid(), threshold in 0f32..1.) {
		let mut tree = Quadtree::from_grid(&grid, false).unwrap();
		let before = tree.leaf_count();
		let merges = tree.prune(threshold, false).unwrap();
		prop_assert_eq!(tree.leaf_count(), before - 3 * merges);
	}

	#[test]
	fn allocation_has_height_rows_of_width(width in 1u32..64, height in 1u32..64) {
		let grid = Grid::allocate(width, height).unwrap();
		prop_assert_eq!(grid.pixels().len(), (width * height) as usize);
		prop_assert!(grid.get(width - 1, height - 1).is_some());
		prop_assert!(grid.get(width, 0).is_none());
		prop_assert!(grid.get(0, height).is_none());
	}

	#[test]
	fn parallel_matches_sequential(grid in palette_grid(), threshold in 0f32..0.05) {
		let seq = compress(&grid, &sequential(threshold));
		let par = compress(&grid, &Settings { threshold, parallel: true });
		prop_assert_eq!(seq, par);
	}
}
