use super::error::MetricsError;
use super::metrics::{average, variance};
use super::{Pixel, Quadtree, QuadtreeNode};

/// Compression threshold used when none is given: only near-identical
/// sections are merged.
pub const DEFAULT_THRESHOLD: f32 = 0.0005;

/// Trees shallower than this are pruned on the current thread even when
/// parallel recursion is requested.
#[cfg(feature = "threads")]
const PARALLEL_MIN_DEPTH: u32 = 6;

impl QuadtreeNode {
	/// Colors of the four sections, if they are all leaves.
	fn leaf_sections(&self) -> Option<[Pixel; 4]> {
		match self {
			QuadtreeNode::Leaf(_) => None,
			QuadtreeNode::Branch(sects) => Some([
				sects[0].color()?,
				sects[1].color()?,
				sects[2].color()?,
				sects[3].color()?,
			]),
		}
	}

	/// Replaces this branch with a single leaf of the average color of its
	/// sections, if they are all leaves and their variance is below
	/// `threshold`. The discarded sections are dropped.
	///
	/// Returns whether the merge happened.
	fn merge(&mut self, threshold: f32) -> Result<bool, MetricsError> {
		let colors = match self.leaf_sections() {
			Some(c) => c,
			None => return Ok(false),
		};
		let avg = average(&colors)?;
		let var = variance(&avg, &colors)?;
		if var < threshold {
			tracing::trace!(variance = var, ?avg, "merging sections");
			*self = QuadtreeNode::Leaf(avg);
			Ok(true)
		} else {
			Ok(false)
		}
	}

	/// Merges sections bottom-up wherever four sibling leaves have a color
	/// variance below `threshold`.
	///
	/// A branch is only considered once all of its sections are leaves,
	/// so merging proceeds one level at a time from the bottom; a branch
	/// with any remaining branch below it is never merged.
	///
	/// Returns the number of merges performed.
	pub fn prune(&mut self, threshold: f32) -> Result<usize, MetricsError> {
		let sects = match self {
			QuadtreeNode::Leaf(_) => return Ok(0),
			QuadtreeNode::Branch(sects) => sects,
		};
		let mut merges = 0;
		for section in sects.iter_mut() {
			merges += section.prune(threshold)?;
		}
		if self.merge(threshold)? {
			merges += 1;
		}
		Ok(merges)
	}

	/// Same as `prune`, but for the top `levels` levels of the tree the four
	/// sections are pruned on separate rayon tasks.
	#[cfg(feature = "threads")]
	pub fn prune_par(&mut self, threshold: f32, levels: u32) -> Result<usize, MetricsError> {
		if levels == 0 {
			return self.prune(threshold);
		}
		let sects = match self {
			QuadtreeNode::Leaf(_) => return Ok(0),
			QuadtreeNode::Branch(sects) => sects,
		};
		let [tl, tr, bl, br] = &mut **sects;
		let ((a, b), (c, d)) = rayon::join(
			|| rayon::join(|| tl.prune_par(threshold, levels - 1), || tr.prune_par(threshold, levels - 1)),
			|| rayon::join(|| bl.prune_par(threshold, levels - 1), || br.prune_par(threshold, levels - 1)),
		);
		let mut merges = a? + b? + c? + d?;
		if self.merge(threshold)? {
			merges += 1;
		}
		Ok(merges)
	}
}

impl Quadtree {
	/// Prunes the whole tree in place; see `QuadtreeNode::prune`.
	///
	/// With `parallel` set (and the `threads` feature enabled), the upper
	/// levels of deep trees are pruned concurrently. Merge decisions only
	/// depend on subtree contents, so the result is the same either way.
	pub fn prune(&mut self, threshold: f32, parallel: bool) -> Result<usize, MetricsError> {
		#[cfg(feature = "threads")]
		let merges = {
			let depth = self.depth();
			if parallel && depth > PARALLEL_MIN_DEPTH {
				self.root.prune_par(threshold, depth - PARALLEL_MIN_DEPTH)?
			} else {
				self.root.prune(threshold)?
			}
		};
		#[cfg(not(feature = "threads"))]
		let merges = {
			let _ = parallel;
			self.root.prune(threshold)?
		};
		tracing::debug!(
			threshold,
			merges,
			leaves_after = self.leaf_count(),
			"pruned quadtree"
		);
		Ok(merges)
	}
}
