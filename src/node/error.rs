use std::fmt;

/// Reason why a grid couldn't be allocated or split.
#[derive(Debug, PartialEq)]
pub enum GridError {
	/// The pixel buffer for a `width` x `height` grid could not be reserved.
	Allocation { width: u32, height: u32 },
	/// A pixel buffer's length does not match the dimensions given with it.
	LengthMismatch { expected: usize, found: usize },
	/// The grid is too small to split into quadrants.
	TooSmall,
	/// A region reaches past the edge of the grid.
	OutOfBounds,
}

/// Reason why a grid couldn't be turned into a quadtree.
#[derive(Debug, PartialEq)]
pub enum BuildError {
	/// The grid's dimensions are not equal; the grid is not a square.
	NonSquare,
	/// The grid's dimensions are not powers of two.
	NonPowerOfTwo,
	/// The grid has no pixels at all.
	Empty,
	/// A quadrant grid could not be allocated.
	Grid(GridError),
}

/// Reason why a quadtree couldn't be rendered to a grid.
#[derive(Debug, PartialEq)]
pub enum RenderError {
	/// The target dimensions are not equal; the target is not a square.
	NonSquare,
	/// The target dimensions are not powers of two.
	NonPowerOfTwo,
	/// A branch was reached at single-pixel extent, so the tree is deeper
	/// than the target can hold.
	TooDeep { x: u32, y: u32 },
	/// The target grid could not be allocated.
	Grid(GridError),
}

/// Reason why a color statistic couldn't be computed.
#[derive(Debug, PartialEq)]
pub enum MetricsError {
	/// No pixels were supplied.
	Empty,
}

/// Reason why a full compression run failed.
#[derive(Debug, PartialEq)]
pub enum CompressError {
	/// The threshold is not a number in `0.0..=1.0`.
	InvalidThreshold,
	Build(BuildError),
	Render(RenderError),
	Metrics(MetricsError),
}

impl fmt::Display for GridError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			GridError::Allocation { width, height } =>
				write!(f, "could not allocate a {}x{} grid", width, height),
			GridError::LengthMismatch { expected, found } =>
				write!(f, "expected {} pixels, found {}", expected, found),
			GridError::TooSmall => f.write_str("grid is too small to split"),
			GridError::OutOfBounds => f.write_str("region exceeds the grid"),
		}
	}
}

impl fmt::Display for BuildError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			BuildError::NonSquare => f.write_str("grid is not square"),
			BuildError::NonPowerOfTwo => f.write_str("grid dimensions are not powers of two"),
			BuildError::Empty => f.write_str("grid has a zero dimension"),
			BuildError::Grid(e) => write!(f, "{}", e),
		}
	}
}

impl fmt::Display for RenderError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			RenderError::NonSquare => f.write_str("render target is not square"),
			RenderError::NonPowerOfTwo => f.write_str("render target dimensions are not powers of two"),
			RenderError::TooDeep { x, y } =>
				write!(f, "branch node reached at single pixel ({}, {})", x, y),
			RenderError::Grid(e) => write!(f, "{}", e),
		}
	}
}

impl fmt::Display for MetricsError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			MetricsError::Empty => f.write_str("no pixels to measure"),
		}
	}
}

impl fmt::Display for CompressError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			CompressError::InvalidThreshold => f.write_str("threshold must lie between 0 and 1"),
			CompressError::Build(e) => write!(f, "build failed: {}", e),
			CompressError::Render(e) => write!(f, "render failed: {}", e),
			CompressError::Metrics(e) => write!(f, "prune failed: {}", e),
		}
	}
}

impl std::error::Error for GridError {}
impl std::error::Error for BuildError {}
impl std::error::Error for RenderError {}
impl std::error::Error for MetricsError {}
impl std::error::Error for CompressError {}

impl From<GridError> for BuildError {
	fn from(e: GridError) -> Self { BuildError::Grid(e) }
}

impl From<GridError> for RenderError {
	fn from(e: GridError) -> Self { RenderError::Grid(e) }
}

impl From<BuildError> for CompressError {
	fn from(e: BuildError) -> Self { CompressError::Build(e) }
}

impl From<RenderError> for CompressError {
	fn from(e: RenderError) -> Self { CompressError::Render(e) }
}

impl From<MetricsError> for CompressError {
	fn from(e: MetricsError) -> Self { CompressError::Metrics(e) }
}
