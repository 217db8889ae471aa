use super::error::MetricsError;
use super::Pixel;

/// Per-channel sums of several pixels, wide enough to never overflow
/// for any number of pixels a quadtree node can cover.
type BigColor = image::Rgba<u64>;

/// `(2 * 256)^2 * 4`, the bound every squared distance is divided by.
///
/// Not the tightest bound (that would be `255^2 * 4`), but distances and
/// therefore thresholds are expressed on this scale.
pub const DISTANCE_NORMALIZER: f32 = 1_048_576.;

fn channel_diff_squared(a: u8, b: u8) -> u32 {
	let d = (a as i32 - b as i32).abs() as u32;
	d * d
}

fn color_add_big(a: BigColor, b: &Pixel) -> BigColor {
	image::Rgba::<u64>([
		a.0[0] + b.0[0] as u64,
		a.0[1] + b.0[1] as u64,
		a.0[2] + b.0[2] as u64,
		a.0[3] + b.0[3] as u64,
	])
}

fn color_div(a: BigColor, b: u64) -> Pixel {
	image::Rgba::<u8>([
		(a.0[0] / b) as u8,
		(a.0[1] / b) as u8,
		(a.0[2] / b) as u8,
		(a.0[3] / b) as u8,
	])
}

/// Squared Euclidean distance between two colors over all four channels.
pub fn distance_squared(a: &Pixel, b: &Pixel) -> u32 {
	a.0.iter().zip(b.0.iter()).map(|(&x, &y)| channel_diff_squared(x, y)).sum()
}

/// Channel-wise mean of `pixels`, truncated toward zero.
pub fn average(pixels: &[Pixel]) -> Result<Pixel, MetricsError> {
	if pixels.is_empty() {
		return Err(MetricsError::Empty);
	}
	let sum = pixels.iter().fold(image::Rgba::<u64>([0; 4]), color_add_big);
	Ok(color_div(sum, pixels.len() as u64))
}

/// Distance between two colors, normalized by `DISTANCE_NORMALIZER`.
pub fn distance(a: &Pixel, b: &Pixel) -> f32 {
	distance_squared(a, b) as f32 / DISTANCE_NORMALIZER
}

/// Mean normalized distance of `pixels` from `avg`.
pub fn variance(avg: &Pixel, pixels: &[Pixel]) -> Result<f32, MetricsError> {
	if pixels.is_empty() {
		return Err(MetricsError::Empty);
	}
	let total: f32 = pixels.iter().map(|p| distance(avg, p)).sum();
	Ok(total / pixels.len() as f32)
}
