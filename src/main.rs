use image::error::ImageError;

use quadtree_prune::node::error::{BuildError, GridError, RenderError};
use quadtree_prune::{validate_dimensions, Quadtree, Settings, DEFAULT_THRESHOLD};

use tracing::info;
use tracing_subscriber::EnvFilter;

/// Helper function for `main`.
fn error_exit(msg: &str, code: i32) -> ! {
	eprintln!("{}", msg);
	std::process::exit(code)
}

fn build_exit(e: BuildError) -> ! {
	match e {
		BuildError::Grid(GridError::Allocation { .. }) => error_exit("Image is too large to process", 5),
		_ => error_exit("Input image has invalid dimensions", 4),
	}
}

fn render_exit(e: RenderError) -> ! {
	match e {
		RenderError::NonSquare |
		RenderError::NonPowerOfTwo => error_exit("Invalid output dimensions", 2),
		RenderError::TooDeep { .. } => error_exit("Output width is smaller than the compressed image", 2),
		RenderError::Grid(GridError::Allocation { .. }) => error_exit("Output image is too large", 5),
		RenderError::Grid(_) => error_exit("An error occurred", 10),
	}
}

/// `clap`-based CLI for compressing images with a quadtree.
///
/// May exit process with status code if there are errors:
///
/// 1: `clap` error
///
/// 2: invalid arguments
///
/// 3: file I/O issues
///
/// 4: invalid image data
///
/// 5: computation limits exceeded
///
/// 10: other, potentially unknown error
fn main() {
	tracing_subscriber::fmt()
		.with_writer(std::io::stderr)
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
		.init();

	let clap_matches = clap::App::new("quadtree_prune")
		.version(env!("CARGO_PKG_VERSION"))
		.author("vkcz")
		.about("Lossily compresses an image by merging near-uniform squares of a quadtree.")
		.arg_from_usage("-t, --threshold=[N] 'Largest color variance (0 to 1) of four squares that still merges them; defaults to 0.0005'")
		.arg_from_usage("-w, --width=[N] 'Output image width (and height); must be a power of two; defaults to the input width'")
		.arg_from_usage("-j, --sequential 'Build and prune on a single thread'")
		.arg_from_usage("<INPUT> 'Path to input file; must be a square with power-of-two sides'")
		.arg_from_usage("[OUTPUT] 'Path to output file; defaults to INPUT with a .qt.png extension'")
		.get_matches();

	let input_path = match clap_matches.value_of("INPUT") {
		Some(p) => p,
		None => error_exit("Missing input path", 1)
	};
	let source = match image::open(input_path) {
		Ok(i) => i,
		Err(e) => {
			let (msg, code) = match e {
				ImageError::Decoding(_) => ("Invalid image data", 4),
				ImageError::Unsupported(_) => ("Unsupported image format", 4),
				ImageError::Limits(_) => ("Computation limits exceeded", 5),
				ImageError::IoError(_) => ("File not found or could not be read", 3),
				_ => ("An error occurred", 10)
			};
			error_exit(msg, code)
		}
	}.into_rgba8();
	info!(path = input_path, width = source.width(), height = source.height(), "image loaded");

	let settings = Settings {
		threshold: match clap_matches.value_of("threshold").map(str::parse::<f32>) {
			None => DEFAULT_THRESHOLD,
			Some(Ok(n)) if (0.0..=1.0).contains(&n) => n,
			Some(_) => error_exit("Threshold must be a number from 0 to 1", 2)
		},
		parallel: !clap_matches.is_present("sequential"),
	};
	let width = match clap_matches.value_of("width").map(str::parse::<u32>) {
		None => source.width(),
		Some(Ok(n)) => n,
		Some(Err(_)) => error_exit("Non-numeric value for width", 2)
	};

	if let Err(e) = validate_dimensions(source.width(), source.height()) {
		build_exit(e);
	}
	let mut tree = match Quadtree::from_image(&source, settings.parallel) {
		Ok(t) => t,
		Err(e) => build_exit(e)
	};
	let merges = match tree.prune(settings.threshold, settings.parallel) {
		Ok(m) => m,
		Err(_) => error_exit("An error occurred", 10)
	};
	info!(
		threshold = settings.threshold,
		merges,
		nodes = tree.node_count(),
		"compressed"
	);

	let output = match tree.to_image(width) {
		Ok(o) => o,
		Err(e) => render_exit(e)
	};
	let default_output = input_path.rsplitn(2, '.').last().unwrap_or(input_path).to_string() + ".qt.png";
	let output_path = clap_matches.value_of("OUTPUT").unwrap_or(&default_output);
	match output.save(output_path) {
		Ok(_) => info!(path = output_path, "image written"),
		Err(_) => error_exit("Could not save output", 3)
	}
}
