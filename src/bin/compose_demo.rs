use line_composer::backgrounds::BackgroundPool;
use line_composer::compose::LineCompositor;
use line_composer::config::load_config;
use line_composer::glyphs::GlyphStore;
use line_composer::image::io::save_gray_buffer;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::env;
use std::fs;
use std::path::Path;

fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Warn)
        .init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let mut args = env::args().skip(1);
    let config_path = args.next().ok_or_else(usage)?;
    let text = args.next().ok_or_else(usage)?;
    let config = load_config(Path::new(&config_path)).map_err(|e| e.to_string())?;

    let store = GlyphStore::load(&config.inputs.char_dict, &config.inputs.glyph_dir)
        .map_err(|e| e.to_string())?;
    let backgrounds = match &config.inputs.background_dir {
        Some(dir) => BackgroundPool::load(dir),
        None => BackgroundPool::default(),
    };

    let compositor = LineCompositor::new(&store, &backgrounds, config.compose.to_compose_options());
    let generation = &config.generation;
    let mut rng = StdRng::seed_from_u64(generation.seed);
    let (image, label) = compositor.compose_line(
        &text,
        generation.style.as_deref(),
        generation.add_background,
        generation.apply_augmentation,
        &mut rng,
    );
    let image = image.ok_or_else(|| format!("No renderable characters in {text:?}"))?;

    fs::create_dir_all(&config.output.directory)
        .map_err(|e| format!("Failed to create {}: {e}", config.output.directory.display()))?;
    let format = config.output.to_output_format();
    let out_path = config
        .output
        .directory
        .join(format!("demo_line.{}", format.extension()));
    save_gray_buffer(&image, &out_path, format).map_err(|e| e.to_string())?;

    println!("Composed a {}x{} line labeled {label:?}", image.w, image.h);
    println!("Saved to {}", out_path.display());

    Ok(())
}

fn usage() -> String {
    "Usage: compose_demo <config.json> <text>".to_string()
}
