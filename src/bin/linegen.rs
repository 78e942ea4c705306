use line_composer::backgrounds::BackgroundPool;
use line_composer::config::load_config;
use line_composer::corpus::CorpusSource;
use line_composer::generator::LineSampleGenerator;
use line_composer::glyphs::GlyphStore;
use std::env;
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
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = load_config(Path::new(&config_path)).map_err(|e| e.to_string())?;

    let store = GlyphStore::load(&config.inputs.char_dict, &config.inputs.glyph_dir)
        .map_err(|e| e.to_string())?;
    println!(
        "Loaded {} glyph images covering {} characters from {}",
        store.glyph_count(),
        store.available_characters().len(),
        config.inputs.glyph_dir.display()
    );

    let corpus = match &config.inputs.corpus_dir {
        Some(dir) => CorpusSource::load(dir, &config.inputs.corpus_files),
        None => CorpusSource::default(),
    };
    if !corpus.is_empty() {
        println!("Loaded {} corpus lines", corpus.len());
    }

    let backgrounds = match &config.inputs.background_dir {
        Some(dir) => BackgroundPool::load(dir),
        None => BackgroundPool::default(),
    };
    if !backgrounds.is_empty() {
        println!("Loaded {} background images", backgrounds.len());
    }

    let generator = LineSampleGenerator::new(
        store,
        corpus,
        backgrounds,
        config.compose.to_compose_options(),
        config.to_generator_options(),
    )
    .map_err(|e| e.to_string())?;

    let summary = generator.generate().map_err(|e| e.to_string())?;
    println!(
        "Generated {}/{} samples ({} skipped) in {} ms",
        summary.produced, summary.requested, summary.skipped, summary.elapsed_ms
    );
    println!("Labels written to {}", summary.labels_path.display());

    Ok(())
}

fn usage() -> String {
    "Usage: linegen <config.json>".to_string()
}
