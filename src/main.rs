use anyhow::Result;
use iconforge::pipeline::{self, Encoders};
use iconforge::{cli, probe};

fn main() -> Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = cli::get_config()?;
    let converters = probe::probe(&probe::PathLocator);
    let report = pipeline::run(&config, &Encoders::from_converters(&converters))?;

    println!();
    println!("Glyphs: {}", report.glyph_count);
    if !report.errors.is_empty() {
        println!("Errors: {}", report.errors.len());
        for error in &report.errors {
            println!("  • {}", error);
        }
    }
    println!("Generated files:");
    for line in report.files.summary() {
        println!("  • {}", line);
    }

    Ok(())
}
