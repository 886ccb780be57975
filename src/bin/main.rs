use anyhow::Context;
use crossterm::execute;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use dialect_core::core::dictionary::Dictionary;
use dialect_core::persistence::{load_dictionary, save_to_disk};
use dialect_core::{TranslationEngine, TranslationResult};
use std::io::{stdin, stdout, Write};
use std::path::Path;
use tracing::warn;
use tracing_subscriber::EnvFilter;

const PLACEHOLDER: &str = "Übersetzung erscheint hier...";
const TRANSLATED: Color = Color::Rgb { r: 0x10, g: 0xb9, b: 0x81 };
const UNCHANGED: Color = Color::Rgb { r: 0xe8, g: 0xe8, b: 0xe8 };

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let dictionary = match std::env::args().nth(1) {
        Some(path) => load_dictionary(Path::new(&path))
            .with_context(|| format!("could not load dictionary '{}'", path))?,
        None => Dictionary::builtin().context("built-in dictionary is malformed")?,
    };
    let engine = TranslationEngine::new(dictionary);

    println!("Österreichisch Vorschau. Type 'exit' to quit.");
    println!("---------------------------------------------------------------");
    println!("'export <file>' writes the active dictionary as a bundle.");
    println!("z.B.: Hallo, wie geht es dir?\n");

    loop {
        print!("> ");
        stdout().flush()?;

        let mut input = String::new();
        if stdin().read_line(&mut input)? == 0 {
            break;
        }
        let text = input.trim();

        match text.split_once(' ') {
            Some(("export", path)) => export(&engine, Path::new(path.trim())),
            _ => match text {
                "exit" => break,
                "" => print_line(PLACEHOLDER, UNCHANGED)?,
                s => print_result(&engine.translate(s))?,
            },
        }
    }
    Ok(())
}

/// Writes the loaded dictionary as a bundle that can be passed back in as
/// the first argument.
fn export(engine: &TranslationEngine, path: &Path) {
    let data = engine.dictionary().to_data();
    match save_to_disk(&data, path) {
        Ok(()) => println!("Bundle written to {}", path.display()),
        Err(e) => {
            warn!("Export failed: {}", e);
            println!("Could not write {}: {}", path.display(), e);
        }
    }
}

fn print_result(result: &TranslationResult) -> anyhow::Result<()> {
    let colour = if result.changed { TRANSLATED } else { UNCHANGED };
    print_line(&result.output_text, colour)
}

fn print_line(text: &str, colour: Color) -> anyhow::Result<()> {
    execute!(
        stdout(),
        SetForegroundColor(colour),
        Print(text),
        ResetColor,
        Print("\n")
    )?;
    Ok(())
}
