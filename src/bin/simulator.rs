use anyhow::Context;
use dialect_core::config::RuntimeConfig;
use dialect_core::dom::{Document, HostTree, NodeId};
use dialect_core::settings::{JsonFileStore, SettingsStore, SettingsUpdate};
use dialect_core::{ChatTranslator, TranslationEngine};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_SETTINGS_PATH: &str = "settings.json";
const DEFAULT_CONFIG_PATH: &str = "runtime.json";

fn settings_path() -> PathBuf {
    std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_PATH))
}

fn new_container(doc: &mut Document) -> NodeId {
    doc.create_element("div", &[("data-a-target", "chat-scroller")])
}

/// Appends one chat line. With `fragment` the text sits in a text-fragment
/// span, otherwise it is loose text inside the message.
fn post(doc: &mut Document, container: NodeId, user: &str, text: &str, fragment: bool) {
    let line = doc.create_element("div", &[("class", "chat-line__message")]);
    let author = doc.create_element("span", &[("class", "chat-author__display-name")]);
    let author_text = doc.create_text(&format!("{}: ", user));
    doc.append_child(author, author_text);
    doc.append_child(line, author);

    let body_text = doc.create_text(text);
    if fragment {
        let body = doc.create_element("span", &[("class", "text-fragment")]);
        doc.append_child(body, body_text);
        doc.append_child(line, body);
    } else {
        doc.append_child(line, body_text);
    }
    doc.append_child(container, line);
}

fn tick_delta(arg: &str) -> anyhow::Result<u64> {
    arg.parse::<u64>()
        .with_context(|| format!("'{}' is not a number of milliseconds", arg))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();
    info!("--- Chat simulator starting ---");

    let config = RuntimeConfig::load_or_default(DEFAULT_CONFIG_PATH)
        .context("could not read runtime config")?;
    let mut store = JsonFileStore::new(settings_path());
    info!(path = %store.path().display(), "settings store");
    let engine = TranslationEngine::builtin().context("built-in dictionary is malformed")?;

    let mut doc = Document::new();
    let root = doc.document_root();
    let mut container = new_container(&mut doc);
    doc.append_child(root, container);

    let mut translator = ChatTranslator::start(doc, engine, &mut store, config);
    let mut now: u64 = 0;
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let input = line?;
        let (command, rest) = match input.trim().split_once(' ') {
            Some((c, r)) => (c, r.trim()),
            None => (input.trim(), ""),
        };

        match command {
            "READY" => translator.host_mut().set_ready(true),
            "MESSAGE" | "FRAGMENT" => {
                let (user, text) = rest.split_once(' ').unwrap_or((rest, ""));
                post(translator.host_mut(), container, user, text, command == "FRAGMENT");
            }
            "SWAP_CONTAINER" => {
                let doc = translator.host_mut();
                let fresh = new_container(doc);
                if doc.replace(container, fresh) {
                    container = fresh;
                }
            }
            "SET" => {
                let (field, value) = rest.split_once(' ').unwrap_or((rest, ""));
                match SettingsUpdate::from_field(field, value) {
                    Ok(update) => {
                        if let Err(e) = store.update(update) {
                            warn!("Error saving settings: {}", e);
                        }
                    }
                    Err(e) => writeln!(stdout, "ERROR {}", e)?,
                }
            }
            "TICK" => match tick_delta(rest) {
                Ok(ms) => now += ms,
                Err(e) => writeln!(stdout, "ERROR {}", e)?,
            },
            "DUMP" => {
                let host = translator.host();
                for child in host.children(container) {
                    let text = host.text_content(child).unwrap_or_default();
                    writeln!(stdout, "LINE {}", text)?;
                }
                writeln!(stdout, "STATE {:?}", translator.watch_state())?;
            }
            "PREVIEW" => {
                let result = translator.preview(rest);
                writeln!(stdout, "PREVIEW {} {}", result.changed, result.output_text)?;
            }
            "EXIT" => break,
            "" => {}
            other => writeln!(stdout, "ERROR unknown command '{}'", other)?,
        }

        let stats = translator.tick(now);
        if stats.translated > 0 {
            writeln!(stdout, "TRANSLATED {}", stats.translated)?;
        }
        stdout.flush()?;
    }
    info!("Chat simulator shutting down.");
    Ok(())
}
