//! CLI command for playing a dialogue graph in the terminal

use anyhow::Context;
use std::cell::Cell;
use std::io::{BufRead, Write};
use std::path::Path;
use std::rc::Rc;

use taletree::dialogue::{DialoguePresenter, DialogueSession, read_graph};
use taletree::loca::{LanguageRegistry, LocalizationBroadcaster};

/// Terminal implementation of the presentation surface
#[derive(Default)]
struct TerminalPresenter {
    active: bool,
}

impl DialoguePresenter for TerminalPresenter {
    fn show_dialogue(&mut self, speaker: &str, prompt: &str, responses: &[String]) {
        println!();
        println!("{speaker}: {prompt}");
        for (i, response) in responses.iter().enumerate() {
            println!("  [{}] {response}", i + 1);
        }
        self.active = true;
    }

    fn hide(&mut self) {
        if self.active {
            println!("(dialogue closed)");
        }
        self.active = false;
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

pub fn execute(graph_path: &Path, languages: &Path, language: Option<&str>) -> anyhow::Result<()> {
    let graph = read_graph(graph_path)
        .with_context(|| format!("failed to load graph {}", graph_path.display()))?;

    let mut registry = LanguageRegistry::new();
    registry.add_source(languages);
    registry
        .load_all()
        .with_context(|| format!("failed to load languages from {}", languages.display()))?;

    let default = match language {
        Some(name) => name.to_string(),
        None => registry
            .names()
            .next()
            .map(str::to_string)
            .unwrap_or_default(),
    };
    let mut localization = LocalizationBroadcaster::with_default(registry, &default);
    if let Some(current) = localization.current_language() {
        println!("Language: {current}");
    } else {
        println!("No language loaded; keys will be shown as-is");
    }
    println!("Pick a response by number. :lang <name> switches language, :quit ends.");

    // Re-render the current node whenever the language changes
    let refresh_needed = Rc::new(Cell::new(false));
    {
        let flag = refresh_needed.clone();
        localization.subscribe(move || flag.set(true));
    }

    let mut presenter = TerminalPresenter::default();
    let mut session = DialogueSession::new(&graph);
    session
        .start(&localization, &mut presenter)
        .context("could not start the dialogue")?;

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();

    while session.is_active() {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next() else {
            session.end(&mut presenter);
            break;
        };
        let line = line?;
        let input = line.trim();

        if input.is_empty() {
            continue;
        }

        if input == ":quit" || input == ":q" {
            session.end(&mut presenter);
            break;
        }

        if let Some(name) = input.strip_prefix(":lang ") {
            localization.set_language(name.trim());
            if refresh_needed.take() && session.is_active() {
                session.refresh(&localization, &mut presenter)?;
            }
            continue;
        }

        if input == ":langs" {
            for name in localization.registry().names() {
                println!("{name}");
            }
            continue;
        }

        let Ok(choice) = input.parse::<usize>() else {
            println!("Enter a response number, :lang <name>, :langs, or :quit");
            continue;
        };
        if choice == 0 {
            println!("Responses are numbered from 1");
            continue;
        }

        match session.select_response(choice - 1, &localization, &mut presenter) {
            Ok(_) => {}
            Err(taletree::Error::DanglingResponse { .. }) => {
                println!("The conversation ends here.");
            }
            Err(err) => return Err(err.into()),
        }
    }

    Ok(())
}
