//! The interactive read-eval-print loop (§6).

use crate::config::Config;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use wisp_core::{Interpreter, Value};

/// Drive `interp` interactively until EOF (Ctrl-D), then print `Goodbye`.
pub fn run(interp: &mut Interpreter, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let mut editor = DefaultEditor::new()?;
    if let Some(path) = &config.history_file {
        let _ = editor.load_history(path);
    }

    loop {
        let mut input = || match editor.readline("") {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = editor.add_history_entry(line.as_str());
                }
                Some(line)
            }
            Err(ReadlineError::Interrupted) => Some(String::new()),
            Err(_) => None,
        };

        let expr = match interp.read_expression(&config.prompt1, &config.prompt2, &mut input) {
            Ok(Value::Eof) => break,
            Ok(expr) => expr,
            Err(err) => {
                tracing::warn!(%err, "reader error");
                println!("{err}");
                continue;
            }
        };

        match interp.evaluate_global(expr) {
            Ok(Value::None) => {}
            Ok(value) => println!("{}", interp.stringify(&value)),
            Err(err) => {
                tracing::warn!(%err, "evaluation error");
                println!("{err}");
            }
        }
    }

    if let Some(path) = &config.history_file {
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let _ = editor.save_history(path);
    }
    println!("Goodbye");
    Ok(())
}
