//! Loading and evaluating a whole source file, used both by the one-shot
//! `wisp file` mode and the `wisp file -` load-then-REPL mode (§6).

use std::path::Path;
use wisp_core::Interpreter;

pub fn run_file(interp: &mut Interpreter, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(path = %path.display(), "loading script");
    let source = std::fs::read_to_string(path)?;
    interp.load_source(&source).map_err(|err| {
        tracing::error!(%err, path = %path.display(), "script evaluation failed");
        Box::new(err) as Box<dyn std::error::Error>
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use wisp_core::Value;

    #[test]
    fn runs_a_script_file_to_completion() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "(define x (+ 1 2))").unwrap();
        let mut interp = Interpreter::new();
        run_file(&mut interp, file.path()).unwrap();
        let x = interp.intern("x");
        assert_eq!(interp.global_env().get(&x).unwrap(), Value::Int(3));
    }

    #[test]
    fn reports_an_error_for_a_failing_script() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "(car 1)").unwrap();
        let mut interp = Interpreter::new();
        assert!(run_file(&mut interp, file.path()).is_err());
    }
}
