//! Interactive classification.
//!
//! Every line that is not a `:command` is classified and the result printed
//! as JSON.

use textglass_engine::{EngineHandle, EngineLoader};
use textglass_foundation::{Error, ErrorKind, Result};

use crate::editor::{LineEditor, ReadResult, RustylineEditor};
use crate::load::{DomainFiles, load_engine};

const COMMANDS: &[&str] = &[
    ":help",
    ":quit",
    ":domain",
    ":patterns",
    ":path",
    ":attributes",
    ":reload",
];

/// What one evaluated line asks the loop to do.
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Print this text and continue.
    Print(String),
    /// Leave the loop.
    Quit,
}

/// The interactive REPL.
pub struct Repl<E: LineEditor = RustylineEditor> {
    /// The line editor for input.
    editor: E,

    /// The engine being queried.
    handle: EngineHandle,

    /// Where `:reload` reads the domain from.
    reload_source: Option<(DomainFiles, EngineLoader)>,

    /// Whether to show the welcome banner.
    show_banner: bool,

    /// Primary prompt.
    prompt: String,
}

impl Repl<RustylineEditor> {
    /// Creates a new REPL with the default rustyline editor.
    ///
    /// # Errors
    ///
    /// Returns an error if the editor fails to initialize.
    pub fn new(handle: EngineHandle) -> Result<Self> {
        let editor = RustylineEditor::new()?;
        Ok(Self::with_editor(editor, handle))
    }
}

impl<E: LineEditor> Repl<E> {
    /// Creates a new REPL with the given editor.
    pub fn with_editor(mut editor: E, handle: EngineHandle) -> Self {
        editor.set_completions(completions(&handle));
        Self {
            editor,
            handle,
            reload_source: None,
            show_banner: true,
            prompt: "tg> ".to_string(),
        }
    }

    /// Enables `:reload` from the given domain files.
    #[must_use]
    pub fn with_reload_source(mut self, files: DomainFiles, loader: EngineLoader) -> Self {
        self.reload_source = Some((files, loader));
        self
    }

    /// Disables the welcome banner.
    #[must_use]
    pub const fn without_banner(mut self) -> Self {
        self.show_banner = false;
        self
    }

    /// Sets the primary prompt.
    #[must_use]
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Returns the engine handle.
    #[must_use]
    pub const fn handle(&self) -> &EngineHandle {
        &self.handle
    }

    /// Runs the REPL loop until EOF or `:quit`.
    ///
    /// # Errors
    ///
    /// Returns an error if reading input fails.
    pub fn run(&mut self) -> Result<()> {
        if self.show_banner {
            self.print_banner();
        }

        loop {
            let line = match self.editor.read_line(&self.prompt)? {
                ReadResult::Line(line) => line,
                ReadResult::Interrupted => continue,
                ReadResult::Eof => break,
            };
            if line.trim().is_empty() {
                continue;
            }
            self.editor.add_history(&line);

            match self.eval(&line) {
                Ok(Outcome::Print(text)) => println!("{text}"),
                Ok(Outcome::Quit) => break,
                Err(e) => eprintln!("\x1b[31mError: {e}\x1b[0m"),
            }
        }

        Ok(())
    }

    /// Evaluates one line.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown command, a missing argument, or a
    /// failed reload.
    pub fn eval(&mut self, line: &str) -> Result<Outcome> {
        let line = line.trim();
        let Some(command) = line.strip_prefix(':') else {
            let result = self.handle.classify(line);
            return serde_json::to_string(&result)
                .map(Outcome::Print)
                .map_err(|e| Error::new(ErrorKind::JsonError(e.to_string())));
        };

        let (name, argument) = match command.split_once(char::is_whitespace) {
            Some((name, argument)) => (name, Some(argument.trim())),
            None => (command, None),
        };

        let engine = self.handle.snapshot();
        match (name, argument) {
            ("q" | "quit", _) => Ok(Outcome::Quit),
            ("help", _) => Ok(Outcome::Print(help_text())),
            ("domain", _) => Ok(Outcome::Print(format!(
                "{} ({} patterns)",
                engine.domain(),
                engine.patterns().len()
            ))),
            ("patterns", _) => Ok(Outcome::Print(
                engine.patterns().ids().collect::<Vec<_>>().join("\n"),
            )),
            ("path", Some(id)) => engine
                .patterns()
                .hierarchy_path(id)
                .map(|path| Outcome::Print(path.join(" > ")))
                .ok_or_else(|| unknown_pattern(id)),
            ("attributes", Some(id)) => {
                let resolved = engine.attributes().resolved(id).ok_or_else(|| unknown_pattern(id))?;
                Ok(Outcome::Print(resolved.keys().collect::<Vec<_>>().join(", ")))
            }
            ("reload", _) => {
                let (files, loader) = self.reload_source.as_ref().ok_or_else(|| {
                    Error::new(ErrorKind::Internal("no domain directory to reload".to_string()))
                })?;
                let next = load_engine(files, loader)?;
                self.handle.replace(next);
                self.editor.set_completions(completions(&self.handle));
                Ok(Outcome::Print(format!("reloaded {}", self.handle.snapshot().domain())))
            }
            ("path" | "attributes", None) => Err(Error::new(ErrorKind::Internal(format!(
                ":{name} needs a pattern id"
            )))),
            _ => Err(Error::new(ErrorKind::Internal(format!(
                "unknown command ':{name}', try :help"
            )))),
        }
    }

    fn print_banner(&self) {
        let engine = self.handle.snapshot();
        println!(
            "\x1b[1mTextGlass\x1b[0m {} - domain {}",
            env!("CARGO_PKG_VERSION"),
            engine.domain()
        );
        println!("Type input to classify it, :help for commands, Ctrl+D to exit.\n");
    }
}

fn completions(handle: &EngineHandle) -> Vec<String> {
    let engine = handle.snapshot();
    COMMANDS
        .iter()
        .map(ToString::to_string)
        .chain(engine.patterns().ids().map(str::to_string))
        .collect()
}

fn unknown_pattern(id: &str) -> Error {
    Error::new(ErrorKind::Internal(format!("no pattern '{id}'")))
}

fn help_text() -> String {
    [
        "<text>            classify text",
        ":domain           show the loaded domain",
        ":patterns         list pattern ids in declared order",
        ":path <id>        show the hierarchy path of a pattern",
        ":attributes <id>  show the attribute keys a pattern resolves",
        ":reload           reload the domain directory",
        ":quit             exit",
    ]
    .join("\n")
}
