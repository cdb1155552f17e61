//! TextGlass CLI entry point.

use std::env;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use textglass_engine::{EngineConfig, EngineHandle, EngineLoader};
use textglass_runtime::logging::{self, Verbosity};
use textglass_runtime::{DomainFiles, Repl, load_engine, run_fixture};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// What the invocation asks for.
#[derive(Debug, Default, PartialEq, Eq)]
enum Command {
    /// Run each domain's test fixture.
    Test(Vec<PathBuf>),
    /// Classify the given inputs, or stdin lines.
    Classify { dir: PathBuf, inputs: Vec<String> },
    /// Print the effective documents after patching.
    Merged(PathBuf),
    /// Interactive classification.
    Repl(PathBuf),
    #[default]
    Help,
}

/// CLI configuration parsed from arguments.
#[derive(Debug, Default)]
struct CliConfig {
    command: Command,
    verbosity: Verbosity,
    show_help: bool,
    show_version: bool,
    strict: bool,
    include_pattern_id: bool,
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();

    match run(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("\x1b[31mError: {e}\x1b[0m");
            ExitCode::FAILURE
        }
    }
}

fn parse_args(args: Vec<String>) -> CliResult<CliConfig> {
    let mut config = CliConfig::default();
    let mut positional = Vec::new();
    let mut options_done = false;

    for arg in args.into_iter().skip(1) {
        if options_done {
            positional.push(arg);
            continue;
        }
        match arg.as_str() {
            "-h" | "--help" => config.show_help = true,
            "-V" | "--version" => config.show_version = true,
            "-v" | "--verbose" => config.verbosity = config.verbosity.louder(),
            "-q" | "--quiet" => config.verbosity = Verbosity::Quiet,
            "--strict" => config.strict = true,
            "--include-pattern-id" => config.include_pattern_id = true,
            "--" => options_done = true,
            flag if flag.starts_with('-') => {
                return Err(format!("unknown option: {flag}").into());
            }
            _ => positional.push(arg),
        }
    }

    let mut positional = positional.into_iter();
    let Some(name) = positional.next() else {
        return Ok(config);
    };

    config.command = match name.as_str() {
        "test" => {
            let first = next_dir(&mut positional, "test")?;
            Command::Test(std::iter::once(first).chain(positional.map(PathBuf::from)).collect())
        }
        "classify" => Command::Classify {
            dir: next_dir(&mut positional, "classify")?,
            inputs: positional.collect(),
        },
        "merged" => Command::Merged(next_dir(&mut positional, "merged")?),
        "repl" => Command::Repl(next_dir(&mut positional, "repl")?),
        other => return Err(format!("unknown command: {other}").into()),
    };

    Ok(config)
}

fn next_dir(args: &mut impl Iterator<Item = String>, command: &str) -> CliResult<PathBuf> {
    args.next()
        .map(PathBuf::from)
        .ok_or_else(|| format!("{command} requires a domain directory").into())
}

fn run(args: Vec<String>) -> CliResult<ExitCode> {
    let config = parse_args(args)?;

    if config.show_help || config.command == Command::Help {
        print_help();
        return Ok(ExitCode::SUCCESS);
    }

    if config.show_version {
        println!("textglass {}", env!("CARGO_PKG_VERSION"));
        return Ok(ExitCode::SUCCESS);
    }

    logging::init(config.verbosity);

    let base = if config.strict {
        EngineConfig::strict()
    } else {
        EngineConfig::default()
    };
    let engine_config = base.with_include_pattern_id(config.include_pattern_id);
    let loader = EngineLoader::new().with_config(engine_config);

    match config.command {
        Command::Test(dirs) => run_tests(&dirs, &loader),
        Command::Classify { dir, inputs } => {
            classify(&dir, &inputs, &loader)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Merged(dir) => {
            print_merged(&dir, &loader)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Repl(dir) => {
            let files = DomainFiles::discover(&dir)?;
            let handle = EngineHandle::new(load_engine(&files, &loader)?);
            Repl::new(handle)?
                .with_reload_source(files, loader)
                .run()?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Help => Ok(ExitCode::SUCCESS),
    }
}

fn run_tests(dirs: &[PathBuf], loader: &EngineLoader) -> CliResult<ExitCode> {
    let mut all_passed = true;

    for dir in dirs {
        let files = DomainFiles::discover(dir)?;
        let documents = files.read()?;
        let Some(test) = &documents.test else {
            return Err(format!("no test fixture in '{}'", dir.display()).into());
        };
        let engine = loader
            .load(&documents.sources())
            .map_err(|e| e.in_frame(format!("domain '{}'", dir.display())))?;

        let report = run_fixture(&engine, test)?;
        for failure in &report.failures {
            println!("  \x1b[31m✗\x1b[0m {failure}");
        }
        let color = if report.is_success() { "32" } else { "31" };
        println!("\x1b[{color}m{report}\x1b[0m");
        all_passed &= report.is_success();
    }

    Ok(if all_passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn classify(dir: &Path, inputs: &[String], loader: &EngineLoader) -> CliResult<()> {
    let engine = load_engine(&DomainFiles::discover(dir)?, loader)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let mut emit = |input: &str| -> CliResult<()> {
        let result = engine.classify(input);
        serde_json::to_writer(&mut out, &result)?;
        writeln!(out)?;
        Ok(())
    };

    if inputs.is_empty() {
        for line in io::stdin().lock().lines() {
            emit(&line?)?;
        }
    } else {
        for input in inputs {
            emit(input)?;
        }
    }
    Ok(())
}

fn print_merged(dir: &Path, loader: &EngineLoader) -> CliResult<()> {
    let engine = load_engine(&DomainFiles::discover(dir)?, loader)?;
    let merged = serde_json::json!({
        "patterns": serde_json::Value::from(engine.effective_patterns()),
        "attributes": engine.effective_attributes().map(serde_json::Value::from),
    });
    println!("{}", serde_json::to_string_pretty(&merged)?);
    Ok(())
}

fn print_help() {
    println!(
        "\x1b[1mTextGlass\x1b[0m - Domain-driven text classification

\x1b[1mUSAGE:\x1b[0m
    textglass [OPTIONS] <COMMAND> <DIR> [ARGS...]

\x1b[1mCOMMANDS:\x1b[0m
    test <DIR>...             Run each domain's test.json fixture
    classify <DIR> [INPUT...] Classify inputs, or stdin lines if none given
    merged <DIR>              Print the effective documents after patching
    repl <DIR>                Classify interactively

\x1b[1mDOMAIN DIRECTORY:\x1b[0m
    patterns.json             Base pattern document (required)
    patterns_patch.json       Pattern patch
    attributes.json           Base attribute document
    attributes_patch.json     Attribute patch
    test.json                 Test fixture

\x1b[1mOPTIONS:\x1b[0m
    -h, --help                Print help information
    -V, --version             Print version information
    -v, --verbose             More log output (repeatable)
    -q, --quiet               Errors only
    --strict                  Limit hierarchy depth to 8
    --include-pattern-id      Add patternId to the attribute map

\x1b[1mEXAMPLES:\x1b[0m
    textglass test domains/greetings
    textglass classify domains/greetings hello goodbye
    cat inputs.txt | textglass -q classify domains/greetings

RUST_LOG overrides the verbosity flags."
    );
}
