use std::fs;
use std::io::{self, IsTerminal, Stdout};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, ValueEnum};
use nu_ansi_term::Color;
use tracing::debug;

use imp::Dialect;
use imp::error::ImpError;
use imp::interpreter::{
    ControlOutcome, Debugger, Entropy, EvalConfig, Interpreter, Silent, UndefinedVariables,
};
use imp::repl::{Input, Session, read_submission};

/// imp - interpreter and step debugger for the IMP teaching language.
///
/// Without file arguments a REPL is started.
#[derive(Parser, Debug)]
#[command(name = "imp", version, about, long_about = None)]
struct Args {
    /// Collect lines until one ends with '!' before running them
    #[arg(short, long)]
    multiline: bool,

    /// Run every submission under the step debugger
    #[arg(short, long)]
    debug: bool,

    /// Language variant to accept
    #[arg(long, value_enum, default_value_t = DialectArg::Extended)]
    dialect: DialectArg,

    /// Behaviour of reads of undefined variables (defaults to the dialect's)
    #[arg(long, value_enum)]
    undefined: Option<UndefinedArg>,

    /// Seed for nondeterministic choice
    #[arg(long)]
    seed: Option<u64>,

    /// Deepest allowed nesting of procedure calls; 0 removes the limit
    #[arg(long, default_value_t = EvalConfig::DEFAULT_MAX_CALL_DEPTH)]
    max_depth: usize,

    /// Programs to run instead of starting the REPL
    files: Vec<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DialectArg {
    Core,
    Extended,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum UndefinedArg {
    Reject,
    Zero,
}

impl Args {
    fn dialect(&self) -> Dialect {
        match self.dialect {
            DialectArg::Core => Dialect::Core,
            DialectArg::Extended => Dialect::Extended,
        }
    }

    fn config(&self) -> EvalConfig {
        let mut config = EvalConfig::for_dialect(self.dialect());
        match self.undefined {
            Some(UndefinedArg::Reject) => config.undefined = UndefinedVariables::Reject,
            Some(UndefinedArg::Zero) => config.undefined = UndefinedVariables::ReadAsZero,
            None => {}
        }
        config.max_call_depth = (self.max_depth > 0).then_some(self.max_depth);
        config
    }
}

fn report(err: &ImpError) {
    eprintln!("{}", Color::Red.paint(err.to_string()));
    eprintln!("{}. Aborting.", err.stage());
}

fn submit(session: &mut Session<Stdout>, source: &str, debug_mode: bool) {
    let result = if debug_mode {
        let mut debugger =
            Debugger::new(io::stdin().lock(), io::stdout()).colored(io::stdout().is_terminal());
        let result = session.submit(source, &mut debugger);
        if debugger.cancelled() {
            println!();
            debug!("debug session cancelled");
        }
        result
    } else {
        session.submit(source, &mut Silent)
    };

    match result {
        Ok(ControlOutcome::Abort) => debug!("program aborted"),
        Ok(_) => {}
        Err(err) => report(&err),
    }
}

fn run_file(session: &mut Session<Stdout>, path: &Path, debug_mode: bool) -> anyhow::Result<()> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read program file {}", path.display()))?;
    submit(session, &source, debug_mode);
    Ok(())
}

fn repl(session: &mut Session<Stdout>, args: &Args) -> anyhow::Result<()> {
    loop {
        let submission = read_submission(&mut io::stdin().lock(), &mut io::stdout(), args.multiline)
            .context("failed to read from the terminal")?;
        let Some(submission) = submission else {
            println!();
            return Ok(());
        };

        match Input::classify(&submission) {
            Input::Program(source) => submit(session, &source, args.debug),
            Input::Load(files) => {
                for file in files {
                    if let Err(err) = run_file(session, &file, args.debug) {
                        eprintln!("{}", Color::Red.paint(format!("{err:#}")));
                    }
                }
            }
            Input::LoadNothing => eprintln!("Need to specify at least one file to load."),
            Input::UnknownCommand(command) => eprintln!("Command not found: {command}"),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    use tracing_subscriber::{EnvFilter, fmt};

    // IMP_LOG controls the log level, warnings only by default
    let filter = EnvFilter::try_from_env("IMP_LOG").or_else(|_| EnvFilter::try_new("warn"))?;

    fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let choices = match args.seed {
        Some(seed) => Entropy::seeded(seed),
        None => Entropy::from_entropy(),
    };
    let interpreter = Interpreter::new(io::stdout())
        .with_config(args.config())
        .with_choices(choices);
    let mut session = Session::new(interpreter, args.dialect());

    if args.files.is_empty() {
        return repl(&mut session, &args);
    }

    for file in &args.files {
        run_file(&mut session, file, args.debug)?;
    }
    Ok(())
}
