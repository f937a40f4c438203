use crate::environment::Environment;
use crate::{interpreter, Object};
use ansi_term::Colour;
use linefeed::{DefaultTerminal, Interface, ReadResult, Signal, Terminal};
use std::fmt;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

const PROMPT: &str = ">> ";
const CONTINUE_PROMPT: &str = ".. ";

#[derive(Debug)]
pub enum Error {
    Io(io::Error),
    Interpret(interpreter::Error),
    Eval(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {}", e),
            Error::Interpret(e) => write!(f, "{}", e),
            Error::Eval(message) => write!(f, "ERROR: {}", message),
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<interpreter::Error> for Error {
    fn from(e: interpreter::Error) -> Self {
        Error::Interpret(e)
    }
}

pub fn setup() -> io::Result<Interface<DefaultTerminal>> {
    let interface = Interface::new("lemon")?;
    interface.set_prompt(PROMPT)?;
    interface.set_report_signal(Signal::Interrupt, true);
    if let Some(path) = history_path() {
        interface.load_history(path).ok();
    };
    Ok(interface)
}

fn history_path() -> Option<PathBuf> {
    match dirs::data_dir() {
        Some(mut path) => {
            path.push(".lemon_history");
            Some(path)
        }
        None => None,
    }
}

pub fn save_history<T: Terminal>(interface: &Interface<T>) -> io::Result<()> {
    match history_path() {
        Some(path) => interface.save_history(path),
        None => Ok(()),
    }
}

/// One attempt at reading a line.
#[derive(Debug)]
enum Read {
    Line(String),
    Interrupted,
    End,
}

/// Collects lines up to a blank line or end of input. An interrupt throws
/// away whatever was typed so far and starts the submission again.
fn gather_submission<F>(mut read: F) -> io::Result<Vec<String>>
where
    F: FnMut(&str) -> io::Result<Read>,
{
    let mut lines = Vec::new();
    let mut prompt = PROMPT;
    loop {
        match read(prompt)? {
            Read::End => break,
            Read::Interrupted => {
                log::debug!("discarding {} pending line(s)", lines.len());
                lines.clear();
                prompt = PROMPT;
            }
            Read::Line(line) if line.is_empty() => break,
            Read::Line(line) => {
                lines.push(line);
                prompt = CONTINUE_PROMPT;
            }
        }
    }
    Ok(lines)
}

/// Where REPL lines come from: an interactive line editor, or plain stdin
/// when input is piped.
enum LineSource {
    Terminal(Interface<DefaultTerminal>),
    Piped(io::StdinLock<'static>),
}

impl LineSource {
    fn read_line(&mut self, prompt: &str) -> io::Result<Read> {
        match self {
            LineSource::Terminal(interface) => {
                interface.set_prompt(prompt)?;
                match interface.read_line()? {
                    ReadResult::Input(line) => Ok(Read::Line(line)),
                    ReadResult::Eof => Ok(Read::End),
                    ReadResult::Signal(sig) => {
                        log::debug!("received signal {:?}", sig);
                        Ok(Read::Interrupted)
                    }
                }
            }
            LineSource::Piped(stdin) => {
                print!("{}", prompt);
                io::stdout().flush()?;
                let mut line = String::new();
                match stdin.read_line(&mut line)? {
                    0 => Ok(Read::End),
                    _ => {
                        let trimmed = line.trim_end_matches(&['\n', '\r'][..]).len();
                        line.truncate(trimmed);
                        Ok(Read::Line(line))
                    }
                }
            }
        }
    }

    fn read_submission(&mut self) -> io::Result<Vec<String>> {
        gather_submission(|prompt| self.read_line(prompt))
    }

    fn remember(&self, submission: &str) {
        if let LineSource::Terminal(interface) = self {
            interface.add_history_unique(submission.to_string());
        }
    }

    fn save(&self) -> io::Result<()> {
        match self {
            LineSource::Terminal(interface) => save_history(interface),
            LineSource::Piped(_) => Ok(()),
        }
    }
}

fn open_source() -> io::Result<LineSource> {
    if atty::is(atty::Stream::Stdin) {
        return setup().map(LineSource::Terminal);
    }
    Ok(LineSource::Piped(io::stdin().lock()))
}

/// Reads submissions until an empty one, echoing each result.
pub fn repl() -> Result<(), Error> {
    let mut source = open_source()?;
    let env = Environment::new();
    let macro_env = Environment::new();
    loop {
        let lines = source.read_submission()?;
        if lines.is_empty() {
            break;
        }
        let input = lines.join("\n");
        source.remember(&input);
        match interpreter::rep(&input, &env, &macro_env) {
            Ok(Some(value)) => println!("{}", value),
            Ok(None) => {}
            Err(e) => println!("{}", e),
        }
    }
    source.save()?;
    Ok(())
}

/// Runs a source file once. Macros are not expanded.
pub fn run_file(path: &str) -> Result<(), Error> {
    let source = std::fs::read_to_string(path)?;
    let program = interpreter::parse(&source)?;
    match interpreter::eval(&program, &Environment::new()) {
        Object::Error(message) => Err(Error::Eval(message)),
        _ => Ok(()),
    }
}

fn greet() {
    let user = std::env::var("USER").unwrap_or_else(|_| "there".into());
    println!(
        "Hello {}! Welcome to {}",
        user,
        Colour::Black.on(Colour::Fixed(226)).paint("Lemon REPL")
    );
    println!("Type in commands.");
}

pub fn launch(args: Vec<String>) -> Result<(), Error> {
    match args.get(1) {
        Some(path) => run_file(path),
        None => {
            greet();
            repl()
        }
    }
}
