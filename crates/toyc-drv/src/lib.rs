//! toyc-drv — the `toyc` command-line driver.
//!
//! Orchestrates the three in-process compiler phases (`toyc-lex` →
//! `toyc-par` → `toyc-gen`) and then shells out to an external assembler and
//! linker to turn the generated AT&T assembly into an executable. The
//! phases themselves are pure and logging-free; this crate is the only one
//! that touches the filesystem, spawns processes, or writes to stderr.

pub mod error;

pub use error::DriverError;

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use std::path::{Path, PathBuf};
use std::process::Command;
use toyc_gen::CodeGenerator;
use toyc_par::Parser as ToycParser;
use toyc_util::{diagnostic, Category, Interner};
use tracing::{debug, info};

/// `toyc <SOURCE> [options]` — see `spec.md` §6 for the input language and
/// SPEC_FULL.md §6.1 for the full flag set.
#[derive(Debug, ClapParser)]
#[command(name = "toyc", about = "Ahead-of-time compiler for the toyc language")]
pub struct Config {
    /// Source file to compile.
    pub source: Option<PathBuf>,

    /// Output executable path.
    #[arg(short, long, default_value = "a.out")]
    pub output: PathBuf,

    /// Stop after code generation and write `<source>.s` instead of linking.
    #[arg(long)]
    pub emit_asm: bool,

    /// Keep the intermediate `.s` file after a successful link.
    #[arg(long)]
    pub keep_asm: bool,

    /// Enable debug-level tracing to stderr.
    #[arg(short, long)]
    pub verbose: bool,

    /// Assembler binary to invoke. The generator emits GNU-assembler AT&T
    /// syntax (`spec.md` §4.3/§6), so this must be a GNU `as`-compatible
    /// assembler, not an Intel-syntax one like `nasm`.
    #[arg(long, default_value = "as")]
    pub assembler: String,

    /// Linker binary to invoke.
    #[arg(long, default_value = "ld")]
    pub linker: String,
}

/// Installs the `tracing-subscriber` `fmt` subscriber. Defaults to `warn`,
/// raised to `debug` by `-v`/`--verbose`; `RUST_LOG` always wins if set,
/// matching the convention this crate family uses elsewhere.
pub fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// One compilation. Bundles the parsed `Config` with the string interner
/// that lexing and parsing share — the interner is local to a single
/// invocation, not a global table (SPEC_FULL.md §3).
pub struct Session {
    config: Config,
    interner: Interner,
}

impl Session {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            interner: Interner::new(),
        }
    }

    /// Runs the whole pipeline: read, lex, parse, generate, assemble, link.
    pub fn compile(&mut self) -> Result<()> {
        let source_path = self
            .config
            .source
            .clone()
            .ok_or(DriverError::MissingSourceArgument)?;

        debug!(path = %source_path.display(), "reading source");
        let source = std::fs::read_to_string(&source_path).map_err(|source_err| {
            DriverError::UnreadableSource {
                path: source_path.clone(),
                source: source_err,
            }
        })?;

        debug!("lexing");
        let tokens = toyc_lex::Lexer::new(&source, &mut self.interner)
            .tokenize()
            .context("lexical analysis failed")?;

        debug!(count = tokens.len(), "parsing");
        let program = ToycParser::new(tokens, &self.interner)
            .parse()
            .context("parsing failed")?;

        debug!("generating assembly");
        let asm = CodeGenerator::new(&self.interner)
            .generate(&program)
            .context("code generation failed")?;

        let asm_path = asm_path_for(&source_path);
        debug!(path = %asm_path.display(), "writing assembly");
        std::fs::write(&asm_path, &asm).map_err(|source_err| DriverError::UnwritableAsm {
            path: asm_path.clone(),
            source: source_err,
        })?;

        if self.config.emit_asm {
            info!(path = %asm_path.display(), "wrote assembly, stopping before assemble/link");
            return Ok(());
        }

        let result = self.assemble_and_link(&asm_path);

        if !self.config.keep_asm {
            let _ = std::fs::remove_file(&asm_path);
        }

        result?;
        info!(path = %self.config.output.display(), "build succeeded");
        Ok(())
    }

    fn assemble_and_link(&self, asm_path: &Path) -> Result<()> {
        let object_path = asm_path.with_extension("o");

        debug!(tool = %self.config.assembler, "assembling");
        let status = Command::new(&self.config.assembler)
            .args(["--64", "-o"])
            .arg(&object_path)
            .arg(asm_path)
            .status()
            .map_err(|source_err| DriverError::ToolNotFound {
                tool: self.config.assembler.clone(),
                source: source_err,
            })?;
        if !status.success() {
            return Err(DriverError::AssemblerFailed { status }.into());
        }

        debug!(tool = %self.config.linker, "linking");
        let status = Command::new(&self.config.linker)
            .arg("-o")
            .arg(&self.config.output)
            .arg(&object_path)
            .status()
            .map_err(|source_err| DriverError::ToolNotFound {
                tool: self.config.linker.clone(),
                source: source_err,
            })?;

        let _ = std::fs::remove_file(&object_path);

        if !status.success() {
            return Err(DriverError::LinkerFailed { status }.into());
        }

        Ok(())
    }
}

fn asm_path_for(source_path: &Path) -> PathBuf {
    source_path.with_extension("s")
}

/// Entry point shared by `main.rs` and the integration tests. Returns the
/// process exit code: `0` success, `1` a compiler-detected error, `2` an
/// external-tool failure (assembler/linker could not run or exited
/// non-zero).
pub fn run(config: Config) -> i32 {
    init_logging(config.verbose);

    let mut session = Session::new(config);
    match session.compile() {
        Ok(()) => 0,
        Err(err) => {
            let category = categorize(&err);
            eprintln!("{}", diagnostic::render(category, &format!("{err:#}"), None));
            if is_tool_failure(&err) {
                2
            } else {
                1
            }
        }
    }
}

fn is_tool_failure(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<DriverError>(),
        Some(DriverError::ToolNotFound { .. })
            | Some(DriverError::AssemblerFailed { .. })
            | Some(DriverError::LinkerFailed { .. })
    )
}

/// Maps a propagated phase error back to one of `spec.md` §7's five
/// categories, so the driver's stderr prefix names the actual phase that
/// failed rather than a single generic "error" for everything.
fn categorize(err: &anyhow::Error) -> Category {
    if let Some(parse_err) = err.downcast_ref::<toyc_par::ParseError>() {
        return match parse_err {
            toyc_par::ParseError::UnexpectedToken { .. } | toyc_par::ParseError::UnexpectedEof { .. } => {
                Category::Syntactic
            }
            toyc_par::ParseError::UndeclaredVariable { .. }
            | toyc_par::ParseError::UndefinedFunction { .. }
            | toyc_par::ParseError::ReturnOutsideReturningBlock { .. }
            | toyc_par::ParseError::MissingReturn { .. } => Category::NameResolution,
            toyc_par::ParseError::Lex(_) => Category::Lexical,
        };
    }
    if err.downcast_ref::<toyc_lex::LexError>().is_some() {
        return Category::Lexical;
    }
    if err.downcast_ref::<toyc_gen::CodeGenError>().is_some() {
        return Category::Internal;
    }
    Category::DriverIo
}
