//! Driver/IO errors — `spec.md` §7 category 4. Everything here is about
//! getting bytes into the compiler or a binary out of it; phase errors
//! (lexical, syntactic, name-resolution, internal) live in their own crates
//! and are composed in at the `anyhow` layer instead of being wrapped here.

use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("no source file given")]
    MissingSourceArgument,

    #[error("could not read source file {}", path.display())]
    UnreadableSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not write assembly to {}", path.display())]
    UnwritableAsm {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not run assembler {tool}")]
    ToolNotFound {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("assembler exited with {status}")]
    AssemblerFailed { status: ExitStatus },

    #[error("linker exited with {status}")]
    LinkerFailed { status: ExitStatus },
}
