//! Command-line tokenizing and table lookup.
//!
//! A completed input line is split on whitespace into at most [`MAX_ARGS`]
//! tokens, and the first token is matched against the [`CMD_TABLE`] by exact,
//! case-sensitive equality in table order. First match wins, so aliases
//! listed earlier shadow later entries (no collisions occur in this table).
//!
//! Structural failures ([`ShellError::BadCmd`], [`ShellError::TooManyArgs`])
//! are kept distinct from the filesystem result codes that running handlers
//! return.

use crate::fs::ErrorCode;

/// Maximum number of whitespace-separated tokens on one line, command name
/// included.
pub const MAX_ARGS: usize = 8;

/// Token list for one line.
pub type Argv<'a> = heapless::Vec<&'a str, MAX_ARGS>;

/// Outcome of one trip through the command processor.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ShellError {
    /// Empty line, or the first token matched no table entry.
    BadCmd,
    /// The line held more than [`MAX_ARGS`] tokens; no handler ran.
    TooManyArgs,
    /// A handler ran and returned a filesystem result code.
    Cmd(ErrorCode),
}

/// Commands the dispatcher can route to.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Cmd {
    /// List the command table.
    Help,
    /// List the current directory.
    Ls,
    /// Change the working directory.
    Chdir,
    /// Print the working directory.
    Pwd,
    /// Print a file's contents.
    Cat,
}

/// One row of the command table.
pub struct CmdEntry {
    /// Name typed at the prompt.
    pub name: &'static str,
    /// Command routed to on a match.
    pub cmd: Cmd,
    /// One-line description for `help`.
    pub help: &'static str,
}

/// The command table, in lookup order.
pub const CMD_TABLE: &[CmdEntry] = &[
    CmdEntry { name: "help", cmd: Cmd::Help, help: "Display list of commands" },
    CmdEntry { name: "h", cmd: Cmd::Help, help: "alias for help" },
    CmdEntry { name: "?", cmd: Cmd::Help, help: "alias for help" },
    CmdEntry { name: "ls", cmd: Cmd::Ls, help: "Display list of files" },
    CmdEntry { name: "chdir", cmd: Cmd::Chdir, help: "Change directory" },
    CmdEntry { name: "cd", cmd: Cmd::Chdir, help: "alias for chdir" },
    CmdEntry { name: "pwd", cmd: Cmd::Pwd, help: "Show current working directory" },
    CmdEntry { name: "cat", cmd: Cmd::Cat, help: "Show contents of a text file" },
];

/// Split a line on whitespace into at most [`MAX_ARGS`] tokens.
pub fn tokenize(line: &str) -> Result<Argv<'_>, ShellError> {
    let mut argv = Argv::new();
    for tok in line.split_ascii_whitespace() {
        argv.push(tok).map_err(|_| ShellError::TooManyArgs)?;
    }
    Ok(argv)
}

/// Look up a command by name, first match in table order.
pub fn lookup(name: &str) -> Option<&'static CmdEntry> {
    CMD_TABLE.iter().find(|entry| entry.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_splits_on_whitespace_runs() {
        let argv = tokenize("  cd   SUB \t ").unwrap();
        assert_eq!(&argv[..], &["cd", "SUB"]);
    }

    #[test]
    fn empty_line_yields_no_tokens() {
        assert!(tokenize("").unwrap().is_empty());
        assert!(tokenize("   ").unwrap().is_empty());
    }

    #[test]
    fn max_args_accepted_one_more_rejected() {
        assert_eq!(tokenize("a b c d e f g h").unwrap().len(), MAX_ARGS);
        assert_eq!(tokenize("a b c d e f g h i"), Err(ShellError::TooManyArgs));
    }

    #[test]
    fn lookup_is_exact_and_case_sensitive() {
        assert_eq!(lookup("pwd").unwrap().cmd, Cmd::Pwd);
        assert!(lookup("PWD").is_none());
        assert!(lookup("pw").is_none());
        assert!(lookup("pwdd").is_none());
    }

    #[test]
    fn aliases_route_to_the_same_command() {
        assert_eq!(lookup("h").unwrap().cmd, Cmd::Help);
        assert_eq!(lookup("?").unwrap().cmd, Cmd::Help);
        assert_eq!(lookup("cd").unwrap().cmd, Cmd::Chdir);
        assert_eq!(lookup("chdir").unwrap().cmd, Cmd::Chdir);
    }
}
