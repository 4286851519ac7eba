use serde::Serialize;
use std::ffi::OsStr;
use std::process::Command;

/// Ordered argv tokens plus the environment variables contributed by options
///
/// This is the token sink every option group appends to. It never holds the
/// program path, so the same sequence can be handed to any binary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CommandArgs {
    args: Vec<String>,
    env: Vec<(String, String)>,
}

impl CommandArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a single-token flag such as `-y`
    pub fn flag(&mut self, flag: impl Into<String>) -> &mut Self {
        self.args.push(flag.into());
        self
    }

    /// Append a flag followed by its value as two tokens
    pub fn pair(&mut self, flag: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.args.push(flag.into());
        self.args.push(value.into());
        self
    }

    /// Record an environment variable for the child process
    pub fn env(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Move everything staged in `other` onto the end of `self`
    pub fn extend(&mut self, other: CommandArgs) {
        self.args.extend(other.args);
        self.env.extend(other.env);
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn env_vars(&self) -> &[(String, String)] {
        &self.env
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty() && self.env.is_empty()
    }

    pub fn into_args(self) -> Vec<String> {
        self.args
    }

    /// Create a `Command` for `program` with these arguments and extra env vars
    ///
    /// The parent environment is inherited; option env vars are layered on top.
    pub fn to_command(&self, program: impl AsRef<OsStr>) -> Command {
        let mut cmd = Command::new(program);
        cmd.args(&self.args);
        cmd.envs(self.env.iter().map(|(k, v)| (k, v)));
        cmd
    }
}

/// Render a program and its arguments as a single shell-quoted line
///
/// Used for logs, dry runs and error messages. Tokens that need quoting are
/// quoted with `shlex`; tokens shlex refuses (interior NUL) fall back to
/// Debug formatting so the line is still readable.
pub fn format_ffmpeg_cmd(program: &str, args: &CommandArgs) -> String {
    std::iter::once(program)
        .chain(args.args().iter().map(String::as_str))
        .map(|token| match shlex::try_quote(token) {
            Ok(quoted) => quoted.into_owned(),
            Err(_) => format!("{:?}", token),
        })
        .collect::<Vec<_>>()
        .join(" ")
}
