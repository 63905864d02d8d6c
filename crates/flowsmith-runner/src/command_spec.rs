use std::collections::HashMap;
use std::ffi::OsString;
use std::path::PathBuf;
use tokio::process::Command as TokioCommand;

/// Specification for a command to execute.
///
/// All process execution goes through this type to ensure argv-style
/// invocation. Arguments are passed as discrete elements rather than shell
/// strings, so values derived from a workflow request (paths, URLs, JSON
/// bodies) can never be reinterpreted by a shell.
///
/// # Example
///
/// ```rust
/// use flowsmith_runner::CommandSpec;
/// use std::ffi::OsString;
///
/// let cmd = CommandSpec::new("curl")
///     .arg("-sS")
///     .arg("-X")
///     .arg("POST")
///     .arg("http://localhost:8080/deploy");
///
/// assert_eq!(cmd.program, OsString::from("curl"));
/// assert_eq!(cmd.args.len(), 4);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CommandSpec {
    /// The program to execute
    pub program: OsString,
    /// Arguments as discrete elements (NOT shell strings)
    pub args: Vec<OsString>,
    /// Optional working directory
    pub cwd: Option<PathBuf>,
    /// Optional environment overrides
    pub env: Option<HashMap<OsString, OsString>>,
}

impl CommandSpec {
    /// Create a new `CommandSpec` for the given program.
    #[must_use]
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            env: None,
        }
    }

    /// Add a single argument.
    ///
    /// Arguments are stored as discrete `OsString` elements, ensuring no
    /// shell interpretation occurs.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add multiple arguments.
    ///
    /// # Example
    ///
    /// ```rust
    /// use flowsmith_runner::CommandSpec;
    ///
    /// let cmd = CommandSpec::new("curl").args(["-sS", "-X", "POST"]);
    /// ```
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set the working directory for the command.
    #[must_use]
    pub fn cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    /// Set an environment variable for the command.
    #[must_use]
    pub fn env(mut self, key: impl Into<OsString>, value: impl Into<OsString>) -> Self {
        self.env
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Set multiple environment variables for the command.
    #[must_use]
    pub fn envs<I, K, V>(mut self, envs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<OsString>,
        V: Into<OsString>,
    {
        let env_map = self.env.get_or_insert_with(HashMap::new);
        for (key, value) in envs {
            env_map.insert(key.into(), value.into());
        }
        self
    }

    /// Convert this `CommandSpec` into a `tokio::process::Command`.
    ///
    /// The resulting command uses argv-style argument passing; no shell
    /// string evaluation (`sh -c`, `cmd /C`) is involved.
    #[must_use]
    pub fn to_tokio_command(&self) -> TokioCommand {
        let mut cmd = TokioCommand::new(&self.program);
        cmd.args(&self.args);

        if let Some(ref cwd) = self.cwd {
            cmd.current_dir(cwd);
        }

        if let Some(ref env) = self.env {
            for (key, value) in env {
                cmd.env(key, value);
            }
        }

        cmd
    }
}
