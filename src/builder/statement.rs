//! Rules and build statements.
//!
//! A [`Rule`] is a command template; a [`BuildStatement`] instantiates a rule
//! with explicit inputs, outputs and a bag of named variables substituted
//! into the template by the external executor.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A toolchain-global command template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub name: String,
    pub command: String,
    /// Dependency file written by the compiler (`depfile = ...`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depfile: Option<String>,
    /// Dependency format understood by the executor (`gcc` or `msvc`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deps: Option<String>,
}

impl Rule {
    pub fn new(name: impl Into<String>, command: impl Into<String>) -> Self {
        Rule {
            name: name.into(),
            command: command.into(),
            depfile: None,
            deps: None,
        }
    }

    pub fn with_depfile(mut self, depfile: impl Into<String>) -> Self {
        self.depfile = Some(depfile.into());
        self
    }

    pub fn with_deps(mut self, deps: impl Into<String>) -> Self {
        self.deps = Some(deps.into());
        self
    }
}

/// What a statement produces, for reporting and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementKind {
    Compile,
    Archive,
    Resource,
    Link,
}

/// One build statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildStatement {
    pub kind: StatementKind,
    /// Rule name this statement instantiates
    pub rule: String,
    pub outputs: Vec<PathBuf>,
    pub inputs: Vec<PathBuf>,
    /// Named variables, in emission order
    pub variables: Vec<(String, String)>,
}

impl BuildStatement {
    pub fn new(kind: StatementKind, rule: impl Into<String>) -> Self {
        BuildStatement {
            kind,
            rule: rule.into(),
            outputs: Vec::new(),
            inputs: Vec::new(),
            variables: Vec::new(),
        }
    }

    /// Add an output.
    pub fn output(mut self, path: impl Into<PathBuf>) -> Self {
        self.outputs.push(path.into());
        self
    }

    /// Add an input.
    pub fn input(mut self, path: impl Into<PathBuf>) -> Self {
        self.inputs.push(path.into());
        self
    }

    /// Add multiple inputs, preserving order.
    pub fn inputs(mut self, paths: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        self.inputs.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Add a variable.
    pub fn var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.push((name.into(), value.into()));
        self
    }

    /// Look up a variable by name.
    pub fn variable(&self, name: &str) -> Option<&str> {
        self.variables
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Expand the rule's command the way the executor would.
    ///
    /// `$in` and `$out` expand to the space-separated input and output
    /// lists, `$$` to a literal dollar, other `$name`/`${name}` references to
    /// the statement's variables (unknown names expand to nothing).
    pub fn expand_command(&self, rule: &Rule) -> String {
        let mut out = String::with_capacity(rule.command.len() * 2);
        let mut chars = rule.command.chars().peekable();

        while let Some(c) = chars.next() {
            if c != '$' {
                out.push(c);
                continue;
            }

            let name: String = match chars.peek() {
                Some('$') => {
                    chars.next();
                    out.push('$');
                    continue;
                }
                Some('{') => {
                    chars.next();
                    let mut name = String::new();
                    for c in chars.by_ref() {
                        if c == '}' {
                            break;
                        }
                        name.push(c);
                    }
                    name
                }
                _ => {
                    let mut name = String::new();
                    while let Some(&c) = chars.peek() {
                        if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                            name.push(c);
                            chars.next();
                        } else {
                            break;
                        }
                    }
                    name
                }
            };

            match name.as_str() {
                "in" => out.push_str(&join_paths(&self.inputs)),
                "out" => out.push_str(&join_paths(&self.outputs)),
                "" => out.push('$'),
                other => out.push_str(self.variable(other).unwrap_or_default()),
            }
        }

        out
    }
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Quote a command-line argument if it contains whitespace.
pub fn quote_arg(arg: &str) -> String {
    if arg.chars().any(char::is_whitespace) && !arg.starts_with('"') {
        format!("\"{}\"", arg.replace('"', "\\\""))
    } else {
        arg.to_string()
    }
}

/// Join arguments with single spaces, quoting where needed.
pub fn join_args<I, S>(args: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    args.into_iter()
        .map(|a| quote_arg(a.as_ref()))
        .collect::<Vec<_>>()
        .join(" ")
}
