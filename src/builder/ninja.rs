//! Ninja build-file syntax.

use std::fmt::Write as _;
use std::path::Path;

use crate::builder::statement::{BuildStatement, Rule};

/// Escape a path for use in a `build` line.
pub fn escape_path(path: &Path) -> String {
    let raw = path.display().to_string();
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '$' => out.push_str("$$"),
            ' ' => out.push_str("$ "),
            ':' => out.push_str("$:"),
            '\n' => out.push_str("$\n"),
            c => out.push(c),
        }
    }
    out
}

/// Escape a variable value. Only `$` and newlines are significant there.
pub fn escape_value(value: &str) -> String {
    value.replace('$', "$$").replace('\n', " ")
}

/// Accumulates ninja syntax into an in-memory buffer.
#[derive(Debug, Default)]
pub struct NinjaWriter {
    buf: String,
}

impl NinjaWriter {
    pub fn new() -> Self {
        NinjaWriter { buf: String::new() }
    }

    /// Write a `#` comment line.
    pub fn comment(&mut self, text: &str) {
        for line in text.lines() {
            let _ = writeln!(self.buf, "# {}", line);
        }
    }

    pub fn newline(&mut self) {
        self.buf.push('\n');
    }

    /// Write a top-level variable.
    pub fn variable(&mut self, key: &str, value: &str) {
        let _ = writeln!(self.buf, "{} = {}", key, value);
    }

    /// Write a rule block.
    pub fn rule(&mut self, rule: &Rule) {
        let _ = writeln!(self.buf, "rule {}", rule.name);
        let _ = writeln!(self.buf, "  command = {}", rule.command);
        if let Some(depfile) = &rule.depfile {
            let _ = writeln!(self.buf, "  depfile = {}", depfile);
        }
        if let Some(deps) = &rule.deps {
            let _ = writeln!(self.buf, "  deps = {}", deps);
        }
        self.newline();
    }

    /// Write a build block with its indented variables.
    ///
    /// Statement variables are literal text, so `$` is escaped.
    pub fn build(&mut self, stmt: &BuildStatement) {
        let outputs: Vec<String> = stmt.outputs.iter().map(|p| escape_path(p)).collect();
        let inputs: Vec<String> = stmt.inputs.iter().map(|p| escape_path(p)).collect();

        self.buf.push_str("build ");
        self.buf.push_str(&outputs.join(" "));
        self.buf.push_str(": ");
        self.buf.push_str(&stmt.rule);
        if !inputs.is_empty() {
            self.buf.push(' ');
            self.buf.push_str(&inputs.join(" "));
        }
        self.newline();

        for (key, value) in &stmt.variables {
            let _ = writeln!(self.buf, "  {} = {}", key, escape_value(value));
        }
        self.newline();
    }

    /// Borrow the accumulated text.
    pub fn as_str(&self) -> &str {
        &self.buf
    }

    /// Take the accumulated text.
    pub fn finish(self) -> String {
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::statement::StatementKind;
    use std::path::PathBuf;

    #[test]
    fn test_escape_path() {
        assert_eq!(escape_path(Path::new("a b/c.o")), "a$ b/c.o");
        assert_eq!(escape_path(Path::new("C:/x")), "C$:/x");
        assert_eq!(escape_path(Path::new("$dir")), "$$dir");
    }

    #[test]
    fn test_escape_value() {
        assert_eq!(escape_value("cost $5"), "cost $$5");
    }

    #[test]
    fn test_rule_block() {
        let mut w = NinjaWriter::new();
        w.rule(
            &Rule::new("cc", "g++ -MD $cc_out_deps -c $cc_in_files")
                .with_depfile("$cc_depsfile")
                .with_deps("gcc"),
        );
        assert_eq!(
            w.finish(),
            "rule cc\n  command = g++ -MD $cc_out_deps -c $cc_in_files\n  depfile = $cc_depsfile\n  deps = gcc\n\n"
        );
    }

    #[test]
    fn test_build_block() {
        let mut w = NinjaWriter::new();
        let stmt = BuildStatement::new(StatementKind::Archive, "ar")
            .output(PathBuf::from("out/libm y.a"))
            .inputs(["a.o", "b.o"])
            .var("ar_flags", "rcs")
            .var("ar_note", "$HOME");
        w.build(&stmt);
        assert_eq!(
            w.finish(),
            "build out/libm$ y.a: ar a.o b.o\n  ar_flags = rcs\n  ar_note = $$HOME\n\n"
        );
    }

    #[test]
    fn test_comment() {
        let mut w = NinjaWriter::new();
        w.comment("one\ntwo");
        assert_eq!(w.as_str(), "# one\n# two\n");
    }
}
