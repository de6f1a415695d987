//! Line-oriented source writer with indentation tracking.

pub const INDENT: &str = "    ";

#[derive(Debug, Default)]
pub struct Printer {
    lines: Vec<String>,
    depth: usize,
}

impl Printer {
    pub fn new() -> Printer {
        Printer::default()
    }

    /// Writes one line at the current indentation. Empty text writes a blank line.
    pub fn line(&mut self, text: impl AsRef<str>) {
        let text = text.as_ref();
        if text.is_empty() {
            self.lines.push(String::new());
        } else {
            self.lines.push(format!("{}{}", INDENT.repeat(self.depth), text));
        }
    }

    pub fn blank(&mut self) {
        self.lines.push(String::new());
    }

    /// Writes `text` and indents what follows, e.g. `open("if x {")`.
    pub fn open(&mut self, text: impl AsRef<str>) {
        self.line(text);
        self.depth += 1;
    }

    /// Dedents and writes `text`, e.g. `close("}")`.
    pub fn close(&mut self, text: impl AsRef<str>) {
        self.depth = self.depth.saturating_sub(1);
        self.line(text);
    }

    /// Dedents then indents again around `text`, e.g. `reopen("} else {")`.
    pub fn reopen(&mut self, text: impl AsRef<str>) {
        self.close(text);
        self.depth += 1;
    }

    /// Copies every line of `other` at the current indentation.
    pub fn append(&mut self, other: Printer) {
        for line in other.lines {
            self.line(line);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn finish(self) -> String {
        let mut out = self.lines.join("\n");
        out.push('\n');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nesting() {
        let mut p = Printer::new();
        p.open("fn f() {");
        p.open("if x {");
        p.line("return;");
        p.reopen("} else {");
        p.line("loop {}");
        p.close("}");
        p.blank();
        p.close("}");
        assert_eq!(
            p.finish(),
            "fn f() {\n    if x {\n        return;\n    } else {\n        loop {}\n    }\n\n}\n"
        );
    }

    #[test]
    fn append_keeps_relative_indentation() {
        let mut inner = Printer::new();
        inner.open("struct A {");
        inner.line("x: u8,");
        inner.close("}");

        let mut outer = Printer::new();
        outer.open("mod m {");
        outer.append(inner);
        outer.close("}");
        assert_eq!(outer.finish(), "mod m {\n    struct A {\n        x: u8,\n    }\n}\n");
    }
}
