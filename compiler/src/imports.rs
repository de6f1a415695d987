//! Tracks which paths generated code refers to so each `use` is emitted
//! once, at the top of the generated module.

use std::collections::BTreeSet;

use crate::printer::Printer;

#[derive(Debug, Default)]
pub struct Imports {
    paths: BTreeSet<String>,
}

impl Imports {
    pub fn new() -> Imports {
        Imports::default()
    }

    /// Records `path` and returns the name to refer to it by.
    pub fn use_path<'p>(&mut self, path: &'p str) -> &'p str {
        if !self.paths.contains(path) {
            self.paths.insert(path.to_string());
        }
        path.rsplit("::").next().unwrap_or(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.paths.contains(path)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// One `use` line per path: std first, then everything else, each sorted.
    pub fn render(&self, printer: &mut Printer) {
        let (std, other): (Vec<&String>, Vec<&String>) =
            self.paths.iter().partition(|path| path.starts_with("std::"));

        for path in &std {
            printer.line(format!("use {};", path));
        }
        if !std.is_empty() && !other.is_empty() {
            printer.blank();
        }
        for path in &other {
            printer.line(format!("use {};", path));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deduplicates_and_groups() {
        let mut imports = Imports::new();
        assert_eq!(imports.use_path("brine_equal::bytes_equal"), "bytes_equal");
        assert_eq!(imports.use_path("std::any::Any"), "Any");
        assert_eq!(imports.use_path("brine_equal::bytes_equal"), "bytes_equal");
        assert_eq!(imports.use_path("brine_equal::Equal"), "Equal");
        assert_eq!(imports.len(), 3);

        let mut printer = Printer::new();
        imports.render(&mut printer);
        assert_eq!(
            printer.finish(),
            "use std::any::Any;\n\nuse brine_equal::Equal;\nuse brine_equal::bytes_equal;\n"
        );
    }
}
