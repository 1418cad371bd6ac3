/// Output buffer and indentation shared by every renderer.
///
/// Renderers never write indentation themselves: [`State::add`] prefixes
/// the current indentation whenever text starts a new line. Layout
/// decisions that depend on the original formatting are answered by
/// [`State::has_nl`], which only ever looks at the untouched source.
#[derive(Debug)]
pub struct State<'s> {
    source: &'s str,
    out: String,
    level: usize,
    unit: String,
}

impl<'s> State<'s> {
    pub fn new(source: &'s str, unit: impl Into<String>) -> Self {
        Self {
            source,
            out: String::with_capacity(source.len()),
            level: 0,
            unit: unit.into(),
        }
    }

    /// Append `text`, indenting it if it starts a line.
    ///
    /// Text that itself begins with a newline is not indented, so blank
    /// lines never carry trailing whitespace.
    pub fn add(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if self.out.ends_with('\n') && !text.starts_with('\n') {
            for _ in 0..self.level {
                self.out.push_str(&self.unit);
            }
        }
        self.out.push_str(text);
    }

    pub fn nl(&mut self) {
        self.add("\n");
    }

    pub fn nls(&mut self, count: usize) {
        self.add(&"\n".repeat(count));
    }

    pub fn indent(&mut self) {
        self.level += 1;
    }

    pub fn dedent(&mut self) {
        debug_assert!(self.level > 0, "dedent without a matching indent");
        self.level = self.level.saturating_sub(1);
    }

    /// Whether the original source has a newline between two offsets.
    pub fn has_nl(&self, from: usize, to: usize) -> bool {
        self.has_nls(from, to, 1)
    }

    /// Whether the original source has at least `count` newlines between
    /// two offsets.
    pub fn has_nls(&self, from: usize, to: usize, count: usize) -> bool {
        self.source
            .as_bytes()
            .get(from..to)
            .is_some_and(|bytes| bytes.iter().filter(|b| **b == b'\n').count() >= count)
    }

    pub fn finish(self) -> String {
        debug_assert_eq!(self.level, 0, "unbalanced indentation");
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_indents_only_at_line_start() {
        let mut state = State::new("", "\t");
        state.add("a");
        state.indent();
        state.add("b");
        state.nl();
        state.add("c");
        state.dedent();
        state.nl();
        state.add("d");
        assert_eq!(state.finish(), "ab\n\tc\nd");
    }

    #[test]
    fn blank_lines_have_no_indentation() {
        let mut state = State::new("", "  ");
        state.indent();
        state.add("x");
        state.nls(2);
        state.add("\n");
        state.add("y");
        state.dedent();
        assert_eq!(state.finish(), "x\n\n\n  y");
    }

    #[test]
    fn newline_lookups_read_the_source() {
        let state = State::new("a\nb\n\nc", "\t");
        assert!(state.has_nl(0, 3));
        assert!(!state.has_nl(2, 3));
        assert!(state.has_nls(3, 6, 2));
        assert!(!state.has_nls(0, 3, 2));
        assert!(!state.has_nl(5, 2));
        assert!(!state.has_nl(0, 100));
    }
}
