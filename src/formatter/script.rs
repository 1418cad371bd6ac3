/// Formats the contents of `<script>` elements.
///
/// The result is re-emitted line by line at the element's indentation, so
/// implementations should return code without any base indentation.
pub trait ScriptFormatter {
    fn format(&self, code: &str) -> String;
}

/// Keeps script code as written, only normalizing its indentation: the
/// common leading whitespace is removed, as are trailing whitespace and
/// blank lines at either end.
#[derive(Debug, Clone, Copy, Default)]
pub struct Reindent;

impl ScriptFormatter for Reindent {
    fn format(&self, code: &str) -> String {
        let lines: Vec<&str> = code.lines().map(str::trim_end).collect();

        let common = lines
            .iter()
            .filter(|line| !line.is_empty())
            .map(|line| &line[..line.len() - line.trim_start().len()])
            .reduce(|a, b| common_prefix(a, b))
            .unwrap_or("");

        let start = lines.iter().position(|line| !line.is_empty());
        let end = lines.iter().rposition(|line| !line.is_empty());
        let (Some(start), Some(end)) = (start, end) else {
            return String::new();
        };

        lines[start..=end]
            .iter()
            .map(|line| line.strip_prefix(common).unwrap_or(line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn common_prefix<'a>(a: &'a str, b: &str) -> &'a str {
    let len = a
        .char_indices()
        .zip(b.chars())
        .find(|((_, x), y)| x != y)
        .map_or(a.len().min(b.len()), |((i, _), _)| i);
    &a[..len]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_common_indentation() {
        let code = "\n\n    let a = 1;\n      if (a) {}\n\n    done();   \n  ";
        assert_eq!(
            Reindent.format(code),
            "let a = 1;\n  if (a) {}\n\ndone();"
        );
    }

    #[test]
    fn mixed_indentation_keeps_the_shared_part() {
        assert_eq!(Reindent.format("\t\ta\n\t b"), "\ta\n b");
    }

    #[test]
    fn blank_code_is_empty() {
        assert_eq!(Reindent.format(" \n\t\n"), "");
    }
}
