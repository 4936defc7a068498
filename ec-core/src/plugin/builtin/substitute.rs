use crate::plugin::{Plugin, PluginError};

/// Demo plugin: every `e` becomes `X` and each line gets a ` <<` marker
/// before its newline.
#[derive(Debug, Default, Clone, Copy)]
pub struct SubstitutePlugin;

pub const LINE_MARKER: &str = " <<";

pub fn substitute(chunk: &str) -> String {
    let mut out = String::with_capacity(chunk.len());
    for c in chunk.chars() {
        match c {
            'e' => out.push('X'),
            '\n' => {
                out.push_str(LINE_MARKER);
                out.push('\n');
            }
            other => out.push(other),
        }
    }
    out
}

impl Plugin for SubstitutePlugin {
    fn name(&self) -> &'static str {
        "substitute"
    }

    fn transform(&self, chunk: &str) -> Result<String, PluginError> {
        Ok(substitute(chunk))
    }
}

#[cfg(test)]
mod tests {
    use super::substitute;
    use pretty_assertions::assert_eq;

    #[test]
    fn replaces_e_and_marks_line_ends() {
        assert_eq!(substitute("hello\n"), "hXllo <<\n");
    }

    #[test]
    fn marks_every_newline() {
        assert_eq!(substitute("one\ntwo\n\n"), "onX <<\ntwo <<\n <<\n");
    }

    #[test]
    fn uppercase_e_is_untouched() {
        assert_eq!(substitute("Error"), "Error");
    }

    #[test]
    fn second_pass_only_adds_markers() {
        let once = substitute("see here\n");
        let twice = substitute(&once);

        assert!(!once.contains('e'));
        assert_eq!(twice, once.replace('\n', " <<\n"));
    }
}
