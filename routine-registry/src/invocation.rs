//! Splits message text into a command name and argument tokens.

/// A parsed command invocation: first whitespace token is the command, the rest are arguments.
///
/// The message text is kept so a trailing string argument can be taken verbatim, with its
/// newlines and spacing intact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub command: String,
    pub args: Vec<String>,
    text: String,
    /// Byte offset of each entry of `args` in `text`.
    arg_starts: Vec<usize>,
}

impl Invocation {
    /// Parses `text`. Empty or all-whitespace text yields an empty command, which never
    /// matches a registered routine.
    pub fn parse(text: &str) -> Self {
        let mut words = text
            .split_whitespace()
            .map(|word| (word.as_ptr() as usize - text.as_ptr() as usize, word));
        let command = words
            .next()
            .map(|(_, word)| word.to_string())
            .unwrap_or_default();
        let (arg_starts, args) = words.map(|(start, word)| (start, word.to_string())).unzip();
        Self {
            command,
            args,
            text: text.to_string(),
            arg_starts,
        }
    }

    /// Message text from argument `index` to the end, trailing whitespace removed.
    pub fn rest_from(&self, index: usize) -> Option<&str> {
        self.arg_starts
            .get(index)
            .map(|&start| self.text[start..].trim_end())
    }
}
