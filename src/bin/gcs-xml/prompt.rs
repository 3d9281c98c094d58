use std::io::{self, BufRead, Write};

/// Line-oriented console prompts over any reader/writer pair.
pub struct Prompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Prints `label` and reads one line without its line ending. End of
    /// input is reported as `UnexpectedEof`.
    pub fn ask(&mut self, label: &str) -> io::Result<String> {
        write!(self.output, "{label}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    /// Asks until the answer is `yes` or `no`.
    pub fn confirm(&mut self, label: &str) -> io::Result<String> {
        self.say(label)?;
        loop {
            let answer = self.ask("Enter [yes | no]: ")?;
            let answer = answer.trim();
            if answer == "yes" || answer == "no" {
                return Ok(answer.to_string());
            }
        }
    }

    pub fn say(&mut self, text: impl std::fmt::Display) -> io::Result<()> {
        writeln!(self.output, "{text}")
    }

    pub fn print(&mut self, text: &str) -> io::Result<()> {
        write!(self.output, "{text}")
    }
}
