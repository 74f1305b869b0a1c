use std::io::{self, BufRead, Write};

/// Asks a yes/no question; only an explicit `y` or `yes` counts as consent.
pub fn confirm(
    question: &str,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> io::Result<bool> {
    write!(output, "{question} [y/N] ")?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    let answer = answer.trim();
    Ok(answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ask(reply: &str) -> (bool, String) {
        let mut input = reply.as_bytes();
        let mut output = Vec::new();
        let answer = confirm("Delete this complaint?", &mut input, &mut output).expect("prompt");
        (answer, String::from_utf8(output).expect("utf8"))
    }

    #[test]
    fn yes_answers_confirm() {
        assert!(ask("y\n").0);
        assert!(ask("YES\n").0);
        assert!(ask("  yes  \n").0);
    }

    #[test]
    fn anything_else_declines() {
        assert!(!ask("\n").0);
        assert!(!ask("n\n").0);
        assert!(!ask("sure\n").0);
        assert!(!ask("").0);
    }

    #[test]
    fn question_is_written_before_reading() {
        let (_, prompt) = ask("n\n");
        assert_eq!(prompt, "Delete this complaint? [y/N] ");
    }
}
