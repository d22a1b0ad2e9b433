//! Line-oriented operator input on stdin.

use std::io::Write;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

pub type Input = Lines<BufReader<Stdin>>;

pub fn stdin_lines() -> Input {
    BufReader::new(tokio::io::stdin()).lines()
}

/// Print `text` and read one line. `None` at end of input.
pub async fn prompt(input: &mut Input, text: &str) -> Result<Option<String>> {
    print!("{text}");
    std::io::stdout().flush()?;
    Ok(input.next_line().await?)
}

pub async fn confirm(input: &mut Input, text: &str) -> Result<bool> {
    let answer = prompt(input, text).await?.unwrap_or_default();
    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "ya" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_indonesian_and_english_yes() {
        assert!(is_yes("y"));
        assert!(is_yes(" Ya \n"));
        assert!(is_yes("YES"));
        assert!(!is_yes(""));
        assert!(!is_yes("tidak"));
    }
}
