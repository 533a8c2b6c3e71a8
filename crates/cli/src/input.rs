//! Whitespace-token reader over an async line source

use std::collections::VecDeque;

use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};

/// Hands out one whitespace-separated token at a time, reading further lines
/// only when the current one is used up
pub struct TokenReader<R> {
    lines: Lines<R>,
    pending: VecDeque<String>,
}

impl<R: AsyncBufRead + Unpin> TokenReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            pending: VecDeque::new(),
        }
    }

    /// Next token, or `None` at end of input
    pub async fn next_token(&mut self) -> Result<Option<String>> {
        while self.pending.is_empty() {
            match self.lines.next_line().await? {
                Some(line) => self
                    .pending
                    .extend(line.split_whitespace().map(str::to_string)),
                None => return Ok(None),
            }
        }
        Ok(self.pending.pop_front())
    }

    /// Rest of the current line as a single string (file names may hold spaces)
    pub async fn next_line(&mut self) -> Result<Option<String>> {
        if !self.pending.is_empty() {
            let rest: Vec<String> = self.pending.drain(..).collect();
            return Ok(Some(rest.join(" ")));
        }
        loop {
            match self.lines.next_line().await? {
                Some(line) if line.trim().is_empty() => continue,
                Some(line) => return Ok(Some(line.trim().to_string())),
                None => return Ok(None),
            }
        }
    }

    /// Drop whatever is left of the current line
    pub fn discard_line(&mut self) {
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::BufReader;

    #[tokio::test]
    async fn test_tokens_span_lines() {
        let mut reader = TokenReader::new(BufReader::new("1 2\n\n  3\n".as_bytes()));
        assert_eq!(reader.next_token().await.unwrap().as_deref(), Some("1"));
        assert_eq!(reader.next_token().await.unwrap().as_deref(), Some("2"));
        assert_eq!(reader.next_token().await.unwrap().as_deref(), Some("3"));
        assert_eq!(reader.next_token().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_line_keeps_spaces() {
        let mut reader = TokenReader::new(BufReader::new("3\nmy calls.txt\n".as_bytes()));
        assert_eq!(reader.next_token().await.unwrap().as_deref(), Some("3"));
        assert_eq!(
            reader.next_line().await.unwrap().as_deref(),
            Some("my calls.txt")
        );
    }

    #[tokio::test]
    async fn test_discard_line() {
        let mut reader = TokenReader::new(BufReader::new("x y\nz\n".as_bytes()));
        assert_eq!(reader.next_token().await.unwrap().as_deref(), Some("x"));
        reader.discard_line();
        assert_eq!(reader.next_token().await.unwrap().as_deref(), Some("z"));
    }
}
