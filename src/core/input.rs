//! Operator input channel
//!
//! The commit-and-push flow reads exactly one line per dirty repository.
//! Only the serial reconcile phase ever holds the channel.

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::error::InputError;

/// Source of operator-typed lines
#[async_trait]
pub trait OperatorInput: Send {
    /// Shows `prompt` and blocks until one line is available
    ///
    /// The returned text is untrimmed. End of input is [`InputError::Closed`].
    async fn read_line(&mut self, prompt: &str) -> Result<String, InputError>;
}

/// Line-oriented input over any async reader, echoing prompts to a writer
pub struct LineInput<R, W> {
    reader: R,
    writer: W,
}

/// The interactive terminal: prompts on stdout, answers from stdin
pub type StdinInput = LineInput<BufReader<tokio::io::Stdin>, tokio::io::Stdout>;

impl StdinInput {
    pub fn stdio() -> Self {
        LineInput::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
    }
}

impl<R, W> LineInput<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    pub fn into_writer(self) -> W {
        self.writer
    }
}

#[async_trait]
impl<R, W> OperatorInput for LineInput<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn read_line(&mut self, prompt: &str) -> Result<String, InputError> {
        self.writer.write_all(prompt.as_bytes()).await?;
        self.writer.flush().await?;

        let mut line = String::new();
        if self.reader.read_line(&mut line).await? == 0 {
            return Err(InputError::Closed);
        }
        Ok(line)
    }
}
