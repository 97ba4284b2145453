use anyhow::Result;
use async_trait::async_trait;
use docqa_llm::Answerer;
use docqa_vector_store::{render_context, DocumentIndex, Embedder, Retriever};
use std::io::{self, BufRead, Write};

const PROMPT: &str = "Du: ";
const EXIT_COMMANDS: [&str; 3] = ["q", "quit", "exit"];

/// Turns one question into the text printed after `Bot: `
#[async_trait]
pub trait Responder: Send + Sync {
    async fn respond(&self, question: &str) -> Result<String>;
}

#[async_trait]
impl Responder for Answerer<'_> {
    async fn respond(&self, question: &str) -> Result<String> {
        let answer = self.answer(question).await?;
        log::debug!("Answer grounded on {} chunks", answer.sources.len());
        Ok(answer.text)
    }
}

/// Dry-run responder: shows what would be sent as context, never generates
pub struct ContextPreview<'a> {
    index: &'a DocumentIndex,
    embedder: &'a dyn Embedder,
    retriever: Retriever,
}

impl<'a> ContextPreview<'a> {
    pub fn new(index: &'a DocumentIndex, embedder: &'a dyn Embedder, retriever: Retriever) -> Self {
        Self {
            index,
            embedder,
            retriever,
        }
    }
}

#[async_trait]
impl Responder for ContextPreview<'_> {
    async fn respond(&self, question: &str) -> Result<String> {
        let results = self
            .retriever
            .retrieve(self.index, self.embedder, question)
            .await?;
        let scores = results
            .iter()
            .map(|r| format!("#{} ({:.3})", r.chunk.index, r.score))
            .collect::<Vec<_>>()
            .join(", ");
        Ok(format!("[dry-run] {scores}\n{}", render_context(&results)))
    }
}

/// `q`, `quit` or `exit` in any case, ignoring surrounding whitespace
#[must_use]
pub fn is_exit_command(line: &str) -> bool {
    let line = line.trim();
    EXIT_COMMANDS
        .iter()
        .any(|cmd| line.eq_ignore_ascii_case(cmd))
}

/// The read-answer loop over an arbitrary line source and sink
pub struct Session<'a> {
    responder: &'a dyn Responder,
    document: String,
}

impl<'a> Session<'a> {
    pub fn new(responder: &'a dyn Responder, document: impl Into<String>) -> Self {
        Self {
            responder,
            document: document.into(),
        }
    }

    /// Runs until an exit command or end of input.
    ///
    /// Only I/O failures on `input`/`output` end the loop with an error;
    /// responder failures are printed as `Fel: ...` and the loop continues.
    pub async fn run<R: BufRead, W: Write>(&self, mut input: R, mut output: W) -> io::Result<()> {
        writeln!(
            output,
            "🤖 Chattbot för {}. Skriv 'q' för att avsluta.",
            self.document
        )?;

        let mut line = String::new();
        loop {
            write!(output, "{PROMPT}")?;
            output.flush()?;

            line.clear();
            if input.read_line(&mut line)? == 0 {
                log::debug!("End of input");
                writeln!(output)?;
                break;
            }

            let question = line.trim();
            if is_exit_command(question) {
                break;
            }
            if question.is_empty() {
                continue;
            }

            match self.responder.respond(question).await {
                Ok(answer) => writeln!(output, "Bot: {answer}")?,
                Err(err) => {
                    log::error!("Query failed: {err:#}");
                    writeln!(output, "Fel: {err:#}")?;
                }
            }
        }

        output.flush()
    }
}
