use crate::error::Result;
use crate::generator::Generator;
use crate::prompt::build_prompt;
use docqa_vector_store::{render_context, DocumentIndex, Embedder, Retriever, SearchResult};

/// A generated answer together with what it was grounded on
#[derive(Debug, Clone)]
pub struct Answer {
    pub text: String,
    pub context: String,
    pub sources: Vec<SearchResult>,
}

/// Retrieves context for a question and asks the generator once
pub struct Answerer<'a> {
    index: &'a DocumentIndex,
    embedder: &'a dyn Embedder,
    generator: &'a dyn Generator,
    retriever: Retriever,
}

impl<'a> Answerer<'a> {
    pub fn new(
        index: &'a DocumentIndex,
        embedder: &'a dyn Embedder,
        generator: &'a dyn Generator,
        retriever: Retriever,
    ) -> Self {
        Self {
            index,
            embedder,
            generator,
            retriever,
        }
    }

    pub async fn answer(&self, query: &str) -> Result<Answer> {
        let sources = self
            .retriever
            .retrieve(self.index, self.embedder, query)
            .await?;
        let context = render_context(&sources);
        let prompt = build_prompt(&context, query);

        log::debug!(
            "Prompting {} with {} chunks ({} chars)",
            self.generator.model_id(),
            sources.len(),
            prompt.chars().count()
        );
        let text = self.generator.generate(&prompt).await?;

        Ok(Answer {
            text,
            context,
            sources,
        })
    }
}
