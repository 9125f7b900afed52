//! Summarizer adapter: instruction + source text in, cleaned short text out.
//!
//! Every request the builder makes goes through [`Summarizer::summarize`], so
//! this is also where oracle usage is counted for [`crate::output::RoadmapStats`].

use crate::error::RoadmapError;
use crate::pipeline::clean::clean_response;
use crate::pipeline::oracle::Oracle;
use tracing::debug;

/// Running totals of oracle usage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OracleUsage {
    pub calls: usize,
    pub input_tokens: u64,
    pub output_tokens: u64,
}

/// Wraps an [`Oracle`] with prompt formation and response cleaning.
pub struct Summarizer<O> {
    oracle: O,
    usage: OracleUsage,
}

impl<O: Oracle> Summarizer<O> {
    pub fn new(oracle: O) -> Self {
        Self {
            oracle,
            usage: OracleUsage::default(),
        }
    }

    /// Ask the oracle to apply `instruction` to `source`.
    ///
    /// The prompt is the instruction, a blank line, then the source text.
    /// The response is trimmed and one leading `label: ` is stripped. An
    /// empty string is a legitimate result; oracle failures are returned.
    pub async fn summarize(
        &mut self,
        source: &str,
        instruction: &str,
        max_tokens: usize,
    ) -> Result<String, RoadmapError> {
        let prompt = build_prompt(instruction, source);
        let completion = self.oracle.complete(&prompt, max_tokens).await?;

        self.usage.calls += 1;
        self.usage.input_tokens += completion.prompt_tokens as u64;
        self.usage.output_tokens += completion.completion_tokens as u64;

        let cleaned = clean_response(&completion.content);
        debug!(
            call = self.usage.calls,
            max_tokens,
            "oracle answered {:?}",
            cleaned
        );
        Ok(cleaned)
    }

    pub fn usage(&self) -> OracleUsage {
        self.usage
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }
}

fn build_prompt(instruction: &str, source: &str) -> String {
    format!("{instruction}\n\n{source}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::oracle::Completion;
    use std::sync::Mutex;

    struct EchoOracle {
        reply: String,
        prompts: Mutex<Vec<(String, usize)>>,
    }

    impl Oracle for EchoOracle {
        async fn complete(&self, prompt: &str, max_tokens: usize) -> Result<Completion, RoadmapError> {
            self.prompts.lock().unwrap().push((prompt.to_string(), max_tokens));
            Ok(Completion {
                content: self.reply.clone(),
                prompt_tokens: 12,
                completion_tokens: 3,
            })
        }
    }

    struct FailingOracle;

    impl Oracle for FailingOracle {
        async fn complete(&self, _prompt: &str, _max_tokens: usize) -> Result<Completion, RoadmapError> {
            Err(RoadmapError::OracleFailed {
                attempts: 1,
                message: "401 unauthorized".into(),
            })
        }
    }

    fn echo(reply: &str) -> EchoOracle {
        EchoOracle {
            reply: reply.into(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    #[test]
    fn prompt_is_instruction_blank_line_source() {
        assert_eq!(build_prompt("Do X.", "body"), "Do X.\n\nbody");
    }

    #[test]
    fn summarize_cleans_and_counts() {
        let mut s = Summarizer::new(echo("  Title: Search Algorithms\n"));
        let out = tokio_test::block_on(s.summarize("page text", "Extract the title.", 20)).unwrap();

        assert_eq!(out, "Search Algorithms");
        assert_eq!(
            s.usage(),
            OracleUsage {
                calls: 1,
                input_tokens: 12,
                output_tokens: 3
            }
        );
        let prompts = s.oracle().prompts.lock().unwrap();
        assert_eq!(prompts[0], ("Extract the title.\n\npage text".to_string(), 20));
    }

    #[test]
    fn whitespace_reply_becomes_empty_string() {
        let mut s = Summarizer::new(echo(" \n "));
        let out = tokio_test::block_on(s.summarize("text", "Do it.", 20)).unwrap();
        assert_eq!(out, "");
    }

    #[test]
    fn oracle_failure_propagates_and_is_not_counted() {
        let mut s = Summarizer::new(FailingOracle);
        let err = tokio_test::block_on(s.summarize("text", "Do it.", 20)).unwrap_err();
        assert!(err.to_string().contains("401"));
        assert_eq!(s.usage().calls, 0);
    }
}
