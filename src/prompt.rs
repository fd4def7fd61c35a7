//! Asking the user for configuration values that no file supplied.
use std::future::Future;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::config::ConfigValues;
use crate::error::ConfigError;

/// One pending question: the key to fill and the text shown for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    /// Configuration key the answer is stored under.
    pub name: String,
    /// Prompt text.
    pub message: String,
}

impl Question {
    /// A question for `name`.
    #[must_use]
    pub fn new(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            message: message.to_string(),
        }
    }
}

/// Interactive collaborator that answers a batch of questions at once.
pub trait Prompter: Send + Sync {
    /// Ask every question and return `name → answer`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Prompt`] if the answers cannot be collected.
    fn ask(
        &self,
        questions: &[Question],
    ) -> impl Future<Output = Result<ConfigValues, ConfigError>> + Send;
}

/// Prompts on stdout and reads one line per answer from stdin.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinPrompter;

impl Prompter for StdinPrompter {
    async fn ask(&self, questions: &[Question]) -> Result<ConfigValues, ConfigError> {
        let mut input = BufReader::new(tokio::io::stdin());
        let mut output = tokio::io::stdout();
        prompt_lines(questions, &mut input, &mut output).await
    }
}

/// Ask `questions` in order on `output`, reading one answer line each from
/// `input`. Trailing line endings are stripped; the answer is otherwise kept
/// as typed.
///
/// # Errors
///
/// Returns [`ConfigError::Prompt`] on an I/O failure or if `input` ends
/// before every question is answered.
pub async fn prompt_lines<R, W>(
    questions: &[Question],
    input: &mut R,
    output: &mut W,
) -> Result<ConfigValues, ConfigError>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    let mut answers = ConfigValues::new();
    for question in questions {
        output
            .write_all(format!("? {} ", question.message).as_bytes())
            .await
            .map_err(|e| ConfigError::Prompt(e.to_string()))?;
        output
            .flush()
            .await
            .map_err(|e| ConfigError::Prompt(e.to_string()))?;

        let mut line = String::new();
        let read = input
            .read_line(&mut line)
            .await
            .map_err(|e| ConfigError::Prompt(e.to_string()))?;
        if read == 0 {
            return Err(ConfigError::Prompt(format!(
                "input closed before '{}' was answered",
                question.name
            )));
        }
        let answer = line.trim_end_matches(['\r', '\n']);
        answers.insert(question.name.clone(), answer.to_string());
    }
    Ok(answers)
}
