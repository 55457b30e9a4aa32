//! Request dispatch: the four tutoring operations.
//!
//! [`TutorService`] owns the provider handle and the response cache and is
//! shared by both protocol surfaces. The public operations are total:
//! a provider failure comes back as a short fenced message, so a single
//! bad request can never take down a connection. The `try_` variants
//! expose the underlying result for surfaces that map failures to a
//! status code.

pub mod prompts;

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::debug;

use crate::cache::ResponseCache;
use crate::context::prepare::prefix_chars;
use crate::context::{detect_language, prepare_context};
use crate::error::{Result, TutorError};
use crate::postprocess;
use crate::providers::CompletionProvider;

/// Files beyond this count are ignored in project analysis.
const PROJECT_MAX_FILES: usize = 15;

/// Per-file character budget in the combined project context.
const PROJECT_FILE_CHARS: usize = 2000;

/// Total character budget for the combined project context.
const PROJECT_TOTAL_CHARS: usize = 8000;

/// Pseudo-filename marking a multi-file analysis request.
const PROJECT_FILE_LABEL: &str = "PROJECT";

const DEFAULT_PROJECT_QUESTION: &str =
    "Analyze the project and suggest improvements or issues.";

/// The dispatcher behind both protocol surfaces.
pub struct TutorService {
    provider: Arc<dyn CompletionProvider>,
    cache: Mutex<ResponseCache>,
}

impl TutorService {
    pub fn new(provider: Arc<dyn CompletionProvider>, cache_capacity: usize) -> Self {
        Self {
            provider,
            cache: Mutex::new(ResponseCache::new(cache_capacity)),
        }
    }

    /// Explain an error in context. Total: failures come back as a
    /// fenced error message.
    pub async fn explain_error(
        &self,
        code_context: &str,
        error_message: &str,
        language: &str,
        file_name: &str,
    ) -> String {
        self.try_explain_error(code_context, error_message, language, file_name)
            .await
            .unwrap_or_else(|e| fenced_error("Error analyzing code", &e))
    }

    pub async fn try_explain_error(
        &self,
        code_context: &str,
        error_message: &str,
        language: &str,
        file_name: &str,
    ) -> Result<String> {
        let language = detect_language(language, file_name, code_context);
        let context = prepare_context(code_context);
        let key = ResponseCache::cache_key("explain-error", &context, error_message, &language);
        if let Some(hit) = self.cache.lock().await.get(&key) {
            debug!("cache hit for error explanation");
            return Ok(hit);
        }
        let prompt = prompts::error_prompt(&context, error_message, &language, file_name);
        let raw = self.provider.complete(&prompt.system, &prompt.human).await?;
        let message = postprocess::finalize_as_code(&postprocess::clean(&raw), &language);
        self.cache.lock().await.put(key, message.clone());
        Ok(message)
    }

    /// Proactive suggestions when the editor goes quiet. Total.
    ///
    /// `recent_edits` is accepted for interface compatibility but does not
    /// reach the prompt.
    pub async fn suggest_on_inactivity(
        &self,
        code_context: &str,
        current_file: &str,
        recent_edits: &str,
        language: &str,
    ) -> String {
        self.try_suggest_on_inactivity(code_context, current_file, recent_edits, language)
            .await
            .unwrap_or_else(|e| fenced_error("Error providing suggestions", &e))
    }

    pub async fn try_suggest_on_inactivity(
        &self,
        code_context: &str,
        current_file: &str,
        recent_edits: &str,
        language: &str,
    ) -> Result<String> {
        debug!(
            file = %current_file,
            edits = recent_edits.len(),
            "inactivity suggestion request"
        );
        let language = detect_language(language, current_file, code_context);
        let context = prepare_context(code_context);
        let key = ResponseCache::cache_key("suggest-on-inactivity", &context, current_file, &language);
        if let Some(hit) = self.cache.lock().await.get(&key) {
            debug!("cache hit for inactivity suggestion");
            return Ok(hit);
        }
        let prompt = prompts::inactivity_prompt(&context, current_file, &language);
        let raw = self.provider.complete(&prompt.system, &prompt.human).await?;
        let message = postprocess::finalize_as_code(&postprocess::clean(&raw), &language);
        self.cache.lock().await.put(key, message.clone());
        Ok(message)
    }

    /// Answer a free-form question with code context. Total.
    pub async fn answer_question(
        &self,
        code_context: &str,
        current_file: &str,
        user_question: &str,
        language: &str,
    ) -> String {
        self.try_answer_question(code_context, current_file, user_question, language)
            .await
            .unwrap_or_else(|e| fenced_error("Error answering question", &e))
    }

    pub async fn try_answer_question(
        &self,
        code_context: &str,
        current_file: &str,
        user_question: &str,
        language: &str,
    ) -> Result<String> {
        let language = detect_language(language, current_file, code_context);
        let context = prepare_context(code_context);
        let key = ResponseCache::cache_key("answer-question", &context, user_question, &language);
        if let Some(hit) = self.cache.lock().await.get(&key) {
            debug!("cache hit for question");
            return Ok(hit);
        }
        let prompt = prompts::question_prompt(&context, current_file, user_question, &language);
        let raw = self.provider.complete(&prompt.system, &prompt.human).await?;
        let message = postprocess::finalize_as_prose(&postprocess::clean(&raw), user_question);
        self.cache.lock().await.put(key, message.clone());
        Ok(message)
    }

    /// Architectural analysis over a set of project files. Total.
    ///
    /// Files are combined into a single bounded context (at most
    /// [`PROJECT_MAX_FILES`] files, [`PROJECT_FILE_CHARS`] chars each,
    /// [`PROJECT_TOTAL_CHARS`] overall) and dispatched as a question with
    /// the `PROJECT` pseudo-file.
    pub async fn analyze_project(
        &self,
        files: &[(String, String)],
        user_question: &str,
        language: &str,
    ) -> String {
        let combined = combine_project_files(files);
        let question = if user_question.trim().is_empty() {
            DEFAULT_PROJECT_QUESTION
        } else {
            user_question
        };
        self.answer_question(&combined, PROJECT_FILE_LABEL, question, language)
            .await
    }
}

/// A provider failure shaped as a short fenced reply.
fn fenced_error(prefix: &str, err: &TutorError) -> String {
    format!("```\n{prefix}: {err}\n```")
}

/// Combine project files into one bounded context, each framed with its
/// filename and detected language.
fn combine_project_files(files: &[(String, String)]) -> String {
    let mut sections = Vec::new();
    let mut budget = PROJECT_TOTAL_CHARS;
    for (filename, content) in files.iter().take(PROJECT_MAX_FILES) {
        if budget == 0 {
            break;
        }
        let language = detect_language("", filename, content);
        let snippet = prefix_chars(content, PROJECT_FILE_CHARS);
        let section = format!("File: {filename} (Language: {language})\n{snippet}");
        let section_chars = section.chars().count();
        if section_chars >= budget {
            sections.push(prefix_chars(&section, budget).to_string());
            budget = 0;
        } else {
            budget -= section_chars;
            sections.push(section);
        }
    }
    sections.join("\n\n")
}
