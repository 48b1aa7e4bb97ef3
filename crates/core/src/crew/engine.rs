//! Crew execution engine.
//!
//! The CrewEngine runs a crew's tasks one after another against a single
//! model client, writing verbose progress text into a [`ChunkSink`] and
//! coordinating run state transitions.

use crate::annotator::ChunkSink;
use crate::llm::{CompletionRequest, ModelClient, ModelEvent};
use crate::state::run::{advance_task, complete_run, fail_run, start_run};
use anyhow::{anyhow, Result};
use ps_protocol::ipc::Event;
use ps_protocol::{Crew, Role, Run, TaskSpec};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tokio_stream::StreamExt;

const BOLD: &str = "\x1b[1m";
const MAGENTA: &str = "\x1b[95m";
const GREEN: &str = "\x1b[92m";
const RESET: &str = "\x1b[00m";

/// Runs crews sequentially on one model client.
pub struct CrewEngine {
    client: Arc<dyn ModelClient>,
}

impl CrewEngine {
    pub fn new(client: Arc<dyn ModelClient>) -> Self {
        Self { client }
    }

    /// Execute every task of `crew` and return the last task's output.
    ///
    /// Progress is written to `sink` as it happens:
    ///
    /// ```text
    ///  [DEBUG]: == Working Agent: Price Analyzer
    ///  [INFO]: == Starting Task: Analyze the retrieved price data...
    /// > Entering new CrewAgentExecutor chain...
    /// <model output, chunk by chunk>
    /// > Finished chain.
    ///  [DEBUG]: == [Price Analyzer] Task output: ...
    /// ```
    ///
    /// The run is started, advanced per task and completed or failed here;
    /// `sink.finish()` is called before the final status is emitted.
    ///
    /// # Errors
    ///
    /// Returns an error, after failing the run, if a task's role is missing
    /// or the model client reports an error.
    pub async fn run(
        &self,
        crew: &Crew,
        run: &mut Run,
        sink: &mut (dyn ChunkSink + Send),
        events_tx: &UnboundedSender<Event>,
    ) -> Result<String> {
        start_run(run, events_tx);
        tracing::info!(
            run_id = %run.id,
            crew = %crew.name,
            client = %self.client.describe(),
            "crew started"
        );

        let mut outputs: HashMap<&str, String> = HashMap::new();
        let mut result = String::new();

        for (index, task) in crew.tasks.iter().enumerate() {
            if index > 0 {
                advance_task(run, events_tx);
            }

            match self.execute_task(crew, task, &outputs, sink).await {
                Ok(output) => {
                    tracing::debug!(run_id = %run.id, task = %task.id, "task finished");
                    result = output.clone();
                    outputs.insert(task.id.as_str(), output);
                }
                Err(e) => {
                    sink.finish();
                    let message = format!("Task '{}' failed: {}", task.id, e);
                    tracing::warn!(run_id = %run.id, "{message}");
                    fail_run(run, events_tx, message.clone());
                    return Err(anyhow!(message));
                }
            }
        }

        sink.finish();
        complete_run(run, events_tx, result.clone());
        tracing::info!(run_id = %run.id, "crew completed");

        Ok(result)
    }

    async fn execute_task(
        &self,
        crew: &Crew,
        task: &TaskSpec,
        outputs: &HashMap<&str, String>,
        sink: &mut (dyn ChunkSink + Send),
    ) -> Result<String> {
        let role = crew
            .role(&task.agent)
            .ok_or_else(|| anyhow!("Agent '{}' is not part of crew '{}'", task.agent, crew.name))?;

        sink.write(&format!(
            "{BOLD}{MAGENTA} [DEBUG]: == Working Agent: {}{RESET}\n",
            role.name
        ));
        sink.write(&format!(
            "{BOLD}{GREEN} [INFO]: == Starting Task: {}{RESET}\n",
            task.description
        ));
        sink.write(&format!(
            "\n\n{BOLD}> Entering new CrewAgentExecutor chain...{RESET}\n"
        ));

        let context: Vec<&str> = task
            .context
            .iter()
            .filter_map(|id| outputs.get(id.as_str()).map(String::as_str))
            .collect();
        let request = build_request(role, task, &context);

        let mut stream = self.client.complete(&request).await?;
        let mut output = String::new();
        while let Some(event) = stream.next().await {
            match event? {
                ModelEvent::Chunk(text) => {
                    sink.write(&text);
                    output.push_str(&text);
                }
                ModelEvent::Completed => break,
            }
        }

        if !output.ends_with('\n') {
            sink.write("\n");
        }
        sink.write(&format!("{BOLD}> Finished chain.{RESET}\n"));

        let output = output.trim().to_string();
        sink.write(&format!(
            "{BOLD}{MAGENTA} [DEBUG]: == [{}] Task output: {}{RESET}\n\n",
            role.name, output
        ));

        Ok(output)
    }
}

/// Prompt for one task: the role as system prompt, the task and its
/// expected output as the user prompt, followed by upstream outputs.
fn build_request(role: &Role, task: &TaskSpec, context: &[&str]) -> CompletionRequest {
    let mut system_prompt = format!("You are {}.", role.name);
    if !role.backstory.trim().is_empty() {
        system_prompt.push(' ');
        system_prompt.push_str(role.backstory.trim());
    }
    system_prompt.push_str(&format!("\nYour personal goal is: {}", role.goal));

    let mut prompt = format!(
        "{}\n\nThis is the expected criteria for your final answer: {}\nYou MUST return the actual complete content as the final answer, not a summary.",
        task.description, task.expected_output
    );
    if !context.is_empty() {
        prompt.push_str("\n\nThis is the context you're working with:\n");
        prompt.push_str(&context.join("\n\n"));
    }

    CompletionRequest::new(prompt).with_system_prompt(system_prompt)
}
