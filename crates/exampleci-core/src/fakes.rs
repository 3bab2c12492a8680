//! In-memory command executor (testing only)
//!
//! `ScriptedExecutor` records every invocation and answers with outputs
//! chosen by matching rules, so pipelines can be driven without spawning git
//! or Gradle.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::ExecError;
use crate::exec::{CommandExecutor, CommandOutput, Invocation};

/// Canned response for invocations that name `needle`.
#[derive(Debug, Clone)]
struct Rule {
    needle: String,
    output: Option<CommandOutput>,
}

/// Executor that replays scripted outputs and records invocations.
///
/// Rules are checked in insertion order; the first rule whose needle names
/// the program or an argument wins. A word names `needle` when it equals it,
/// or when its last path segment does (with any `.git` suffix dropped), so
/// `alpha` matches `/tmp/x/alpha` and `https://host/org/alpha.git` but never
/// a longer segment such as `alphabet`. Unmatched invocations succeed with
/// empty output.
#[derive(Debug, Default)]
pub struct ScriptedExecutor {
    rules: Mutex<Vec<Rule>>,
    calls: Mutex<Vec<Invocation>>,
}

impl ScriptedExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Respond with `output` to invocations naming `needle`.
    pub fn respond(self, needle: impl Into<String>, output: CommandOutput) -> Self {
        self.rules.lock().unwrap().push(Rule {
            needle: needle.into(),
            output: Some(output),
        });
        self
    }

    /// Fail to spawn invocations naming `needle`.
    pub fn fail_spawn(self, needle: impl Into<String>) -> Self {
        self.rules.lock().unwrap().push(Rule {
            needle: needle.into(),
            output: None,
        });
        self
    }

    /// All invocations seen so far.
    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap().clone()
    }

    /// Invocations whose program or arguments name `needle`.
    pub fn calls_matching(&self, needle: &str) -> Vec<Invocation> {
        self.calls()
            .into_iter()
            .filter(|inv| mentions(inv, needle))
            .collect()
    }
}

fn mentions(invocation: &Invocation, needle: &str) -> bool {
    std::iter::once(&invocation.program)
        .chain(&invocation.args)
        .any(|word| names(word, needle))
}

fn names(word: &str, needle: &str) -> bool {
    if word == needle {
        return true;
    }
    let last = word
        .trim_end_matches('/')
        .rsplit(|c: char| c == '/' || c == ':')
        .next()
        .unwrap_or(word);
    last.strip_suffix(".git").unwrap_or(last) == needle
}

#[async_trait]
impl CommandExecutor for ScriptedExecutor {
    async fn execute(&self, invocation: &Invocation) -> Result<CommandOutput, ExecError> {
        self.calls.lock().unwrap().push(invocation.clone());

        let rules = self.rules.lock().unwrap();
        match rules.iter().find(|rule| mentions(invocation, &rule.needle)) {
            Some(Rule {
                output: Some(output),
                ..
            }) => Ok(output.clone()),
            Some(Rule { output: None, .. }) => Err(ExecError::Spawn {
                program: invocation.program.clone(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "scripted spawn failure"),
            }),
            None => Ok(CommandOutput::default()),
        }
    }
}
