//! Route stage: message text → routine → reply text.

use rbot_core::RoutineError;
use routine_registry::{Invocation, RoutineRegistry};
use tracing::{debug, info};

/// Resolves `text` to a routine and executes it.
pub async fn resolve(registry: &RoutineRegistry, text: &str) -> Result<String, RoutineError> {
    let invocation = Invocation::parse(text);
    let routine = registry.lookup(&invocation.command).ok_or_else(|| {
        debug!(command = %invocation.command, "no routine registered");
        RoutineError::RoutineNotFound
    })?;
    info!(
        command = %invocation.command,
        arg_count = invocation.args.len(),
        "step: executing routine"
    );
    routine.execute_invocation(&invocation).await
}

/// Like [`resolve`], but every failure becomes its user-visible message.
pub async fn reply_text(registry: &RoutineRegistry, text: &str) -> String {
    match resolve(registry, text).await {
        Ok(reply) => reply,
        Err(e) => {
            info!(error = %e, "step: routine failed, replying with error text");
            e.to_string()
        }
    }
}
