//! Demo routines shipped with the `rbot` binary.

use rbot_core::RoutineError;
use routine_registry::RoutineRegistry;

/// Upper bound for `repeat` so one message cannot flood a chat.
pub const MAX_REPEAT: i64 = 20;

fn echo(text: String) -> String {
    text
}

fn add(a: i64, b: i64) -> String {
    match a.checked_add(b) {
        Some(sum) => sum.to_string(),
        None => "overflow".to_string(),
    }
}

fn div(a: f64, b: f64) -> anyhow::Result<String> {
    if b == 0.0 {
        anyhow::bail!("division by zero");
    }
    Ok((a / b).to_string())
}

fn repeat(times: i64, text: String) -> anyhow::Result<String> {
    if !(1..=MAX_REPEAT).contains(&times) {
        anyhow::bail!("times must be between 1 and {}", MAX_REPEAT);
    }
    let lines: Vec<&str> = std::iter::repeat(text.as_str()).take(times as usize).collect();
    Ok(lines.join("\n"))
}

fn ping() -> &'static str {
    "pong"
}

/// Registers the demo routines, then a `help` routine listing everything registered so far.
pub fn register_demo_routines(registry: &RoutineRegistry) -> Result<(), RoutineError> {
    registry.register_fn("echo", echo)?;
    registry.register_fn("add", add)?;
    registry.register_fn("div", div)?;
    registry.register_fn("repeat", repeat)?;
    registry.register_fn("ping", ping)?;

    let mut listing: Vec<String> = registry
        .names()
        .into_iter()
        .filter_map(|name| {
            registry
                .lookup(&name)
                .map(|routine| format!("{}{}", name, routine.signature()))
        })
        .collect();
    listing.push("help()".to_string());
    let help_text = format!("Available routines:\n{}", listing.join("\n"));
    registry.register_fn("help", move || help_text.clone())
}

/// Builds a registry holding only the demo routines.
pub fn demo_registry() -> Result<RoutineRegistry, RoutineError> {
    let registry = RoutineRegistry::new();
    register_demo_routines(&registry)?;
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rbot_dispatch::route::reply_text;

    #[tokio::test]
    async fn test_echo_joins_words() {
        let registry = demo_registry().unwrap();
        assert_eq!(reply_text(&registry, "echo hello world").await, "hello world");
    }

    #[tokio::test]
    async fn test_add_casts_ints() {
        let registry = demo_registry().unwrap();
        assert_eq!(reply_text(&registry, "add 2 40").await, "42");
        assert_eq!(
            reply_text(&registry, "add 2 x").await,
            "wrong type of args: argument 1 must be int, got \"x\""
        );
        assert_eq!(
            reply_text(&registry, "add 2").await,
            "wrong number of args. Given: 1, Takes: 2"
        );
    }

    #[tokio::test]
    async fn test_div_reports_handler_error() {
        let registry = demo_registry().unwrap();
        assert_eq!(reply_text(&registry, "div 1 4").await, "0.25");
        assert_eq!(reply_text(&registry, "div 1 0").await, "division by zero");
    }

    #[tokio::test]
    async fn test_repeat_bounds() {
        let registry = demo_registry().unwrap();
        assert_eq!(reply_text(&registry, "repeat 2 hi there").await, "hi there\nhi there");
        assert!(reply_text(&registry, "repeat 0 hi").await.starts_with("times must be"));
        assert_eq!(reply_text(&registry, "repeat 2 a\n  b").await, "a\n  b\na\n  b");
    }

    #[tokio::test]
    async fn test_help_lists_signatures() {
        let registry = demo_registry().unwrap();
        let help = reply_text(&registry, "help").await;
        assert!(help.starts_with("Available routines:"));
        assert!(help.contains("add(int, int)"));
        assert!(help.contains("ping()"));
        assert!(help.contains("help()"));
    }

    #[test]
    fn test_register_twice_is_rejected() {
        let registry = demo_registry().unwrap();
        assert_eq!(
            register_demo_routines(&registry),
            Err(RoutineError::NameTaken("echo".to_string()))
        );
    }

    #[tokio::test]
    async fn test_unknown_command() {
        let registry = demo_registry().unwrap();
        assert_eq!(reply_text(&registry, "nope").await, "routine not found");
    }
}
