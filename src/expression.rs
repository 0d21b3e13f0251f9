use crate::normalize::{OptionsBuilder, ToOptions};
use crate::option_record;
use crate::protocol::Command;
use crate::OptionValue;
use tracing::debug;

option_record! {
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct EvaluateOptions {
        pub await_promise: Option<bool> => "awaitPromise",
        pub return_by_value: Option<bool> => "returnByValue",
        pub user_gesture: Option<bool> => "userGesture",
        pub timeout: Option<u64>,
    }
}

/// Whether `expression` is a function to be invoked rather than evaluated.
pub fn is_function_body(expression: &str) -> bool {
    let expression = expression.trim();
    expression.starts_with("function")
        || expression.starts_with("async ")
        || expression.contains("=> ")
}

/// Builds `Runtime.evaluate` for `expression`. Function bodies are wrapped in
/// an immediate call with no arguments and awaited unless `options` says
/// otherwise.
pub fn evaluate_command<T: ToOptions + ?Sized>(expression: &str, options: &T) -> Command {
    if is_function_body(expression) {
        call_function_command(expression, &[], options)
    } else {
        let base = OptionsBuilder::new().insert("expression", expression.trim());
        Command::new("Runtime.evaluate", base.merge(options).build())
    }
}

/// Invokes `declaration` in the page with `args` passed as JSON literals,
/// e.g. `(a) => a.x` with `{"x":1}` evaluates `((a) => a.x)({"x":1})`.
/// The call is awaited unless `options` says otherwise.
pub fn call_function_command<T: ToOptions + ?Sized>(
    declaration: &str,
    args: &[OptionValue],
    options: &T,
) -> Command {
    let declaration = declaration.trim();
    if !is_function_body(declaration) {
        debug!("Calling non-function expression {:?}", declaration);
    }
    let args = args
        .iter()
        .map(OptionValue::to_string)
        .collect::<Vec<_>>()
        .join(",");
    let base = OptionsBuilder::new()
        .insert("expression", format!("({})({})", declaration, args))
        .insert("awaitPromise", true);
    Command::new("Runtime.evaluate", base.merge(options).build())
}
