//! Flag lifecycle hooks.
//!
//! A hook belongs to a flag definition and runs synchronously as soon as the
//! parser has finalized that flag's value, before the next argument is
//! looked at. Hooks see the parse-time [`Context`] and may rebind
//! capabilities in it; whatever they bind is what the selected command later
//! resolves.

use log::debug;

use crate::command_definitions::{FlagDef, Value};
use crate::context::Context;
use crate::error::Result;

pub type Hook = Box<dyn Fn(&mut Context, &Value) -> Result<()> + Send + Sync>;

/// Runs the hook of `flag`, if it declares one.
///
/// # Errors
///
/// Returns the hook's own error, untouched, so parsing can abort with it.
pub fn run_hook(flag: &FlagDef, context: &mut Context, value: &Value) -> Result<()> {
    let Some(hook) = flag.hook.as_ref() else {
        return Ok(());
    };

    debug!("Running hook for flag `--{}` with value `{}`", flag.name, value);
    hook(context, value)
}
