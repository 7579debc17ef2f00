use crate::commands::{with_migrated_store, CommandResult};

pub fn run() -> CommandResult {
    match with_migrated_store("migrate", |_pool| async { Ok(()) }) {
        Ok(()) => CommandResult::success("migrate", "applied pending migrations"),
        Err(failure) => failure,
    }
}
