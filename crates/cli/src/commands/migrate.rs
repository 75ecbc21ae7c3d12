use trolley_core::config::AppConfig;
use trolley_db::{connect, migrations};

use crate::commands::{build_runtime, fail, CommandResult};

pub fn run(config: &AppConfig) -> CommandResult {
    let runtime = match build_runtime() {
        Ok(runtime) => runtime,
        Err(failure) => return fail("migrate", failure),
    };

    let result = runtime.block_on(async {
        let pool = connect(&config.database.url)
            .await
            .map_err(|error| ("db_connectivity", error.to_string(), 4u8))?;
        migrations::run_pending(&pool)
            .await
            .map_err(|error| ("migration", error.to_string(), 5u8))?;
        pool.close().await;
        Ok::<(), (&'static str, String, u8)>(())
    });

    match result {
        Ok(()) => CommandResult::success("migrate", "applied pending migrations"),
        Err(failure) => fail("migrate", failure),
    }
}
