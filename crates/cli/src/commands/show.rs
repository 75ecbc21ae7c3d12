use trolley_core::config::AppConfig;

use crate::commands::{build_runtime, fail, open_cart, CommandResult};

pub fn run(config: &AppConfig) -> CommandResult {
    let runtime = match build_runtime() {
        Ok(runtime) => runtime,
        Err(failure) => return fail("show", failure),
    };

    let result = runtime.block_on(async {
        let cart = open_cart(config).await?;
        Ok(cart.cart().to_vec())
    });

    match result {
        Ok(lines) => CommandResult::snapshot("show", &lines),
        Err(failure) => fail("show", failure),
    }
}
