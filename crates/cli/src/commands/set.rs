use trolley_core::config::AppConfig;
use trolley_core::ProductId;

use crate::commands::{build_runtime, fail, open_cart, CommandResult};

pub fn run(config: &AppConfig, product_id: i64, amount: u32) -> CommandResult {
    let runtime = match build_runtime() {
        Ok(runtime) => runtime,
        Err(failure) => return fail("set", failure),
    };

    let result = runtime.block_on(async {
        let mut cart = open_cart(config).await?;
        Ok(cart.update_amount(ProductId(product_id), amount).await)
    });

    match result {
        Ok(lines) => CommandResult::snapshot("set", &lines),
        Err(failure) => fail("set", failure),
    }
}
