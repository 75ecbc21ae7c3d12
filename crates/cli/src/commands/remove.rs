use trolley_core::config::AppConfig;
use trolley_core::ProductId;

use crate::commands::{build_runtime, fail, open_cart, CommandResult};

pub fn run(config: &AppConfig, product_id: i64) -> CommandResult {
    let runtime = match build_runtime() {
        Ok(runtime) => runtime,
        Err(failure) => return fail("remove", failure),
    };

    let result = runtime.block_on(async {
        let mut cart = open_cart(config).await?;
        Ok(cart.remove_product(ProductId(product_id)).await)
    });

    match result {
        Ok(lines) => CommandResult::snapshot("remove", &lines),
        Err(failure) => fail("remove", failure),
    }
}
