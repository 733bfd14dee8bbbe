// Copyright 2025 Dotanuki Labs
// SPDX-License-Identifier: MIT

use janitor_core::factory;
use janitor_core::infra::cli;
use tikv_jemallocator::Jemalloc;

#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    cli::troubleshooting::setup_troubleshooting();
    let (task, turnoff_colors) = cli::parsing::parse_arguments()?;

    let janitor = factory::create_janitor(turnoff_colors);
    janitor.execute(task).await?;

    Ok(())
}
