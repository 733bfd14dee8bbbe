// Copyright 2025 Dotanuki Labs
// SPDX-License-Identifier: MIT

use crate::domain::models::ReleaseChannel;
use crate::janitor::JanitorTask;
use crate::janitor::scheduler::DEFAULT_CLEANUP_DELAY;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Args, Debug)]
struct CodeCacheArguments {
    /// Code cache folder used by the running application; its siblings are candidates for removal
    pub current_cache_path: PathBuf,

    /// Release channel of the running application, `stable` keeps folders for longer
    #[arg(short, long, env = "JANITOR_CHANNEL", default_value = "stable")]
    pub channel: String,
}

#[derive(Args, Debug)]
struct ScheduleArguments {
    #[command(flatten)]
    pub code_cache: CodeCacheArguments,

    /// Seconds to wait before sweeping
    #[arg(long, default_value_t = DEFAULT_CLEANUP_DELAY.as_secs())]
    pub delay_secs: u64,
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = false)]
struct CliParser {
    #[command(subcommand)]
    pub command: MainCommands,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_colors: bool,
}

#[derive(Subcommand, Debug)]
enum MainCommands {
    /// Schedule a delayed sweep, the way it runs at application startup
    Schedule(ScheduleArguments),
    /// Sweep stale code cache folders right away
    Sweep(CodeCacheArguments),
}

pub fn parse_arguments() -> anyhow::Result<(JanitorTask, bool)> {
    let cli = CliParser::parse();
    Ok((to_task(cli.command), cli.no_colors))
}

fn to_task(command: MainCommands) -> JanitorTask {
    match command {
        MainCommands::Schedule(args) => JanitorTask::ScheduleCleanup {
            current_cache_path: args.code_cache.current_cache_path,
            channel: ReleaseChannel::from(args.code_cache.channel.as_str()),
            delay: Duration::from_secs(args.delay_secs),
        },
        MainCommands::Sweep(args) => JanitorTask::SweepNow {
            current_cache_path: args.current_cache_path,
            channel: ReleaseChannel::from(args.channel.as_str()),
        },
    }
}
