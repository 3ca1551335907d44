//! Mock 徽章仓库 CLI
//!
//! 模拟服务的命令行入口点。

use clap::Parser;
use mock_services::cli::{Cli, CommandRunner, Commands};

use badge_shared::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 命令行参数覆盖配置文件中的日志设置；RUST_LOG 仍然优先
    let mut config = AppConfig::load("mock-badge-server")?;
    config.observability.log_level = cli.log_level.clone();
    config.observability.json_logs |= cli.json_logs;
    let _guard = badge_shared::observability::init(&config.service_name, &config.observability).await?;

    let runner = CommandRunner::new();

    match cli.command {
        Commands::Server {
            port,
            seed,
            demo,
            user_count,
        } => {
            runner.run_server(port, seed, demo, user_count).await?;
        }
        Commands::Populate {
            users,
            badges,
            output,
        } => {
            runner.run_populate(users, &badges, output).await?;
        }
    }

    Ok(())
}
