use clap::Parser;
use site_pulse::config::resolve_now;
use site_pulse::core::report::DashboardReport;
use site_pulse::utils::error::DashboardError;
use site_pulse::utils::{logger, validation::Validate};
use site_pulse::{app, CliConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 載入配置（配置檔 + 命令列覆蓋）
    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    // 初始化日誌
    if cli.log_json || config.json_logs() {
        logger::init_json_logger(config.log_level(), cli.verbose);
    } else {
        logger::init_cli_logger(config.log_level(), cli.verbose);
    }

    tracing::info!("Starting site-pulse");

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let now = match resolve_now(cli.now.as_deref()) {
        Ok(now) => now,
        Err(e) => exit_with(e),
    };

    if cli.dry_run {
        tracing::info!("🔍 DRY RUN MODE - no files will be written");
        match app::preview(&config, now).await {
            Ok(report) => print_summary(&report),
            Err(e) => exit_with(e),
        }
        return Ok(());
    }

    match app::run_with_config(&config, now).await {
        Ok(written) => {
            tracing::info!("✅ Dashboard report completed successfully!");
            println!("✅ Dashboard report completed successfully!");
            for path in written {
                println!("📁 Output saved to: {}", path);
            }
        }
        Err(e) => exit_with(e),
    }

    Ok(())
}

fn exit_with(e: DashboardError) -> ! {
    tracing::error!(
        "❌ Dashboard run failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 建議: {}", e.recovery_suggestion());

    std::process::exit(e.severity().exit_code());
}

fn print_summary(report: &DashboardReport) {
    let portfolio = &report.portfolio;

    println!("📋 Portfolio Summary ({})", report.generated_at.format("%Y-%m-%d %H:%M UTC"));
    println!(
        "  Active Projects: {} of {}",
        portfolio.active_count, portfolio.total_count
    );
    println!(
        "  Budget: ${:.2} (${:.2} spent, {}% utilized)",
        portfolio.total_budget, portfolio.total_actual_cost, portfolio.utilization_percent
    );
    println!("  Overdue Milestones: {}", report.overdue_milestones);

    if !report.upcoming_milestones.is_empty() {
        println!();
        println!("⏰ Upcoming Milestones:");
        for milestone in &report.upcoming_milestones {
            let due = milestone
                .due_date
                .map(|d| d.format("%b %d, %Y").to_string())
                .unwrap_or_else(|| "no due date".to_string());
            println!("  {} [{}] due {}", milestone.title, milestone.status_label, due);
        }
    }

    if !report.projects.is_empty() {
        println!();
        println!("🏗️ Projects:");
        for project in &report.projects {
            println!(
                "  {} [{}] progress {}%, budget {}% used, {} open tasks",
                project.name,
                project.status,
                project.progress_percent,
                project.utilization_percent,
                project.tasks.total_count - project.tasks.completed_count
            );
        }
    }

    if report.issue_count > 0 {
        println!();
        println!("⚠️ {} data issues found; see the warnings above", report.issue_count);
    }
}
