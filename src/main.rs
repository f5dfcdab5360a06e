use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use milestone_tracker::api::BackendClient;
use milestone_tracker::config::Config;
use milestone_tracker::display::{
    format_local_date_time, local_datetime_input_to_utc, utc_to_local_datetime_input,
};
use milestone_tracker::export;
use milestone_tracker::models::{Deadline, DeadlineType, NewDeadline};
use milestone_tracker::parser;
use milestone_tracker::tracker::{self, MilestoneRow, Perspective, StatusSummary};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "milestone-tracker")]
#[command(about = "Track team submission status against cohort deadlines")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List deadlines for a cohort
    Deadlines {
        #[arg(long)]
        cohort_year: Option<i32>,
    },
    /// Show every team's submission status for a deadline
    Status {
        #[arg(long)]
        deadline: u64,
        /// Include drafts (a team viewing its own submission)
        #[arg(long)]
        own: bool,
    },
    /// Export the submission overview for a deadline to CSV
    Export {
        #[arg(long)]
        deadline: u64,
        #[arg(long, default_value = ".")]
        out: PathBuf,
        #[arg(long)]
        own: bool,
    },
    /// Show the overview from a saved JSON/YAML snapshot, without the backend
    Offline {
        #[arg(long)]
        file: PathBuf,
        #[arg(long)]
        own: bool,
        /// Also write a CSV into this directory
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Create a deadline
    AddDeadline {
        #[arg(long)]
        name: String,
        /// Local due time as YYYY-MM-DDTHH:MM (defaults to today 23:59)
        #[arg(long)]
        due: Option<String>,
        #[arg(long = "type", default_value = "MILESTONE")]
        deadline_type: DeadlineType,
        #[arg(long)]
        cohort_year: Option<i32>,
    },
}

fn perspective(own: bool) -> Perspective {
    if own {
        Perspective::Own
    } else {
        Perspective::OtherTeams
    }
}

fn print_overview(deadline: &Deadline, rows: &[MilestoneRow]) {
    println!(
        "{} [{}] due {}",
        deadline.name,
        deadline.deadline_type,
        format_local_date_time(deadline.due_by)
    );
    println!();

    for row in rows {
        let students = if row.students.is_empty() {
            "-".to_string()
        } else {
            row.students.join(", ")
        };
        let view = match (row.view_enabled, row.submission_id) {
            (true, Some(id)) => format!("view #{}", id),
            _ => "-".to_string(),
        };
        println!(
            "{} {:<24} {:<12} {:<32} {:<16} {:<16} {:<40} {}",
            row.tone().marker(),
            row.team_name,
            row.achievement.as_deref().unwrap_or("-"),
            students,
            row.adviser.as_deref().unwrap_or("-"),
            row.mentor.as_deref().unwrap_or("-"),
            row.status_text,
            view
        );
    }

    let summary = StatusSummary::calculate(rows);
    println!();
    println!("Teams: {}", summary.total_teams);
    for (status, count) in &summary.counts {
        println!("  {:<16} {}", status, count);
    }
    println!("  {:<16} {}", "ERRORS", summary.errors);
    println!("On-time rate: {:.2}%", summary.on_time_rate);
}

fn connect() -> Result<(Config, BackendClient)> {
    let config = Config::load().context("Failed to load configuration")?;
    let client = BackendClient::from_config(&config)?;
    Ok((config, client))
}

async fn run(command: Command) -> Result<()> {
    match command {
        Command::Deadlines { cohort_year } => {
            let (config, client) = connect()?;
            let deadlines = client
                .list_deadlines(cohort_year.or(config.cohort_year))
                .await?;
            for deadline in deadlines {
                println!(
                    "{:>6}  {:<12} {:<40} {}",
                    deadline.id,
                    deadline.deadline_type,
                    deadline.name,
                    format_local_date_time(deadline.due_by)
                );
            }
        }
        Command::Status { deadline, own } => {
            let (_, client) = connect()?;
            let (deadline, rows) =
                tracker::fetch_milestone_rows(&client, deadline, perspective(own)).await?;
            print_overview(&deadline, &rows);
        }
        Command::Export { deadline, out, own } => {
            let (_, client) = connect()?;
            let (deadline, rows) =
                tracker::fetch_milestone_rows(&client, deadline, perspective(own)).await?;
            let path = export::export_to_csv(&rows, &deadline, &out)?;
            println!("Wrote {}", path.display());
        }
        Command::Offline { file, own, csv } => {
            let snapshot = parser::load_snapshot(&file)?;
            let rows =
                tracker::build_rows(&snapshot.deadline, &snapshot.submissions, perspective(own));
            print_overview(&snapshot.deadline, &rows);
            if let Some(dir) = csv {
                let path = export::export_to_csv(&rows, &snapshot.deadline, &dir)?;
                println!("Wrote {}", path.display());
            }
        }
        Command::AddDeadline {
            name,
            due,
            deadline_type,
            cohort_year,
        } => {
            let (config, client) = connect()?;
            let cohort_year = cohort_year
                .or(config.cohort_year)
                .context("No cohort year given. Pass --cohort-year or set TRACKER_COHORT_YEAR")?;

            let mut new_deadline = NewDeadline::milestone_due_today(name, cohort_year);
            new_deadline.deadline_type = deadline_type;
            if let Some(due) = due {
                new_deadline.due_by = local_datetime_input_to_utc(&due)?;
            }

            let created = client.create_deadline(&new_deadline).await?;
            println!(
                "You have successfully created a new deadline {} (id {}, due {})",
                created.name,
                created.id,
                utc_to_local_datetime_input(created.due_by)
            );
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("milestone_tracker=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    run(args.command).await
}
