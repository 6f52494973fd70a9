use crate::infra::InMemoryPositionRepository;
use crate::seed::seed_positions;
use clap::Args;
use hiring_ai::config::AppConfig;
use hiring_ai::error::AppError;
use hiring_ai::workflows::positions::listing::{write_csv, ALL_CITIES_LABEL};
use hiring_ai::workflows::positions::{
    CityFilter, GenerationPoll, GenerationSchedule, MockDescriptionGenerator, Platform, Position,
    PositionListEngine, PositionRepository, SortDirection, SortField, SortState,
    WizardController,
};
use std::io::Write;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct ListArgs {
    /// Case-insensitive title search
    #[arg(long)]
    pub(crate) search: Option<String>,
    /// Only show positions in this city
    #[arg(long)]
    pub(crate) city: Option<String>,
    /// Sort field: title, status, candidates, or date
    #[arg(long)]
    pub(crate) sort: Option<SortField>,
    /// Sort direction: asc or desc
    #[arg(long)]
    pub(crate) direction: Option<SortDirection>,
    /// Print the list as CSV instead of a table
    #[arg(long)]
    pub(crate) csv: bool,
}

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Position title entered on the first step
    #[arg(long, default_value = "Cocinero/a")]
    pub(crate) title: String,
    /// Short description used to generate the draft
    #[arg(
        long,
        default_value = "Line cook for a busy Mediterranean restaurant, rotating shifts"
    )]
    pub(crate) prompt: String,
    /// Extra platforms to publish to (orbio is always included)
    #[arg(long = "platform")]
    pub(crate) platforms: Vec<Platform>,
    /// Expand the prompt through the generator before submitting it
    #[arg(long)]
    pub(crate) refine: bool,
    /// Skip the simulated generation delay
    #[arg(long)]
    pub(crate) fast: bool,
}

impl ListArgs {
    fn engine(&self) -> PositionListEngine {
        let sort = match self.sort {
            None => SortState {
                direction: self.direction.unwrap_or(SortState::default().direction),
                ..SortState::default()
            },
            Some(field) => SortState {
                field,
                direction: self.direction.unwrap_or(SortDirection::Asc),
            },
        };
        PositionListEngine {
            search: self.search.clone().unwrap_or_default(),
            city: CityFilter::from_param(self.city.as_deref()),
            sort,
        }
    }
}

pub(crate) fn run_positions_list(args: ListArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let repository = InMemoryPositionRepository::new(config.wizard.default_location)
        .with_positions(seed_positions())?;

    let engine = args.engine();
    let rows = engine.apply(&repository.list()?);

    if args.csv {
        write_csv(&rows, std::io::stdout().lock())?;
        return Ok(());
    }

    println!(
        "Positions ({} shown | city: {} | sort: {} {})",
        rows.len(),
        engine.city.label(),
        engine.sort.field.key(),
        engine.sort.direction
    );
    render_positions(&rows);
    Ok(())
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        title,
        prompt,
        platforms,
        refine,
        fast,
    } = args;

    let config = AppConfig::load()?;
    let repository = Arc::new(
        InMemoryPositionRepository::new(config.wizard.default_location.clone())
            .with_positions(seed_positions())?,
    );
    let mut wizard = WizardController::new(
        Arc::clone(&repository),
        Arc::new(MockDescriptionGenerator::new()),
        &config.wizard,
    );
    let schedule = if fast {
        GenerationSchedule::immediate()
    } else {
        GenerationSchedule::from_config(&config.wizard)
    };
    wizard = wizard.with_schedule(schedule);

    println!("Position wizard demo");
    println!("Step 1 ({}): \"{}\"", wizard.step(), title);
    if refine {
        wizard.edit_prompt(&title, &prompt)?;
        wizard.refine_prompt().await?;
        println!(
            "- Prompt refined to {} characters",
            wizard.draft().prompt().chars().count()
        );
        let refined = wizard.draft().prompt().to_string();
        wizard.submit_prompt(&title, &refined)?;
    } else {
        wizard.submit_prompt(&title, &prompt)?;
    }

    print!("Step 2 ({}):", wizard.step());
    loop {
        match wizard.poll_generation()? {
            GenerationPoll::Pending { progress } => {
                print!(" {progress}%");
                std::io::stdout().flush()?;
                tokio::time::sleep(schedule.tick.max(std::time::Duration::from_millis(10))).await;
            }
            GenerationPoll::Ready => break,
        }
    }
    println!(" done");

    let draft = wizard.draft();
    println!("Step 3 ({}): generated description", wizard.step());
    for line in draft.description().lines().take(4) {
        println!("  {line}");
    }
    println!("  Requirements:");
    for requirement in draft.requirements() {
        println!("    - {requirement}");
    }

    // Drop the last requirement to show tombstones being filtered on finalize.
    if let Some(last) = draft.requirements().len().checked_sub(1) {
        wizard.draft_mut().delete_requirement(last);
        println!("  (removed requirement #{})", last + 1);
    }
    wizard.continue_to_criteria()?;

    println!("Step 4 ({}): evaluation criteria", wizard.step());
    for criterion in wizard.draft().live_criteria() {
        println!(
            "    - {:<24} {:>3}%  {}",
            criterion.name, criterion.weight, criterion.description
        );
    }
    println!(
        "    weight total: {}%",
        wizard.draft().criteria_weight_total()
    );
    wizard.continue_to_killer_criteria()?;

    println!("Step 5 ({}): killer questions", wizard.step());
    for criterion in wizard.draft().live_killer_criteria() {
        let marker = killer_marker(criterion.required);
        println!("    - {} ({marker})", criterion.question);
    }
    wizard.continue_to_publish()?;

    for platform in platforms {
        wizard.toggle_platform(platform);
    }
    let selected: Vec<&str> = wizard
        .publish_selector()
        .selected()
        .iter()
        .map(|platform| platform.label())
        .collect();
    println!("Step 6 ({}): publishing to {}", wizard.step(), selected.join(", "));

    let position = wizard.finalize_selected()?;
    println!(
        "\nCommitted position {} on {} ({} | {})",
        position.id, position.date, position.location, position.contract_type
    );

    let engine = PositionListEngine::new();
    let rows = engine.apply(&repository.list()?);
    println!(
        "\nPositions list ({}, newest first):",
        ALL_CITIES_LABEL.to_lowercase()
    );
    render_positions(&rows);
    Ok(())
}

fn killer_marker(required: bool) -> &'static str {
    if required {
        "required"
    } else {
        "recommended"
    }
}

fn render_positions(rows: &[Position]) {
    for position in rows {
        println!(
            "  {:<14} {:<48} {:<10} {:<8} {:>4} candidates",
            position.date,
            truncate(&position.title, 48),
            position.location,
            position.status.label(),
            position.candidate_count
        );
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}
