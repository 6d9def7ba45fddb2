use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use colored::*;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tabled::{settings::Style, Table, Tabled};

use fittrack::enhancement::DEFAULT_BPM;
use fittrack::error::describe;
use fittrack::{
    create_exercise, create_nutrition_plan, export_activities, generate_workout, init_logging,
    Activity, ActivityRegistry, AppConfig, DashboardSummary, Database, EquipmentEnhancement,
    Exercise, ExerciseCategory, ExportFormat, FitTrackError, FitnessGoal, GoalRegistry,
    LogLevel, MusicEnhancement, PlanType, StrategyLevel, WorkoutFocus,
};

/// FitTrack - Fitness Tracking CLI
///
/// Log exercises, track goals, and generate nutrition plans and workouts.
#[derive(Parser)]
#[command(name = "fittrack")]
#[command(version)]
#[command(about = "Fitness tracking CLI", long_about = None)]
struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase verbosity of output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log a performed exercise
    Log {
        /// Exercise category (cardio, strength, flexibility)
        category: String,

        /// Exercise name
        name: String,

        /// Duration in minutes
        #[arg(short, long)]
        duration: u32,

        /// Intensity from 1 to 10 (default: 5)
        #[arg(short, long)]
        intensity: Option<u8>,

        /// Equipment used
        #[arg(short, long)]
        equipment: Option<String>,

        /// Equipment load in kg
        #[arg(short, long, requires = "equipment")]
        weight: Option<f64>,

        /// Playlist listened to
        #[arg(short, long)]
        music: Option<String>,

        /// Playlist tempo
        #[arg(long, requires = "music")]
        bpm: Option<u32>,

        /// Free-text notes
        #[arg(short, long, default_value = "")]
        notes: String,
    },

    /// List logged activities
    Activities {
        /// Only show one category
        #[arg(short, long)]
        category: Option<String>,

        /// Number of recent activities to show
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show totals across all activities and goals
    Stats,

    /// Delete every logged activity
    Clear {
        /// Skip the confirmation check
        #[arg(long)]
        yes: bool,
    },

    /// Manage fitness goals
    Goal {
        #[command(subcommand)]
        action: GoalCommands,
    },

    /// Calculate a daily nutrition plan
    Nutrition {
        /// Plan type (weight_loss, muscle_gain, maintenance)
        plan: String,

        /// Body weight in kg (default from config)
        #[arg(long)]
        weight: Option<f64>,

        /// Height in cm (default from config)
        #[arg(long)]
        height: Option<f64>,

        /// Age in years (default from config)
        #[arg(long)]
        age: Option<u32>,

        /// Gender used in the BMR formula (default from config)
        #[arg(long)]
        gender: Option<String>,
    },

    /// Generate a workout
    Workout {
        /// Strategy level (beginner, advanced)
        #[arg(short, long)]
        level: Option<String>,

        /// Focus area (cardio, strength, mixed)
        #[arg(short, long)]
        focus: Option<String>,

        /// Target duration in minutes
        #[arg(short, long)]
        duration: Option<u32>,
    },

    /// Export logged activities
    Export {
        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Export format (csv, json); inferred from the file extension if omitted
        #[arg(short = 'f', long)]
        format: Option<String>,
    },

    /// Show or initialize the configuration
    Config {
        /// Write a default config file if none exists
        #[arg(long)]
        init: bool,
    },
}

#[derive(Subcommand)]
enum GoalCommands {
    /// Add a new goal
    Add {
        /// Goal name
        name: String,

        /// Target value
        #[arg(short, long)]
        target: f64,

        /// Unit of the target (km, kg, sessions...)
        #[arg(short, long)]
        unit: String,

        /// Goal type
        #[arg(short = 'k', long = "kind", default_value = "general")]
        goal_type: String,

        /// Longer description
        #[arg(short, long)]
        description: Option<String>,

        /// Target date (YYYY-MM-DD)
        #[arg(long)]
        by: Option<NaiveDate>,
    },

    /// List goals
    List {
        /// Only goals still in progress
        #[arg(long, conflicts_with = "completed")]
        active: bool,

        /// Only completed goals
        #[arg(long)]
        completed: bool,
    },

    /// Record progress toward a goal
    Progress {
        /// Goal id
        id: i64,

        /// New progress value
        value: f64,
    },

    /// Remove a goal
    Remove {
        /// Goal id
        id: i64,
    },
}

#[derive(Tabled)]
struct ActivityRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Exercise")]
    name: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Minutes")]
    minutes: u32,
    #[tabled(rename = "Calories")]
    calories: String,
    #[tabled(rename = "Notes")]
    notes: String,
}

impl From<&Activity> for ActivityRow {
    fn from(activity: &Activity) -> Self {
        Self {
            id: activity.id().map_or_else(|| "-".to_string(), |id| id.to_string()),
            date: activity.formatted_date(),
            name: activity.name().to_string(),
            category: activity.category().to_string(),
            minutes: activity.duration(),
            calories: format!("{:.0}", activity.calories()),
            notes: activity.notes().to_string(),
        }
    }
}

#[derive(Tabled)]
struct GoalRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Goal")]
    name: String,
    #[tabled(rename = "Type")]
    goal_type: String,
    #[tabled(rename = "Progress")]
    progress: String,
    #[tabled(rename = "%")]
    percent: String,
    #[tabled(rename = "Due")]
    due: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl From<&FitnessGoal> for GoalRow {
    fn from(goal: &FitnessGoal) -> Self {
        Self {
            id: goal.id().map_or_else(|| "-".to_string(), |id| id.to_string()),
            name: goal.name().to_string(),
            goal_type: goal.goal_type().to_string(),
            progress: format!(
                "{:.1}/{:.1} {}",
                goal.current_progress(),
                goal.target_value(),
                goal.unit()
            ),
            percent: format!("{:.0}", goal.progress_percentage()),
            due: goal
                .target_date()
                .map_or_else(String::new, |d| d.format("%Y-%m-%d").to_string()),
            status: if goal.is_completed() {
                "done".to_string()
            } else {
                "active".to_string()
            },
        }
    }
}

#[derive(Tabled)]
struct ExerciseRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Exercise")]
    name: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Minutes")]
    minutes: u32,
    #[tabled(rename = "Intensity")]
    intensity: u8,
    #[tabled(rename = "Calories")]
    calories: String,
}

#[derive(Tabled)]
struct MacroRow {
    #[tabled(rename = "Macro")]
    name: String,
    #[tabled(rename = "Grams")]
    grams: String,
    #[tabled(rename = "kcal")]
    calories: String,
    #[tabled(rename = "Share")]
    percent: String,
}

fn print_table<T: Tabled>(rows: Vec<T>) {
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}", table);
}

fn open_database(path: &Path) -> Result<Database> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create data directory: {}", parent.display()))?;
    }
    Database::open(path).with_context(|| format!("Failed to open database: {}", path.display()))
}

fn activity_registry(config: &AppConfig) -> Result<ActivityRegistry<Database>> {
    Ok(ActivityRegistry::load(open_database(&config.database_path())?))
}

fn goal_registry(config: &AppConfig) -> Result<GoalRegistry<Database>> {
    Ok(GoalRegistry::load(open_database(&config.database_path())?))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err);
            ExitCode::FAILURE
        }
    }
}

/// Log the failure at its severity and show the user-facing message
fn report_error(err: &anyhow::Error) {
    let (severity, message) = describe(err);
    let line = format!("{}: {}", severity.label(), message);

    match severity.to_tracing_level() {
        tracing::Level::ERROR => {
            tracing::error!(error = %format!("{:#}", err), ?severity, "Command failed");
            eprintln!("{}", line.red().bold());
        }
        _ => {
            tracing::warn!(error = %format!("{:#}", err), ?severity, "Command rejected");
            eprintln!("{}", line.yellow());
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(AppConfig::default_config_path);
    let config = AppConfig::load_or_default_from(&config_path);

    let mut log_config = config.logging.clone();
    if cli.verbose > 0 {
        log_config.level = LogLevel::from_verbosity(cli.verbose);
        eprintln!(
            "{}",
            format!("Log level: {}", log_config.level.to_filter()).dimmed()
        );
    }
    init_logging(&log_config)?;

    match cli.command {
        Commands::Log {
            category,
            name,
            duration,
            intensity,
            equipment,
            weight,
            music,
            bpm,
            notes,
        } => {
            let mut exercise: Box<dyn Exercise> =
                create_exercise(&category, &name, duration, intensity)?.boxed();
            if let Some(equipment) = equipment {
                exercise = Box::new(EquipmentEnhancement::with_weight(
                    exercise,
                    equipment,
                    weight.unwrap_or(0.0),
                ));
            }
            if let Some(playlist) = music {
                exercise = Box::new(MusicEnhancement::with_bpm(
                    exercise,
                    playlist,
                    bpm.unwrap_or(DEFAULT_BPM),
                ));
            }

            let registry = activity_registry(&config)?;
            let activity = Activity::with_notes(&*exercise, notes);
            let id = registry.add(activity)?;

            println!("{}", "✓ Activity logged".green().bold());
            println!("  ID: {}", id);
            println!("  {}", exercise.description());
        }

        Commands::Activities { category, limit } => {
            let registry = activity_registry(&config)?;
            let mut activities = match &category {
                Some(tag) => {
                    let category: ExerciseCategory = tag.parse()?;
                    registry.list_by_category(category.as_str())
                }
                None => registry.list(),
            };
            activities.reverse();
            if let Some(limit) = limit {
                activities.truncate(limit);
            }

            if activities.is_empty() {
                println!("{}", "No activities logged yet.".yellow());
            } else {
                print_table(activities.iter().map(ActivityRow::from).collect());
            }
        }

        Commands::Stats => {
            let activities = activity_registry(&config)?;
            let goals = goal_registry(&config)?;
            let summary = DashboardSummary::collect(&activities, &goals)?;

            println!("{}", "FitTrack Dashboard".cyan().bold());
            println!("  Activities:      {}", summary.activity_count);
            println!("  Total calories:  {:.0}", summary.total_calories);
            println!("  Total duration:  {} min", summary.total_duration_minutes);
            println!("  Active goals:    {}", summary.active_goals);
            println!("  Completed goals: {}", summary.completed_goals);

            let recent = activities.recent(5);
            if !recent.is_empty() {
                println!();
                println!("{}", "Recent activities".bold());
                for activity in recent {
                    println!("  {}", activity.summary());
                }
            }
        }

        Commands::Clear { yes } => {
            if !yes {
                bail!("Refusing to delete all activities without --yes");
            }
            let removed = activity_registry(&config)?.clear()?;
            println!("{}", format!("✓ Removed {} activities", removed).green());
        }

        Commands::Goal { action } => {
            let registry = goal_registry(&config)?;
            match action {
                GoalCommands::Add {
                    name,
                    target,
                    unit,
                    goal_type,
                    description,
                    by,
                } => {
                    let mut goal = FitnessGoal::new(name, goal_type, target, unit);
                    if let Some(description) = description {
                        goal = goal.with_description(description);
                    }
                    if let Some(date) = by {
                        goal = goal.with_target_date(date);
                    }
                    let id = registry.add(goal)?;
                    println!("{}", format!("✓ Goal {} added", id).green().bold());
                }
                GoalCommands::List { active, completed } => {
                    let goals = if active {
                        registry.list_active()
                    } else if completed {
                        registry.list_completed()
                    } else {
                        registry.list_all()
                    };

                    if goals.is_empty() {
                        println!("{}", "No goals found.".yellow());
                    } else {
                        print_table(goals.iter().map(GoalRow::from).collect());
                    }
                }
                GoalCommands::Progress { id, value } => {
                    let goal = registry.update_progress(id, value)?;
                    println!("{}", goal.summary());
                    if goal.is_completed() {
                        println!("{}", "✓ Goal completed!".green().bold());
                    }
                }
                GoalCommands::Remove { id } => {
                    let goal = registry.remove(id)?;
                    println!("{}", format!("✓ Removed goal: {}", goal.name()).green());
                }
            }
        }

        Commands::Nutrition {
            plan,
            weight,
            height,
            age,
            gender,
        } => {
            let profile = &config.profile;
            let plan = create_nutrition_plan(
                &plan,
                weight.unwrap_or(profile.weight_kg),
                height.unwrap_or(profile.height_cm),
                age.unwrap_or(profile.age_years),
                gender.as_deref().unwrap_or(&profile.gender),
            )
            .with_context(|| {
                let valid: Vec<_> = PlanType::ALL.iter().map(PlanType::as_str).collect();
                format!("Valid plan types: {}", valid.join(", "))
            })?;

            println!("{}", plan.summary().cyan().bold());
            println!();
            print_table(
                plan.macro_breakdown()
                    .iter()
                    .map(|m| MacroRow {
                        name: m.name.to_string(),
                        grams: format!("{:.0}", m.grams),
                        calories: format!("{:.0}", m.calories),
                        percent: format!("{:.0}%", m.percent),
                    })
                    .collect(),
            );
            println!("{}", plan.description());
        }

        Commands::Workout {
            level,
            focus,
            duration,
        } => {
            let defaults = &config.workout;
            let level = match level {
                Some(tag) => tag.parse::<StrategyLevel>()?,
                None => defaults.default_level,
            };
            let focus = match focus {
                Some(tag) => tag.parse::<WorkoutFocus>()?,
                None => defaults.default_focus,
            };
            let duration = duration.unwrap_or(defaults.default_duration_minutes);

            let strategy = level.strategy();
            let workout = generate_workout(strategy.as_ref(), duration, focus);

            println!("{}", workout.strategy.magenta().bold());
            println!("{}", strategy.description().dimmed());
            println!();

            if workout.exercises.is_empty() {
                println!(
                    "{}",
                    format!("{} minutes is too short for a {} workout.", duration, focus).yellow()
                );
            } else {
                print_table(
                    workout
                        .exercises
                        .iter()
                        .enumerate()
                        .map(|(i, e)| ExerciseRow {
                            index: i + 1,
                            name: e.name().to_string(),
                            category: e.category().to_string(),
                            minutes: e.duration(),
                            intensity: e.intensity(),
                            calories: format!("{:.0}", e.calories()),
                        })
                        .collect(),
                );
                println!(
                    "  {} of {} minutes scheduled, ~{:.0} calories",
                    workout.scheduled_minutes(),
                    workout.requested_minutes,
                    workout.estimated_calories()
                );
            }
        }

        Commands::Export { output, format } => {
            let format = match format {
                Some(tag) => tag.parse::<ExportFormat>().map_err(FitTrackError::from)?,
                None => ExportFormat::from_path(&output).unwrap_or(ExportFormat::Csv),
            };

            let activities = activity_registry(&config)?.list();
            let count =
                export_activities(&activities, format, &output).map_err(FitTrackError::from)?;
            println!(
                "{}",
                format!("✓ Exported {} activities to {}", count, output.display()).green()
            );
        }

        Commands::Config { init } => {
            if init {
                if config_path.exists() {
                    println!("Config already exists: {}", config_path.display());
                } else {
                    let mut config = AppConfig::default();
                    config.save_to_file(&config_path)?;
                    println!(
                        "{}",
                        format!("✓ Wrote {}", config_path.display()).green()
                    );
                }
            } else {
                println!("{}", format!("# {}", config_path.display()).dimmed());
                println!("{}", toml::to_string_pretty(&config)?);
            }
        }
    }

    Ok(())
}
