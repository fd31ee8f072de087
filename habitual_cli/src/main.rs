use chrono::{Duration, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use habitual_core::journal::{read_events, recent_events};
use habitual_core::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "habitual")]
#[command(about = "Daily and weekly habit tracker with streaks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Treat this date (YYYY-MM-DD) as today
    #[arg(long, global = true, value_parser = parse_date_arg)]
    today: Option<NaiveDate>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new habit
    Add {
        title: String,

        #[arg(long)]
        description: Option<String>,

        /// daily or weekly
        #[arg(long, default_value = "daily", value_parser = parse_cadence_arg)]
        cadence: Cadence,

        #[arg(long)]
        category: Option<String>,
    },

    /// List habits with their streaks (default)
    List,

    /// Show one habit with its recent history
    Show { id: String },

    /// Edit a habit's fields
    Edit {
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long, value_parser = parse_cadence_arg)]
        cadence: Option<Cadence>,

        #[arg(long)]
        category: Option<String>,
    },

    /// Delete a habit
    Remove { id: String },

    /// Mark a habit as done for a date (defaults to today)
    Mark {
        id: String,

        #[arg(long)]
        date: Option<String>,
    },

    /// Mark a habit as not done for a date (defaults to today)
    Unmark {
        id: String,

        #[arg(long)]
        date: Option<String>,
    },

    /// Show completion rate, streaks and categories
    Stats {
        /// Number of habits in the top streaks table
        #[arg(long)]
        top: Option<usize>,
    },

    /// Show recent mark/unmark events
    Log {
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },

    /// Export all completion records to CSV
    Export { path: PathBuf },
}

fn parse_date_arg(s: &str) -> std::result::Result<NaiveDate, String> {
    parse_date(s).map_err(|e| e.to_string())
}

fn parse_cadence_arg(s: &str) -> std::result::Result<Cadence, String> {
    s.parse::<Cadence>().map_err(|e| e.to_string())
}

/// Resolved locations and clock for one invocation
struct Context {
    store_path: PathBuf,
    journal_path: PathBuf,
    today: NaiveDate,
    config: Config,
}

fn main() -> ExitCode {
    habitual_core::logging::init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    let data_dir = cli
        .data_dir
        .unwrap_or_else(|| config.data.data_dir.clone());
    let today = cli
        .today
        .unwrap_or_else(|| clock::today(config.clock.timezone));

    tracing::debug!("Using data dir {:?}, today is {}", data_dir, today);

    let ctx = Context {
        store_path: data_dir.join("habits.json"),
        journal_path: data_dir.join("journal").join("completions.jsonl"),
        today,
        config,
    };

    match cli.command.unwrap_or(Commands::List) {
        Commands::Add {
            title,
            description,
            cadence,
            category,
        } => cmd_add(
            &ctx,
            HabitDraft {
                title,
                description,
                cadence,
                category,
            },
        ),
        Commands::List => cmd_list(&ctx),
        Commands::Show { id } => cmd_show(&ctx, &id),
        Commands::Edit {
            id,
            title,
            description,
            cadence,
            category,
        } => cmd_edit(
            &ctx,
            &id,
            HabitPatch {
                title,
                description,
                cadence,
                category,
            },
        ),
        Commands::Remove { id } => cmd_remove(&ctx, &id),
        Commands::Mark { id, date } => cmd_mark(&ctx, &id, date, true),
        Commands::Unmark { id, date } => cmd_mark(&ctx, &id, date, false),
        Commands::Stats { top } => cmd_stats(&ctx, top),
        Commands::Log { limit } => cmd_log(&ctx, limit),
        Commands::Export { path } => cmd_export(&ctx, &path),
    }
}

fn cmd_add(ctx: &Context, draft: HabitDraft) -> Result<()> {
    let habit = HabitStore::update(&ctx.store_path, |store| {
        let habit = Habit::new(draft, Utc::now())?;
        store.insert(habit.clone());
        Ok(habit)
    })?;

    tracing::info!("Created habit {}", habit.id);
    println!("✓ Added {} ({})", habit.title, habit.cadence);
    println!("  id: {}", habit.id);
    Ok(())
}

/// Load habits with streaks brought up to date for display
fn load_current(ctx: &Context) -> Result<Vec<Habit>> {
    let mut store = HabitStore::load(&ctx.store_path)?;
    for habit in &mut store.habits {
        habit.recalculate_streaks(ctx.today)?;
    }
    Ok(store.habits)
}

fn cmd_list(ctx: &Context) -> Result<()> {
    let habits = load_current(ctx)?;

    if habits.is_empty() {
        println!("No habits yet. Add one with `habitual add <TITLE>`.");
        return Ok(());
    }

    for habit in &habits {
        let done = if habit.is_completed_on(ctx.today) {
            "✓"
        } else {
            " "
        };
        println!(
            "{} {}  {:<30} {:<7} streak {} (best {}){}",
            done,
            short_id(habit),
            habit.title,
            habit.cadence,
            habit.current_streak,
            habit.longest_streak,
            habit
                .category
                .as_ref()
                .map(|c| format!("  [{}]", c))
                .unwrap_or_default()
        );
    }
    Ok(())
}

fn cmd_show(ctx: &Context, id: &str) -> Result<()> {
    let mut store = HabitStore::load(&ctx.store_path)?;
    let habit = store.get_mut(id)?;
    habit.recalculate_streaks(ctx.today)?;

    println!("{}", habit.title);
    println!("  id:        {}", habit.id);
    println!("  cadence:   {}", habit.cadence);
    if let Some(ref category) = habit.category {
        println!("  category:  {}", category);
    }
    if let Some(ref description) = habit.description {
        println!("  about:     {}", description);
    }
    println!(
        "  streak:    {} {}(s), best {}",
        habit.current_streak,
        habit.period_label(),
        habit.longest_streak
    );
    println!("  created:   {}", habit.created_at.format("%Y-%m-%d"));
    println!();

    match habit.cadence {
        Cadence::Daily => print_daily_grid(habit, ctx.today),
        Cadence::Weekly => print_weekly_grid(habit, ctx.today),
    }
    Ok(())
}

fn print_daily_grid(habit: &Habit, today: NaiveDate) {
    const DAYS: i64 = 14;
    for offset in (0..DAYS).rev() {
        let date = today - Duration::days(offset);
        let mark = if habit.is_completed_on(date) { "■" } else { "·" };
        println!("  {} {}  {}", date.format("%a"), format_date(date), mark);
    }
}

fn print_weekly_grid(habit: &Habit, today: NaiveDate) {
    const WEEKS: usize = 8;
    let done_weeks: Vec<WeekId> = habit
        .completions
        .iter()
        .filter(|c| c.completed)
        .filter_map(|c| parse_date(&c.date).ok())
        .map(WeekId::of)
        .collect();

    let mut weeks = vec![WeekId::of(today)];
    for _ in 1..WEEKS {
        let earlier = weeks[weeks.len() - 1].prev();
        weeks.push(earlier);
    }

    for week in weeks.iter().rev() {
        let mark = if done_weeks.contains(week) { "■" } else { "·" };
        println!("  {} (from {})  {}", week, format_date(week.monday()), mark);
    }
}

fn cmd_edit(ctx: &Context, id: &str, patch: HabitPatch) -> Result<()> {
    if patch.is_empty() {
        println!("Nothing to change.");
        return Ok(());
    }

    let habit = HabitStore::update(&ctx.store_path, |store| {
        let habit = store.get_mut(id)?;
        habit.apply_patch(patch, ctx.today, Utc::now())?;
        Ok(habit.clone())
    })?;

    println!("✓ Updated {}", habit.title);
    Ok(())
}

fn cmd_remove(ctx: &Context, id: &str) -> Result<()> {
    let habit = HabitStore::update(&ctx.store_path, |store| store.remove(id))?;

    tracing::info!("Removed habit {}", habit.id);
    println!("✓ Removed {}", habit.title);
    Ok(())
}

fn cmd_mark(ctx: &Context, id: &str, date: Option<String>, completed: bool) -> Result<()> {
    let date = match date {
        Some(d) => format_date(parse_date(&d)?),
        None => format_date(ctx.today),
    };
    let now = Utc::now();

    // Journal before the store is saved; a failed append leaves the store unchanged.
    let (habit, streaks) = HabitStore::update(&ctx.store_path, |store| {
        let habit = store.get_mut(id)?;
        let streaks = habit.mark_completion(&date, completed, ctx.today, now)?;

        let mut journal = JsonlJournal::new(&ctx.journal_path);
        journal.append(&CompletionEvent {
            habit_id: habit.id,
            date: date.clone(),
            completed,
            recorded_at: now,
        })?;

        Ok((habit.clone(), streaks))
    })?;

    if completed {
        println!("✓ Marked {} done for {}", habit.title, date);
    } else {
        println!("✓ Unmarked {} for {}", habit.title, date);
    }
    println!(
        "  Current streak: {} {}(s) | Longest: {}",
        streaks.current_streak,
        habit.period_label(),
        streaks.longest_streak
    );
    Ok(())
}

fn cmd_stats(ctx: &Context, top: Option<usize>) -> Result<()> {
    let store = HabitStore::load(&ctx.store_path)?;

    if store.habits.is_empty() {
        println!("No statistics available. Add habits to see your statistics.");
        return Ok(());
    }

    let top = top.unwrap_or(ctx.config.stats.top_streaks);
    let stats = summarize(&store.habits, ctx.today, top)?;

    println!(
        "Total habits:     {} ({} daily, {} weekly)",
        stats.total, stats.daily_habits, stats.weekly_habits
    );
    println!(
        "Completion rate:  {}% ({} completions since {})",
        stats.completion_rate,
        stats.completions_this_week,
        format_date(stats.week_start)
    );
    println!("Best streak:      {}", stats.best_streak);
    println!("Active streaks:   {}", stats.active_streaks);

    println!();
    println!("Top streaks:");
    for entry in &stats.top_streaks {
        println!(
            "  {:<30} {:>4} (best {})",
            entry.title, entry.current_streak, entry.longest_streak
        );
    }

    println!();
    println!("Categories:");
    for category in &stats.categories {
        println!("  {:<30} {:>4}", category.name, category.count);
    }
    Ok(())
}

fn cmd_log(ctx: &Context, limit: usize) -> Result<()> {
    let events = recent_events(&ctx.journal_path, limit)?;
    if events.is_empty() {
        println!("No completions logged yet.");
        return Ok(());
    }

    let titles: HashMap<_, _> = HabitStore::load(&ctx.store_path)?
        .habits
        .into_iter()
        .map(|h| (h.id, h.title))
        .collect();

    for event in &events {
        let title = titles
            .get(&event.habit_id)
            .map(String::as_str)
            .unwrap_or("(removed habit)");
        println!(
            "{}  {} {} {}",
            event.recorded_at.format("%Y-%m-%d %H:%M"),
            if event.completed { "✓" } else { "✗" },
            event.date,
            title
        );
    }

    let total = read_events(&ctx.journal_path)?.len();
    if total > events.len() {
        println!("… {} older events", total - events.len());
    }
    Ok(())
}

fn cmd_export(ctx: &Context, path: &Path) -> Result<()> {
    let store = HabitStore::load(&ctx.store_path)?;
    let count = export_completions(&store.habits, path)?;

    println!("✓ Exported {} completion records", count);
    println!("  CSV: {}", path.display());
    Ok(())
}

fn short_id(habit: &Habit) -> String {
    habit.id.to_string()[..8].to_string()
}
