//! Command-line front end
//!
//! Each invocation is one user action. The active workout lives in the
//! store between invocations, so `start`, `add`, `set` and `finish` can be
//! run as separate commands. Exercise and set numbers are 1-based here.

use chrono::{Local, Utc};
use clap::{Parser, Subcommand};

use crate::commands;
use crate::commands::analysis::get_analytics_overview;
use crate::commands::workout as session_cmd;
use crate::db::AppState;
use crate::models::{Theme, WeightUnit, Workout};
use crate::timer::RestTimer;

/// Log workouts, time rests and track strength progress
#[derive(Parser)]
#[command(name = "workout-tracker")]
#[command(about = "Log workouts, time rests and track strength progress", long_about = None)]
pub struct Cli {
  /// Enable verbose output (-v for info, -vv for debug, -vvv for trace)
  #[arg(short, long, action = clap::ArgAction::Count, global = true)]
  pub verbose: u8,

  #[command(subcommand)]
  pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
  /// Browse the exercise library
  Exercises {
    /// Match against exercise name or category
    #[arg(short, long)]
    search: Option<String>,
    /// Only show one category (e.g. "Legs")
    #[arg(short, long)]
    category: Option<String>,
  },
  /// List exercise categories
  Categories,
  /// Start a new workout
  Start {
    /// Workout name (default: "New Workout")
    name: Option<String>,
  },
  /// Add an exercise to the active workout
  Add {
    /// Catalog id, e.g. bench-press
    exercise_id: String,
  },
  /// Set reps and/or weight on a set
  Set {
    exercise: usize,
    set: usize,
    #[arg(short, long)]
    reps: Option<u32>,
    #[arg(short, long)]
    weight: Option<f64>,
  },
  /// Mark a set as completed
  Done { exercise: usize, set: usize },
  /// Add a set, repeating the previous one
  AddSet { exercise: usize },
  /// Remove a set
  RemoveSet { exercise: usize, set: usize },
  /// Show the active workout
  Status,
  /// Finish the active workout and record it
  Finish,
  /// Discard the active workout
  Cancel,
  /// Run a rest countdown (Ctrl-C cancels)
  Rest {
    /// Seconds (default: preference, 90 out of the box)
    seconds: Option<u32>,
  },
  /// Show completed workouts, most recent first
  History,
  /// Show volume trends and personal records
  Analytics {
    /// Show the progress series for one exercise id
    #[arg(short, long)]
    exercise: Option<String>,
  },
  /// View or change preferences
  Prefs {
    #[arg(long)]
    unit: Option<WeightUnit>,
    /// Default rest in seconds
    #[arg(long)]
    rest: Option<u32>,
    #[arg(long)]
    theme: Option<Theme>,
  },
}

pub async fn execute(command: Command, state: &AppState) -> Result<(), String> {
  match command {
    Command::Exercises { search, category } => {
      let exercises = commands::catalog::list_exercises(search, category).await?;
      if exercises.is_empty() {
        println!("No exercises found");
      }
      for e in exercises {
        println!("{:<22} {:<22} {:<10} {}", e.id, e.name, e.category, e.equipment);
      }
    }
    Command::Categories => {
      for category in commands::catalog::get_categories().await? {
        println!("{}", category);
      }
    }
    Command::Start { name } => {
      if session_cmd::start_workout(state, name).await? {
        println!("Workout started");
      } else {
        println!("A workout is already in progress");
      }
    }
    Command::Add { exercise_id } => {
      require_active(session_cmd::add_exercise(state, exercise_id).await?)?;
      print_status(state).await?;
    }
    Command::Set { exercise, set, reps, weight } => {
      if reps.is_none() && weight.is_none() {
        return Err("Nothing to change: pass --reps and/or --weight".to_string());
      }
      let applied =
        session_cmd::update_set(state, to_index(exercise)?, to_index(set)?, reps, weight).await?;
      require_active(applied)?;
      print_status(state).await?;
    }
    Command::Done { exercise, set } => {
      require_active(session_cmd::complete_set(state, to_index(exercise)?, to_index(set)?).await?)?;
      print_status(state).await?;
    }
    Command::AddSet { exercise } => {
      require_active(session_cmd::add_set(state, to_index(exercise)?).await?)?;
      print_status(state).await?;
    }
    Command::RemoveSet { exercise, set } => {
      require_active(session_cmd::remove_set(state, to_index(exercise)?, to_index(set)?).await?)?;
      print_status(state).await?;
    }
    Command::Status => print_status(state).await?,
    Command::Finish => match session_cmd::finish_workout(state).await? {
      Some(finished) => {
        let unit = commands::get_preferences(state).await?.weight_unit;
        println!(
          "Finished \"{}\" in {}: {} {} over {} sets",
          finished.workout.name,
          format_duration(finished.workout.duration_seconds),
          finished.workout.total_volume,
          unit,
          finished.progress.len()
        );
      }
      None => println!("No active workout"),
    },
    Command::Cancel => {
      if session_cmd::cancel_workout(state).await? {
        println!("Workout discarded");
      } else {
        println!("No active workout");
      }
    }
    Command::Rest { seconds } => {
      let seconds = match seconds {
        Some(s) => s,
        None => commands::get_preferences(state).await?.default_rest_time,
      };
      run_rest_timer(seconds).await;
    }
    Command::History => print_history(state).await?,
    Command::Analytics { exercise } => print_analytics(state, exercise).await?,
    Command::Prefs { unit, rest, theme } => {
      let prefs = if unit.is_none() && rest.is_none() && theme.is_none() {
        commands::get_preferences(state).await?
      } else {
        commands::update_preferences(state, unit, rest, theme).await?
      };
      println!("unit:  {}", prefs.weight_unit);
      println!("rest:  {}s", prefs.default_rest_time);
      println!("theme: {}", prefs.theme);
    }
  }
  Ok(())
}

fn to_index(number: usize) -> Result<usize, String> {
  number
    .checked_sub(1)
    .ok_or_else(|| "Exercise and set numbers start at 1".to_string())
}

fn require_active(applied: bool) -> Result<(), String> {
  if applied {
    Ok(())
  } else {
    Err("No active workout; run `start` first".to_string())
  }
}

async fn run_rest_timer(seconds: u32) {
  let mut timer = RestTimer::new();
  let mut rx = timer.subscribe();
  timer.start(seconds);

  loop {
    tokio::select! {
      changed = rx.changed() => {
        if changed.is_err() {
          break;
        }
        let remaining = rx.borrow_and_update().remaining;
        match remaining {
          Some(left) => println!("Rest {}", format_clock(left as i64)),
          None => {
            println!("Rest over");
            break;
          }
        }
      }
      _ = tokio::signal::ctrl_c() => {
        timer.cancel();
        println!("Rest cancelled");
        break;
      }
    }
  }
}

async fn print_status(state: &AppState) -> Result<(), String> {
  let workout = match session_cmd::get_current_workout(state).await? {
    Some(w) => w,
    None => {
      println!("No active workout");
      return Ok(());
    }
  };
  let unit = commands::get_preferences(state).await?.weight_unit;
  let elapsed = (Utc::now() - workout.started_at).num_seconds().max(0);

  println!("{}  [{}]", workout.name, format_clock(elapsed));
  print_exercises(&workout, unit);
  println!(
    "Volume: {} {}  ({} sets done)",
    workout.completed_volume(),
    unit,
    workout.completed_set_count()
  );
  Ok(())
}

fn print_exercises(workout: &Workout, unit: WeightUnit) {
  for (i, exercise) in workout.exercises.iter().enumerate() {
    println!("{}. {}", i + 1, exercise.exercise.name);
    if exercise.sets.is_empty() {
      println!("   (no sets)");
    }
    for (j, set) in exercise.sets.iter().enumerate() {
      let mark = if set.completed { "x" } else { " " };
      println!("   [{}] {}: {} x {} {}", mark, j + 1, set.reps, set.weight, unit);
    }
  }
}

async fn print_history(state: &AppState) -> Result<(), String> {
  let workouts = commands::get_workouts(state).await?;
  if workouts.is_empty() {
    println!("No workouts yet");
    return Ok(());
  }
  let unit = commands::get_preferences(state).await?.weight_unit;
  let stats = commands::get_workout_stats(state).await?;

  println!(
    "{} workouts, {} this week, {} {} total, avg {}",
    stats.total_workouts,
    stats.this_week,
    stats.total_volume,
    unit,
    format_duration(stats.avg_duration_seconds as i64)
  );
  for workout in workouts {
    println!();
    println!(
      "{} - {}",
      workout.name,
      workout.started_at.with_timezone(&Local).format("%A, %B %-d, %Y")
    );
    println!(
      "  {}  {} {}",
      format_duration(workout.duration_seconds),
      workout.total_volume,
      unit
    );
    for exercise in &workout.exercises {
      println!(
        "  {}: {} sets",
        exercise.exercise.name,
        exercise.completed_sets().count()
      );
    }
  }
  Ok(())
}

async fn print_analytics(state: &AppState, exercise: Option<String>) -> Result<(), String> {
  let unit = commands::get_preferences(state).await?.weight_unit;

  if let Some(exercise_id) = exercise {
    let series = commands::analysis::get_exercise_progress(state, exercise_id.clone()).await?;
    if series.is_empty() {
      println!("No data for {}", exercise_id);
    }
    for point in series {
      println!(
        "{}  {} {}  1RM {}  vol {}",
        point.date.with_timezone(&Local).format("%x"),
        point.weight,
        unit,
        point.one_rep_max,
        point.volume
      );
    }
    return Ok(());
  }

  let overview = get_analytics_overview(state).await?;
  if !overview.has_data {
    println!("No workout data yet. Complete some workouts to see your progress");
    return Ok(());
  }

  println!("Volume over time");
  for point in &overview.volume_over_time {
    println!("  {}  {} {}", point.date.format("%x"), point.volume, unit);
  }
  println!("Top exercises");
  for (i, top) in overview.top_exercises.iter().enumerate() {
    println!("  {}. {}  {} {}", i + 1, top.name, top.volume, unit);
  }
  println!("Personal records");
  for pr in &overview.personal_records {
    println!(
      "  {}  {} {} (from {} x {})",
      pr.exercise_name, pr.record.one_rep_max, unit, pr.record.reps, pr.record.weight
    );
  }
  println!("Tracked exercises");
  for tracked in &overview.tracked_exercises {
    println!("  {} ({})", tracked.name, tracked.exercise_id);
  }
  Ok(())
}

/// Countdown/elapsed display, `m:ss`
pub fn format_clock(seconds: i64) -> String {
  let seconds = seconds.max(0);
  format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Workout length, `Xh Ym` or `Ym`
pub fn format_duration(seconds: i64) -> String {
  let mins = seconds.max(0) / 60;
  let hours = mins / 60;
  let remaining_mins = mins % 60;
  if hours > 0 {
    format!("{}h {}m", hours, remaining_mins)
  } else {
    format!("{}m", remaining_mins)
  }
}
