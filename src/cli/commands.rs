use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tm", about = concat!("[*] taskman v", env!("CARGO_PKG_VERSION"), " - your tasks, one JSON file"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run against a different project directory
    #[arg(short = 'C', long = "project-dir", global = true)]
    pub project_dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new taskman project in the current directory
    Init(InitArgs),
    /// Add a new task
    Add(AddArgs),
    /// Edit fields of an existing task
    Edit(EditArgs),
    /// Toggle a task's completion
    Toggle(ToggleArgs),
    /// Permanently delete tasks
    Delete(DeleteArgs),
    /// List tasks, optionally filtered and searched
    List(ListArgs),
    /// Search tasks by substring (title, description, category)
    Search(SearchArgs),
    /// Show task details
    Show(ShowArgs),
    /// Show task statistics
    Stats,
}

// ---------------------------------------------------------------------------
// Init args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct InitArgs {
    /// Project name (default: inferred from directory name)
    #[arg(long)]
    pub name: Option<String>,
    /// Reinitialize even if taskman/ already exists
    #[arg(long)]
    pub force: bool,
}

// ---------------------------------------------------------------------------
// Write command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct AddArgs {
    /// Task title
    pub title: String,
    /// Task description
    #[arg(long, default_value = "")]
    pub desc: String,
    /// Priority (low, medium, high)
    #[arg(long)]
    pub priority: Option<String>,
    /// Due date (YYYY-MM-DD)
    #[arg(long)]
    pub due: Option<String>,
    /// Category (default from config, usually "general")
    #[arg(long)]
    pub category: Option<String>,
}

#[derive(Args)]
pub struct EditArgs {
    /// Task ID
    pub id: String,
    /// New title
    #[arg(long)]
    pub title: Option<String>,
    /// New description
    #[arg(long)]
    pub desc: Option<String>,
    /// New priority (low, medium, high)
    #[arg(long)]
    pub priority: Option<String>,
    /// New due date (YYYY-MM-DD)
    #[arg(long, conflicts_with = "clear_due")]
    pub due: Option<String>,
    /// Remove the due date
    #[arg(long)]
    pub clear_due: bool,
    /// New category
    #[arg(long)]
    pub category: Option<String>,
}

#[derive(Args)]
pub struct ToggleArgs {
    /// Task ID
    pub id: String,
}

#[derive(Args)]
pub struct DeleteArgs {
    /// Task IDs to delete
    #[arg(required = true)]
    pub ids: Vec<String>,
    /// Skip confirmation prompt
    #[arg(long)]
    pub yes: bool,
}

// ---------------------------------------------------------------------------
// Read command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ListArgs {
    /// Status filter (all, completed, pending, overdue)
    #[arg(long, default_value = "all")]
    pub filter: String,
    /// Search term; a non-empty term bypasses the status filter
    #[arg(long, default_value = "")]
    pub search: String,
}

#[derive(Args)]
pub struct SearchArgs {
    /// Substring to search for (case-insensitive)
    pub term: String,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Task ID to show
    pub id: String,
}
