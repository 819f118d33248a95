use clap::Parser;
use log::error;

use todo_list::cli::Cli;
use todo_list::cmd::*;
use todo_list::config::Config;
use todo_list::db::TaskStore;
use todo_list::logging::init_logging;

fn main() {
    let cli = Cli::parse();
    let config = Config::from_cli(&cli);

    // Completions never touch the task file.
    if let Some(Commands::Completions { shell }) = &cli.command {
        cmd_completions(*shell);
        return;
    }

    let _logger = match init_logging(&config.log_level, &config.log_dir) {
        Ok(handle) => Some(handle),
        Err(e) => {
            eprintln!("Warning: logging disabled: {}", e);
            None
        }
    };

    let mut store = match TaskStore::open(&config.db_path) {
        Ok(store) => store,
        Err(e) => {
            error!(
                "event=store_open module=main status=error path={} error={}",
                config.db_path.display(),
                e
            );
            if e.is_init_failure() {
                eprintln!("Failed to open task store: {}", e);
            } else {
                eprintln!("Failed to create task store: {}", e);
            }
            std::process::exit(1);
        }
    };

    match cli.command.unwrap_or(Commands::Ui) {
        Commands::Ui => cmd_ui(store),
        Commands::Add { title, priority } => cmd_add(&mut store, title, priority),
        Commands::List => cmd_list(&store),
        Commands::Toggle { task } => cmd_toggle(&mut store, &task),
        Commands::Priority { task, level } => cmd_priority(&mut store, &task, level),
        Commands::Comment { task, text } => cmd_comment(&mut store, &task, text),
        Commands::Delete { tasks } => cmd_delete(&mut store, &tasks),
        Commands::Completions { shell } => cmd_completions(shell),
    }
}
