use anyhow::Context;
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tp_renumber::{
    Config, Document, Editor, Position, RenameResponse, RenumberReport, RenumberResponse, Session,
    call_target_at, edit_name_in_directory, find_program, generate_execution_id, read_file, scan,
    watch_file, write_file,
};

/// Line renumbering for Fanuc Teach Pendant program listings
#[derive(Parser, Debug)]
#[command(name = "tp-renumber")]
#[command(version)]
#[command(about = "Keep TP program line numbers and terminators canonical", long_about = None)]
struct Args {
    /// Configuration file (defaults apply when it does not exist)
    #[arg(short, long, global = true, default_value = "tp-renumber.toml")]
    config: PathBuf,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Renumber a program file once, as the manual update command does
    Renumber {
        /// Program file to renumber
        #[arg(short, long)]
        file: PathBuf,

        /// Cursor line (1-indexed); defaults to the first body line
        #[arg(short, long)]
        line: Option<usize>,

        /// Report what would change without writing; exit 1 if anything would
        #[arg(long)]
        check: bool,

        /// Output structured JSON instead of human-readable
        #[arg(short, long)]
        json: bool,

        /// Write the report to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Renumber a program file whenever its line count changes
    Watch {
        /// Program file to watch
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Rename an item in every program file of a directory
    Rename {
        /// Directory holding the program files
        #[arg(short, long)]
        dir: PathBuf,

        /// Exact text of the item to rewrite, e.g. `R[1:COUNT]`
        #[arg(long)]
        item: String,

        /// Name inside the item to replace
        #[arg(long)]
        old_name: String,

        #[arg(long)]
        new_name: String,

        /// Output structured JSON instead of human-readable
        #[arg(short, long)]
        json: bool,
    },

    /// Print the program file a CALL or RUN statement refers to
    Goto {
        #[arg(short, long)]
        file: PathBuf,

        /// Line of the statement (1-indexed)
        #[arg(short, long)]
        line: usize,

        /// Column inside the statement (0-indexed)
        #[arg(long, default_value_t = 0)]
        column: usize,

        /// Workspace root to search; defaults to the file's directory
        #[arg(long)]
        root: Option<PathBuf>,
    },
}

fn setup_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("tp_renumber=debug")
        } else {
            EnvFilter::new("tp_renumber=info")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let args = Args::parse();
    setup_tracing(args.verbose);

    let code = match run(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            1
        }
    };
    std::process::exit(code);
}

fn run(args: Args) -> anyhow::Result<i32> {
    let config = Config::load(&args.config)?;

    match args.command {
        Command::Renumber { file, line, check, json, output } => {
            renumber_command(config, &file, line, check, json, output.as_deref())
        }
        Command::Watch { file } => {
            watch_file(&file, config)?;
            Ok(0)
        }
        Command::Rename { dir, item, old_name, new_name, json } => {
            Ok(rename_command(&dir, &item, &old_name, &new_name, json))
        }
        Command::Goto { file, line, column, root } => goto_command(&file, line, column, root),
    }
}

fn renumber_command(
    config: Config,
    path: &Path,
    line: Option<usize>,
    check: bool,
    json: bool,
    output: Option<&Path>,
) -> anyhow::Result<i32> {
    let execution_id = generate_execution_id();
    let file_label = path.display().to_string();

    let file_content = match read_file(path) {
        Ok(content) => content,
        Err(e) => {
            let response = RenumberResponse::failure(
                execution_id,
                file_label.clone(),
                format!("Failed to read file '{}': {}", file_label, e),
            );
            let text = if json {
                serde_json::to_string_pretty(&response)?
            } else {
                format!("Error: {}", response.error.as_deref().unwrap_or("Unknown error"))
            };
            output_text(&text, output)?;
            return Ok(1);
        }
    };

    let mut session = Session::new(config);
    let document = Document::from_file(file_content);
    scan(&mut session, &document);

    let cursor_line = line.unwrap_or_else(|| {
        session
            .record(&document.file_name())
            .and_then(|record| record.body_start)
            .map_or(1, |start| start + 1)
    });
    let original = document.clone();
    let mut editor = Editor::new(document, Position::new(cursor_line, 0));

    let report = session.update_line_numbers(&mut editor);
    let changed = report.as_ref().is_some_and(|r| !r.edits.is_empty());

    if changed && !check {
        write_file(path, editor.into_document().content())
            .with_context(|| format!("Failed to write '{}'", file_label))?;
    }

    let text = if json {
        let mut response = RenumberResponse::from_report(execution_id, file_label.clone(), report);
        if check {
            response.final_checksum = Some(original.checksum().to_string());
        }
        serde_json::to_string_pretty(&response)?
    } else {
        human_report(&file_label, report.as_ref(), check)
    };
    output_text(&text, output)?;

    Ok(if check && changed { 1 } else { 0 })
}

fn human_report(file: &str, report: Option<&RenumberReport>, check: bool) -> String {
    match report {
        None => format!("Nothing to renumber in {}", file),
        Some(report) if report.edits.is_empty() => format!("{} is already canonical", file),
        Some(report) if check => {
            let mut text = format!("{} line(s) need renumbering in {}", report.edits.len(), file);
            for edit in &report.edits {
                text.push_str(&format!("\n{:>6}: {}", edit.line + 1, edit.replacement));
            }
            text
        }
        Some(report) => format!(
            "Renumbered {} line(s) in {}\nFinal checksum: {}",
            report.edits.len(),
            file,
            report.checksum
        ),
    }
}

fn rename_command(dir: &Path, item: &str, old_name: &str, new_name: &str, json: bool) -> i32 {
    let execution_id = generate_execution_id();
    let response = match edit_name_in_directory(dir, item, old_name, new_name) {
        Ok(report) => RenameResponse::success(execution_id, report),
        Err(e) => RenameResponse::failure(execution_id, e.to_string()),
    };

    let text = if json {
        serde_json::to_string_pretty(&response)
            .unwrap_or_else(|_| r#"{"error": "Failed to serialize response"}"#.to_string())
    } else if response.success {
        let mut text = format!(
            "Renamed {} occurrence(s) in {} of {} file(s)",
            response.report.replacements,
            response.report.files_changed.len(),
            response.report.files_scanned
        );
        for path in &response.report.files_changed {
            text.push_str(&format!("\n  {}", path.display()));
        }
        text
    } else {
        format!("Error: {}", response.error.as_deref().unwrap_or("Unknown error"))
    };
    println!("{}", text);

    if response.success { 0 } else { 1 }
}

fn goto_command(path: &Path, line: usize, column: usize, root: Option<PathBuf>) -> anyhow::Result<i32> {
    let file_content = read_file(path)?;
    let text = file_content
        .content
        .split('\n')
        .nth(line.saturating_sub(1))
        .map(|l| l.trim_end_matches('\r'))
        .unwrap_or("");

    let Some(name) = call_target_at(text, column) else {
        println!("No CALL or RUN statement at {}:{}", line, column);
        return Ok(1);
    };

    let root = root.unwrap_or_else(|| {
        path.parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."))
            .to_path_buf()
    });
    match find_program(&root, &name) {
        Ok(found) => {
            println!("{}", found.display());
            Ok(0)
        }
        Err(e) => {
            println!("Error: {}", e);
            Ok(1)
        }
    }
}

/// Write a report to a file or stdout
fn output_text(text: &str, output_path: Option<&Path>) -> anyhow::Result<()> {
    match output_path {
        Some(path) => fs::write(path, text)
            .with_context(|| format!("Failed to write output to '{}'", path.display()))?,
        None => println!("{}", text),
    }
    Ok(())
}
