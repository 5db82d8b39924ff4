use clap::{Parser, Subcommand, ValueEnum};
use page_assembler::config::{self, AppConfig};
use page_assembler::dialogs::PresetDialogs;
use page_assembler::export::{DEFAULT_EXPORT_NAME, PdfWriter};
use page_assembler::imaging::RustBackend;
use page_assembler::output;
use page_assembler::session::{Intent, Outcome, Session, SessionError};
use std::path::{Path, PathBuf};

type CliSession = Session<RustBackend, PdfWriter>;

#[derive(Parser)]
#[command(name = "page-assembler")]
#[command(about = "Assemble a folder of images into a printable PDF")]
#[command(long_about = "\
Assemble a folder of images into a printable PDF

Pick images from a folder, put them in order, add blank pages where needed,
and export one page per image on a canvas of fixed size with margins.

Each folder remembers its canvas and selection in a hidden settings file:

  photos/
  ├── IMG_0001.jpg
  ├── IMG_0002.png
  ├── .assembler_settings      # canvas (6 lines) + selected file names in order
  └── .assembler_thumbs/       # cached gallery thumbnails

Typical session:

  page-assembler select photos IMG_0002.png IMG_0001.jpg
  page-assembler add-blank photos
  page-assembler move photos 3 up
  page-assembler remove photos 2
  page-assembler layout photos
  page-assembler export photos --output book.pdf

Run 'page-assembler gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Application config file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum MoveDirection {
    Up,
    Down,
}

#[derive(Subcommand)]
enum Command {
    /// List the images, current selection, and canvas of a folder
    Scan { folder: PathBuf },
    /// Generate or load every gallery thumbnail
    Thumbnails { folder: PathBuf },
    /// Toggle selection of images, in the order given
    Select {
        folder: PathBuf,
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Append a blank page to the end of the selection
    AddBlank { folder: PathBuf },
    /// Remove a page from the selection, blank pages included (positions start at 1)
    Remove { folder: PathBuf, position: usize },
    /// Move a selected page one step up or down (positions start at 1)
    Move {
        folder: PathBuf,
        position: usize,
        direction: MoveDirection,
    },
    /// Show where every page of the selection will be placed
    Layout {
        folder: PathBuf,
        /// Print the layout as JSON
        #[arg(long)]
        json: bool,
    },
    /// Write the selection as a PDF
    Export {
        folder: PathBuf,
        /// Output file (defaults to output.pdf inside the folder)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let app_config = config::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Command::Scan { folder } => {
            let session = open_session(&folder, app_config)?;
            output::print_scan_output(
                session.folder(),
                &session.tiles(),
                &session.selection_tiles(),
                session.canvas(),
            );
        }
        Command::Thumbnails { folder } => {
            let mut session = open_session(&folder, app_config)?;
            session.load_all_thumbnails();
            output::print_thumbnail_output(&session.tiles(), &session.thumbnail_stats());
        }
        Command::Select { folder, names } => {
            let mut session = open_session(&folder, app_config)?;
            for name in &names {
                let id = session
                    .store()
                    .find_by_file_name(name)
                    .ok_or_else(|| format!("No image named {name} in {}", folder.display()))?;
                session.apply(Intent::ClickTile {
                    index: id.index(),
                    modifier: true,
                })?;
            }
            output::print_selection_output(&session.selection_tiles());
            session.close()?;
        }
        Command::AddBlank { folder } => {
            let mut session = open_session(&folder, app_config)?;
            session.apply(Intent::OpenReorder)?;
            session.apply(Intent::AddBlankPage)?;
            output::print_selection_output(&session.selection_tiles());
            session.close()?;
        }
        Command::Remove { folder, position } => {
            let index = page_index(position)?;
            let mut session = open_session(&folder, app_config)?;
            session.apply(Intent::OpenReorder)?;
            session.apply(Intent::Remove(index))?;
            output::print_selection_output(&session.selection_tiles());
            session.close()?;
        }
        Command::Move {
            folder,
            position,
            direction,
        } => {
            let index = page_index(position)?;
            let mut session = open_session(&folder, app_config)?;
            session.apply(Intent::OpenReorder)?;
            let intent = match direction {
                MoveDirection::Up => Intent::MoveUp(index),
                MoveDirection::Down => Intent::MoveDown(index),
            };
            session.apply(intent)?;
            output::print_selection_output(&session.selection_tiles());
            session.close()?;
        }
        Command::Layout { folder, json } => {
            let session = open_session(&folder, app_config)?;
            let rows = session.layout();
            if json {
                println!("{}", output::format_layout_json(&rows)?);
            } else {
                output::print_layout_output(&rows, session.canvas());
            }
        }
        Command::Export {
            folder,
            output: target,
        } => {
            let target = target.unwrap_or_else(|| folder.join(DEFAULT_EXPORT_NAME));
            let mut session = open_session(&folder, app_config)?;
            session.apply(Intent::OpenReorder)?;
            let dialogs = PresetDialogs::saving_to(target);
            if let Outcome::Exported(summary) = session.apply(Intent::choose_export(&dialogs))? {
                output::print_export_output(&summary);
            }
            session.close()?;
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Convert a 1-based page position from the command line.
fn page_index(position: usize) -> Result<usize, &'static str> {
    position.checked_sub(1).ok_or("Positions start at 1")
}

fn open_session(folder: &Path, app_config: AppConfig) -> Result<CliSession, SessionError> {
    Session::open(folder, app_config, RustBackend::new(), PdfWriter::new())
}
