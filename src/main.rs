use clap::{Parser, Subcommand};
use docweave::{config, output, site};
use std::path::{Path, PathBuf};

fn version_string() -> &'static str {
    let on_tag = env!("DOCWEAVE_ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("DOCWEAVE_GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "docweave")]
#[command(about = "Static documentation site generator")]
#[command(long_about = "\
Static documentation site generator

A docweave.toml in the working directory declares the pages of the site.
Each page takes its content from markdown, HTML or source files, in one of
three shapes:

  content = \"README.md\"              # single: one source, one file
  [pages.content] multi = true         # multi: one file per sub-page,
                                       #   sharing one sidebar
  [pages.content] blocks = [...]       # blocks: one file from fragments

Output layout:

  _docs/
  ├── index.html                       # <page>.html
  ├── guide-install.html               # <page>-<sub>.html (multi pages)
  ├── static/src/lib.rs.html           # source listings (options.source)
  ├── images/                          # [resources] entries
  └── theme/                           # the configured theme

Run 'docweave gen-config' to generate a documented docweave.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Working directory holding docweave.toml
    #[arg(long, default_value = ".", global = true)]
    source: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate the site
    Build {
        /// Output directory (overrides `dest`)
        #[arg(long)]
        output: Option<PathBuf>,
        /// Only build these pages (repeatable, overrides `build_pages`)
        #[arg(long = "page")]
        pages: Vec<String>,
        /// Page template file (overrides `template`)
        #[arg(long)]
        template: Option<PathBuf>,
    },
    /// Validate docweave.toml and list the pages it declares
    Check,
    /// Print a stock docweave.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Build {
            output: out_dir,
            pages,
            template,
        } => {
            let mut site_config = config::load_config(&cli.source)?;
            if let Some(dir) = out_dir {
                site_config.dest = absolute(&dir)?.to_string_lossy().into_owned();
            }
            if let Some(file) = template {
                site_config.template = Some(absolute(&file)?.to_string_lossy().into_owned());
            }
            if !pages.is_empty() {
                site_config.build_pages = pages;
                site_config.validate()?;
            }

            println!("==> Building {}", site_config.dest_dir().display());
            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    output::print_build_event(&event);
                }
            });
            let result = site::build(site_config, Some(tx));
            printer.join().map_err(|_| "output thread panicked")?;
            output::print_build_summary(&result?);
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.join(config::CONFIG_FILE).display());
            let site_config = config::load_config(&cli.source)?;
            output::print_check_output(&site_config);
            println!("==> Config is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Resolve a CLI path against the invocation directory.
fn absolute(path: &Path) -> std::io::Result<PathBuf> {
    Ok(std::env::current_dir()?.join(path))
}
