use std::{
    path::{Path, PathBuf},
    str::FromStr,
    sync::Arc,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::io::AsyncReadExt;
use tracing::{Level, debug};

use api::{
    Command,
    css::{GenerateCssReq, OutputMode, ReverseCssReq},
    diff::DiffReq,
    mode::{AddModeReq, ListModesReq, ModeTool, SelectModeReq, SetModeInputReq},
    text::{DedupeReq, GroupReq, ReverseDedupeReq, SortKey, SortReq},
    tokens::ExportTokensReq,
};
use common::{
    Handler, Workbench,
    config::{VKConfig, load_config},
    storage::{JsonFileStore, StateStore},
};

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// config file (varkit.toml is used when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// state file, overriding the config
    #[arg(short, long)]
    state: Option<PathBuf>,

    /// print responses as json
    #[arg(long)]
    json: bool,

    /// more logging (repeatable)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

// for every FILE argument, "-" reads stdin and leaving it out reuses the saved input
#[derive(Subcommand)]
enum Commands {
    /// replace repeated values with the first variable that holds them
    Dedupe {
        #[arg()]
        file: Option<PathBuf>,
    },

    /// resolve deduplicated references back to their values
    #[command(name = "rededupe")]
    ReverseDedupe {
        #[arg()]
        file: Option<PathBuf>,
    },

    /// sort variables by name or value
    Sort {
        #[arg()]
        file: Option<PathBuf>,

        /// field to sort on
        #[arg(short, long, default_value = "key")]
        by: SortKey,
    },

    /// group variables by shared name prefix
    Group {
        #[arg()]
        file: Option<PathBuf>,
    },

    /// compare two versions of a variable file
    Diff {
        #[arg()]
        original: Option<PathBuf>,

        #[arg()]
        modified: Option<PathBuf>,
    },

    /// design token (figma variable) export
    Tokens {
        #[command(subcommand)]
        tokenscmd: TokensCommands,
    },

    /// css custom property generation
    Css {
        #[command(subcommand)]
        csscmd: CssCommands,
    },
}

#[derive(Subcommand)]
enum TokensCommands {
    /// export every mode as a variable collection
    Export,

    /// manage the token modes
    Mode {
        #[command(subcommand)]
        modecmd: ModeCommands,
    },
}

#[derive(Subcommand)]
enum CssCommands {
    /// generate custom properties for every mode
    Generate {
        /// one combined stylesheet or one block per mode
        #[arg(short, long)]
        output: Option<OutputMode>,
    },

    /// turn css back into variables and store them in a mode
    Reverse {
        #[arg(default_value = "-")]
        file: PathBuf,

        /// mode to overwrite (defaults to the selected mode)
        #[arg(short, long)]
        mode: Option<String>,

        /// replace var() references with the referenced value
        #[arg(long)]
        inline_aliases: bool,
    },

    /// manage the css modes
    Mode {
        #[command(subcommand)]
        modecmd: ModeCommands,
    },
}

#[derive(Subcommand)]
enum ModeCommands {
    /// add a mode and select it
    Add {
        #[arg()]
        name: String,
    },

    /// show the modes
    List,

    /// select the mode that receives input
    Select {
        #[arg()]
        id: String,
    },

    /// replace the input of a mode
    Set {
        #[arg(default_value = "-")]
        file: PathBuf,

        /// mode to overwrite (defaults to the selected mode)
        #[arg(short, long)]
        mode: Option<String>,
    },
}

fn log_level(verbose: u8, config: &VKConfig) -> Result<Level> {
    let level = match verbose {
        0 => match &config.log_level {
            Some(level) => Level::from_str(level)
                .map_err(|_| anyhow::Error::msg(format!("invalid log_level {level:?}")))?,
            None => Level::WARN,
        },
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    Ok(level)
}

async fn read_text(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        tokio::io::stdin().read_to_string(&mut text).await?;
        return Ok(text);
    }

    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {path:?}"))
}

async fn read_input(path: &Option<PathBuf>) -> Result<Option<String>> {
    match path {
        Some(path) => Ok(Some(read_text(path).await?)),
        None => Ok(None),
    }
}

// run a command and print either its json response or the rendered text
async fn dispatch<S, C>(
    workbench: &Workbench<S>,
    json: bool,
    req: C,
    render: impl FnOnce(&C::Resp) -> Result<String>,
) -> Result<()>
where
    S: StateStore,
    C: Command,
    Workbench<S>: Handler<C>,
{
    let resp = workbench.run(req).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&resp)?);
    } else {
        let text = render(&resp)?;
        if !text.is_empty() {
            println!("{text}");
        }
    }

    Ok(())
}

async fn mode_command<S: StateStore>(
    workbench: &Workbench<S>,
    json: bool,
    tool: ModeTool,
    cmd: &ModeCommands,
) -> Result<()> {
    match cmd {
        ModeCommands::Add { name } => {
            let req = AddModeReq {
                tool,
                name: name.clone(),
            };
            dispatch(workbench, json, req, |resp| Ok(format!("added {}", resp.mode))).await
        }
        ModeCommands::List => {
            dispatch(workbench, json, ListModesReq { tool }, |resp| {
                Ok(resp
                    .modes
                    .iter()
                    .map(|m| {
                        let marker = if m.id == resp.selected_mode_id { "*" } else { " " };
                        format!("{marker} {}\t{}", m.id, m.name)
                    })
                    .collect::<Vec<_>>()
                    .join("\n"))
            })
            .await
        }
        ModeCommands::Select { id } => {
            let req = SelectModeReq {
                tool,
                mode_id: id.clone(),
            };
            dispatch(workbench, json, req, |resp| Ok(format!("selected {}", resp.mode))).await
        }
        ModeCommands::Set { file, mode } => {
            let req = SetModeInputReq {
                tool,
                mode_id: mode.clone(),
                input: read_text(file).await?,
            };
            dispatch(workbench, json, req, |resp| Ok(format!("updated {}", resp.mode_id))).await
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.clone()).await?;

    tracing_subscriber::fmt()
        .with_max_level(log_level(cli.verbose, &config)?)
        .with_writer(std::io::stderr)
        .init();

    let state_file = cli.state.clone().unwrap_or_else(|| config.state_file.clone());
    debug!("using state file {state_file:?}");

    let workbench = Workbench::new(Arc::clone(&config), JsonFileStore::new(state_file))?;
    let json = cli.json;

    match &cli.command {
        Commands::Dedupe { file } => {
            let req = DedupeReq {
                input: read_input(file).await?,
            };
            dispatch(&workbench, json, req, |resp| {
                eprintln!("Deduplicated {} variables.", resp.duplicates);
                Ok(resp.output.clone())
            })
            .await?
        }
        Commands::ReverseDedupe { file } => {
            let req = ReverseDedupeReq {
                input: read_input(file).await?,
            };
            dispatch(&workbench, json, req, |resp| {
                eprintln!("Reversed deduplicated {} variables.", resp.replacements);
                Ok(resp.output.clone())
            })
            .await?
        }
        Commands::Sort { file, by } => {
            let req = SortReq {
                input: read_input(file).await?,
                by: *by,
            };
            dispatch(&workbench, json, req, |resp| Ok(resp.output.clone())).await?
        }
        Commands::Group { file } => {
            let req = GroupReq {
                input: read_input(file).await?,
            };
            dispatch(&workbench, json, req, |resp| Ok(resp.output.clone())).await?
        }
        Commands::Diff { original, modified } => {
            let req = DiffReq {
                original: read_input(original).await?,
                modified: read_input(modified).await?,
            };
            dispatch(&workbench, json, req, |resp| Ok(resp.unified.clone())).await?
        }
        Commands::Tokens { tokenscmd } => match tokenscmd {
            TokensCommands::Export => {
                dispatch(&workbench, json, ExportTokensReq {}, |resp| {
                    Ok(serde_json::to_string_pretty(&resp.collection)?)
                })
                .await?
            }
            TokensCommands::Mode { modecmd } => {
                mode_command(&workbench, json, ModeTool::Tokens, modecmd).await?
            }
        },
        Commands::Css { csscmd } => match csscmd {
            CssCommands::Generate { output } => {
                let req = GenerateCssReq { output: *output };
                dispatch(&workbench, json, req, |resp| {
                    Ok(resp
                        .outputs
                        .iter()
                        .map(|o| format!("/* {} */\n{}", o.title, o.content))
                        .collect::<Vec<_>>()
                        .join("\n\n"))
                })
                .await?
            }
            CssCommands::Reverse {
                file,
                mode,
                inline_aliases,
            } => {
                let req = ReverseCssReq {
                    css: read_text(file).await?,
                    mode_id: mode.clone(),
                    inline_aliases: *inline_aliases,
                };
                dispatch(&workbench, json, req, |resp| Ok(resp.input.clone())).await?
            }
            CssCommands::Mode { modecmd } => {
                mode_command(&workbench, json, ModeTool::Css, modecmd).await?
            }
        },
    }

    Ok(())
}
