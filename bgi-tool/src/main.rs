use std::path::PathBuf;

use anyhow::{bail, Result};
use bgi_nls::Encoding;
use bgi_script::ScriptOptions;
use clap::{Parser as ClapParser, Subcommand};

mod batch;
mod config;

use crate::batch::Job;
use crate::config::ToolConfig;

#[derive(ClapParser, Debug)]
#[command(version, about = "Export and rebuild the text of BGI compiled scripts")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// TOML config; defaults to ./bgi-tool.toml when present
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Encoding of the original string section
    #[arg(long, global = true)]
    source_nls: Option<Encoding>,

    /// Encoding of the rebuilt string section
    #[arg(long, global = true)]
    target_nls: Option<Encoding>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write <file>.txt with the text of each script
    Export {
        /// Also export empty and ASCII-leading strings
        #[arg(short, long)]
        all: bool,
        path: PathBuf,
    },
    /// Apply <file>.txt and write the script to the rebuild folder
    Rebuild { path: PathBuf },
    /// Print sections and string references as YAML
    Info { path: PathBuf },
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut config = ToolConfig::load(args.config.as_deref())?;
    if let Some(nls) = args.source_nls {
        config.source_nls = nls;
    }
    if let Some(nls) = args.target_nls {
        config.target_nls = nls;
    }

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logger.level.to_string()),
    )
    .init();

    let options = ScriptOptions {
        source_nls: config.source_nls,
        target_nls: config.target_nls,
        ..Default::default()
    };

    let (path, job) = match args.command {
        Command::Export { all, path } => (path, Job::Export { all }),
        Command::Rebuild { path } => (path, Job::Rebuild),
        Command::Info { path } => {
            let infos = batch::collect_inputs(&path)?
                .iter()
                .map(|p| batch::inspect(p, &options))
                .collect::<Result<Vec<_>>>()?;
            serde_yaml::to_writer(std::io::stdout().lock(), &infos)?;
            return Ok(());
        }
    };

    let inputs = batch::collect_inputs(&path)?;
    if inputs.is_empty() {
        log::warn!("no scripts found in {}", path.display());
        return Ok(());
    }

    let summary = batch::run(&inputs, job, &options, &config.rebuild_dir);
    if summary.failed > 0 {
        bail!("{} of {} file(s) failed", summary.failed, summary.total);
    }
    Ok(())
}
