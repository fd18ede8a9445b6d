mod cli;
mod config;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use std::sync::Arc;
use std::time::Instant;
use tpgen_core::{ChatModel, DEFAULT_SECTIONS};
use tpgen_engine::PlanGenerator;
use tpgen_model::OpenAiClient;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate { options, requirements, output, model } => {
            let api = config::Config::from_env()?;
            let opts = config::load_options(&options)?;
            let corpus = config::load_corpus(&requirements)?;

            let client = OpenAiClient::new(api.openai(&model))?;
            let generator = PlanGenerator::new(Arc::new(client) as Arc<dyn ChatModel>);

            let started = Instant::now();
            let plan = generator.generate(&opts, &corpus).await?;
            let markdown = plan.to_markdown();

            match output {
                Some(path) => {
                    std::fs::write(&path, &markdown)?;
                    eprintln!("Wrote {}", path.display());
                }
                None => print!("{markdown}"),
            }
            eprintln!(
                "Generated {} sections, {} words, in {:.1}s",
                plan.sections.len(),
                plan.total_words(),
                started.elapsed().as_secs_f64()
            );
            Ok(())
        }
        Commands::Sections => {
            for name in DEFAULT_SECTIONS {
                println!("{name}");
            }
            Ok(())
        }
    }
}
