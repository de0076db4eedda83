use anyhow::Context;
use clap::{Parser, Subcommand};

mod error;
mod input;
mod net;
mod resolve;

pub type Result<T> = anyhow::Result<T>;

use input::{InstanceMetadata, LinkSet, PropertyBag};

#[derive(Parser)]
#[command(name = "silk-render")]
#[command(about = "CF networking configuration renderer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render one job configuration (validates inputs while running).
    Render {
        /// Target document to render.
        #[arg(long, value_enum)]
        job: resolve::Target,

        /// Manifest properties, as one nested JSON object.
        #[arg(long)]
        properties: Option<String>,

        /// Consumed links, as a JSON list.
        #[arg(long)]
        links: Option<String>,

        /// Instance metadata, as a JSON object.
        #[arg(long)]
        instance: Option<String>,

        /// Defaults to the job's designated path under /var/vcap.
        #[arg(short = 'o', long)]
        out: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.cmd {
        Commands::Render {
            job,
            properties,
            links,
            instance,
            out,
        } => {
            // 1) Read the three input structures; an omitted file means an
            // empty input, so declared defaults still apply.
            let properties: PropertyBag = read_input(properties.as_deref(), "properties")?;
            let links: LinkSet = read_input(links.as_deref(), "links")?;
            let instance: InstanceMetadata = read_input(instance.as_deref(), "instance")?;

            // 2) Resolve: gather, validate, compute derived fields.
            let rendered = resolve::resolve(job, &properties, &links, &instance)?;

            // 3) Emit to the designated (or overridden) path.
            let out = out.unwrap_or_else(|| job.output_path().to_string());
            std::fs::write(&out, rendered.to_bytes())
                .with_context(|| format!("write rendered config {}", out))?;
            println!("Wrote {}", out);
        }
    }

    Ok(())
}

fn read_input<T>(path: Option<&str>, what: &str) -> Result<T>
where
    T: Default + serde::de::DeserializeOwned,
{
    let Some(path) = path else {
        return Ok(T::default());
    };
    let text =
        std::fs::read_to_string(path).with_context(|| format!("read {} file {}", what, path))?;
    serde_json::from_str(&text).with_context(|| format!("parse {} file {}", what, path))
}
