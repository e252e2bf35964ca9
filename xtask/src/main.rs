//! Build automation tasks
//!
//! `cargo xtask generate-cli-docs` renders the extractor's command-line
//! reference from its clap definitions.

use clap::Parser;
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Build automation tasks for biblio-extract", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Generate the CLI reference as Markdown
    GenerateCliDocs {
        /// Output directory for generated documentation
        #[arg(short, long, default_value = "docs")]
        output_dir: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::GenerateCliDocs { output_dir } => generate_cli_docs(&output_dir)?,
    }

    Ok(())
}

fn generate_cli_docs(output_dir: &str) -> anyhow::Result<()> {
    println!("Generating CLI documentation...");

    let markdown = clap_markdown::help_markdown::<biblio_extract::Cli>();

    let content = format!(
        r#"# biblio-extract CLI Reference

Generated from the CLI source code on {}.

## Overview

`biblio-extract` downloads every work a journal published between two dates
from the OpenAlex works API, along with the works those papers cite and the
works citing them, and writes nine normalized CSV tables.

## Quick Start

```bash
biblio-extract \
  --issn 0028-0836 \
  --from 2020-01-01 \
  --to 2020-12-31 \
  --email you@example.org \
  --output ./data
```

The same settings can be given as `ISSN`, `FROM`, `TO`, `EMAIL` and
`OUTPUT_DIR`, either in the environment or in a `.env` file.

## Commands

{}

## Output Tables

| File | Key |
|------|-----|
| `works.csv` | `id` |
| `authors.csv` | `id` |
| `institutions.csv` | `id` |
| `works_authors.csv` | `work_id`, `author_id` |
| `works_authors_institutions.csv` | `work_id`, `author_id`, `institution_id` |
| `topics.csv` | `work_id`, `topic` |
| `yearly_citations.csv` | `work_id`, `year` |
| `referenced_works.csv` | `reference_id`, `referenced_by` |
| `citing_works.csv` | `reference_id`, `referenced_by` |

Tables are replaced only after a run has fetched everything successfully.

## Logging

- `RUST_LOG` / `BIBLIO_LOG_LEVEL` - log level (`debug`, `info`, `warn`, `error`)
- `BIBLIO_LOG_OUTPUT` - `console`, `file` or `both`
- `BIBLIO_LOG_FORMAT` - `text` or `json`
- `BIBLIO_LOG_DIR` - directory for daily log files

---

*To update, run `cargo xtask generate-cli-docs`.*
"#,
        chrono::Utc::now().format("%Y-%m-%d"),
        markdown
    );

    let output_path = PathBuf::from(output_dir);
    fs::create_dir_all(&output_path)?;

    let file_path = output_path.join("cli-reference.md");
    fs::write(&file_path, content)?;

    println!("Generated CLI documentation at: {}", file_path.display());

    Ok(())
}
