//! `tvhub sources` subcommands
//!
//! Every mutation follows the admin UI's flow: fetch the whole document,
//! change it locally, then post the whole document back. There is no
//! reconciliation with concurrent writers.

use anyhow::{Context, Result, anyhow};
use tracing::info;
use tvhub_core::{AppConfig, Source, SourceDraft, SourceKind, now_millis};

use crate::cli::{SourcesArgs, SourcesCommands};
use crate::client::AdminClient;

/// Field changes requested by `sources edit`
#[derive(Debug, Default)]
pub struct SourceEdits {
    pub name: Option<String>,
    pub url: Option<String>,
    pub kind: Option<SourceKind>,
    pub enabled: Option<bool>,
}

impl SourceEdits {
    /// Overlay the requested changes on an existing draft
    pub fn apply(self, mut draft: SourceDraft) -> SourceDraft {
        if let Some(name) = self.name {
            draft.name = name;
        }
        if let Some(url) = self.url {
            draft.url = url;
        }
        if let Some(kind) = self.kind {
            draft.kind = kind;
        }
        if let Some(enabled) = self.enabled {
            draft.enabled = enabled;
        }
        draft
    }
}

pub async fn run_sources(args: SourcesArgs) -> Result<()> {
    let client = AdminClient::new(&args.server, args.token)?;
    let json = args.json;

    match args.command {
        SourcesCommands::List => {
            let config = fetch(&client).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&config.sources)?);
            } else {
                print!("{}", format_table(&config));
            }
        }
        SourcesCommands::Add {
            name,
            url,
            kind,
            disabled,
        } => {
            let mut config = fetch(&client).await?;
            let draft = SourceDraft::new(name, url)
                .with_kind(kind)
                .with_enabled(!disabled);
            let created = config.add_source(draft, now_millis())?.clone();
            save(&client, &config).await?;
            info!(id = %created.id, "source added");
            print_source(&created, json, "added")?;
        }
        SourcesCommands::Edit {
            id,
            name,
            url,
            kind,
            enabled,
        } => {
            let mut config = fetch(&client).await?;
            let edits = SourceEdits {
                name,
                url,
                kind,
                enabled,
            };
            let updated = edit_source(&mut config, &id, edits, now_millis())?;
            save(&client, &config).await?;
            print_source(&updated, json, "updated")?;
        }
        SourcesCommands::Remove { id } => {
            let mut config = fetch(&client).await?;
            if !config.remove_source(&id) {
                return Err(no_such_source(&id));
            }
            save(&client, &config).await?;
            if json {
                println!("{}", serde_json::json!({ "removed": id }));
            } else {
                println!("removed {}", id);
            }
        }
        SourcesCommands::Toggle { id } => {
            let mut config = fetch(&client).await?;
            let enabled = config.toggle_source(&id).ok_or_else(|| no_such_source(&id))?;
            save(&client, &config).await?;
            if json {
                println!("{}", serde_json::json!({ "id": id, "enabled": enabled }));
            } else {
                println!("{} is now {}", id, status_label(enabled));
            }
        }
        SourcesCommands::Link => {
            let url = client.subscribe_url();
            if json {
                println!("{}", serde_json::json!({ "subscriptionUrl": url }));
            } else {
                println!("{}", url);
            }
        }
    }
    Ok(())
}

async fn fetch(client: &AdminClient) -> Result<AppConfig> {
    client
        .fetch_config()
        .await
        .with_context(|| format!("failed to load sources from {}", client.config_url()))
}

async fn save(client: &AdminClient, config: &AppConfig) -> Result<()> {
    client
        .save_config(config)
        .await
        .with_context(|| format!("failed to save sources to {}", client.config_url()))
}

fn no_such_source(id: &str) -> anyhow::Error {
    anyhow!("no source with id '{}'", id)
}

/// Apply `edits` to source `id`, returning the updated record
pub fn edit_source(
    config: &mut AppConfig,
    id: &str,
    edits: SourceEdits,
    now_ms: i64,
) -> Result<Source> {
    let current = config.source(id).ok_or_else(|| no_such_source(id))?;
    let draft = edits.apply(current.draft());
    let updated = config
        .update_source(id, draft, now_ms)?
        .ok_or_else(|| no_such_source(id))?;
    Ok(updated.clone())
}

fn status_label(enabled: bool) -> &'static str {
    if enabled { "enabled" } else { "disabled" }
}

fn print_source(source: &Source, json: bool, verb: &str) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(source)?);
    } else {
        println!("{} {} ({})", verb, source.id, source.name);
    }
    Ok(())
}

/// Render sources as an aligned text table
pub fn format_table(config: &AppConfig) -> String {
    if config.sources.is_empty() {
        return "no sources\n".to_string();
    }

    let headers = ["ID", "NAME", "TYPE", "STATUS", "URL"];
    let rows: Vec<[String; 5]> = config
        .sources
        .iter()
        .map(|s| {
            [
                s.id.clone(),
                s.name.clone(),
                s.kind.to_string(),
                status_label(s.enabled).to_string(),
                s.url.clone(),
            ]
        })
        .collect();

    let mut widths = headers.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let mut push_row = |cells: [&str; 5]| {
        let line = cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = width))
            .collect::<Vec<_>>()
            .join("  ");
        out.push_str(line.trim_end());
        out.push('\n');
    };
    push_row(headers);
    for row in &rows {
        push_row([
            row[0].as_str(),
            row[1].as_str(),
            row[2].as_str(),
            row[3].as_str(),
            row[4].as_str(),
        ]);
    }
    out
}
