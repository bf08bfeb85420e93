//! Command dispatch

use std::io;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::generate;
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::application::services::RoadMapService;
use crate::application::ApplicationError;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, Settings};
use crate::domain::{codec, DomainError, Topic, TopicPatch, TreeNodeConvert};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Ok(());
    };

    // Commands that need no services
    match command {
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            return Ok(());
        }
        Commands::Config { command } => return cmd_config(command, load_settings(cli)?),
        _ => {}
    }

    let container =
        ServiceContainer::new(load_settings(cli)?).map_err(ApplicationError::from)?;
    let service = container.roadmap_service();

    match command {
        Commands::New {
            name,
            id,
            description,
        } => cmd_new(&service, name, id.as_deref(), description.clone()),
        Commands::Add {
            map,
            parent,
            id,
            name,
            description,
        } => {
            let topic = service.add_topic(map, parent, Topic::new(id, name, description.clone()))?;
            output::success(&format!("added {}", topic));
            Ok(())
        }
        Commands::Rm { map, id } => {
            let removed = service.remove_topic(map, id)?;
            output::success(&format!(
                "removed {} ({} topics)",
                removed.root_ref().topic(),
                removed.node_count()
            ));
            Ok(())
        }
        Commands::Edit {
            map,
            id,
            name,
            description,
        } => {
            let patch = TopicPatch {
                name: name.clone(),
                description: description.clone(),
            };
            if patch.is_empty() {
                return Err(CliError::InvalidArgs(
                    "nothing to change: pass --name or --description".into(),
                ));
            }
            let topic = service.edit_topic(map, id, &patch)?;
            output::success(&format!("updated {}", topic));
            Ok(())
        }
        Commands::Show { map, topic } => cmd_show(&service, map, topic.as_deref()),
        Commands::Layers { map } => cmd_layers(&service, map),
        Commands::Keys { map } => {
            for key in service.open(map)?.keys() {
                output::info(&key);
            }
            Ok(())
        }
        Commands::Export { map, output: path } => cmd_export(&service, map, path.as_deref()),
        Commands::Import { file, name } => {
            let map = service.import(file, name.as_deref())?;
            output::action("Imported", &format!("{} ({})", map.name(), map.id()));
            Ok(())
        }
        Commands::List => cmd_list(&service),
        Commands::Delete { map } => {
            if service.delete_map(map)? {
                output::success(&format!("deleted roadmap {}", map));
            } else {
                output::warning(&format!("no roadmap with id {}", map));
            }
            Ok(())
        }
        Commands::Feeds { map } => cmd_feeds(&service, map),
        Commands::Completion { .. } | Commands::Config { .. } => Ok(()),
    }
}

fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let mut settings = Settings::load()?;
    if let Some(dir) = &cli.data_dir {
        settings.set_data_dir(dir);
    }
    debug!("data_dir: {}", settings.data_dir.display());
    Ok(settings)
}

fn cmd_config(command: &ConfigCommands, settings: Settings) -> CliResult<()> {
    match command {
        ConfigCommands::Show => output::info(&settings.to_toml()?),
        ConfigCommands::Template => output::info(&Settings::template()),
        ConfigCommands::Path => match global_config_path() {
            Some(path) => output::info(&path.display()),
            None => output::warning("cannot determine config directory"),
        },
    }
    Ok(())
}

#[instrument(level = "debug", skip(service))]
fn cmd_new(
    service: &RoadMapService,
    name: &str,
    id: Option<&str>,
    description: Option<String>,
) -> CliResult<()> {
    let id = id
        .map(str::to_string)
        .unwrap_or_else(|| uuid::Uuid::new_v4().simple().to_string());
    let map = service.create_map(&id, name, description)?;
    output::action("Created", &format!("{} ({})", map.name(), map.id()));
    Ok(())
}

#[instrument(level = "debug", skip(service))]
fn cmd_show(service: &RoadMapService, map_id: &str, topic: Option<&str>) -> CliResult<()> {
    let map = service.open(map_id)?;
    let node = match topic {
        Some(id) => map
            .get(id)
            .ok_or_else(|| DomainError::NodeNotFound(id.to_string()))
            .map_err(ApplicationError::from)?,
        None => map.root(),
    };
    if let Some(path) = map.tree().path_to(node.id()).filter(|p| p.len() > 1) {
        output::header(&path.join(" > "));
    } else {
        output::header(&format!("{} ({})", map.name(), map.id()));
    }
    output::info(&node.to_tree_string());
    Ok(())
}

#[instrument(level = "debug", skip(service))]
fn cmd_layers(service: &RoadMapService, map_id: &str) -> CliResult<()> {
    let map = service.open(map_id)?;
    for (level, nodes) in map.tree().layers() {
        output::header(&format!("level {}", level));
        output::detail(&nodes.iter().map(|n| n.name()).join(", "));
    }
    Ok(())
}

#[instrument(level = "debug", skip(service))]
fn cmd_export(service: &RoadMapService, map_id: &str, path: Option<&Path>) -> CliResult<()> {
    match path {
        Some(path) => {
            service.export(map_id, path)?;
            output::action("Exported", &path.display());
        }
        None => output::info(&codec::to_json(&service.open(map_id)?.to_dict())),
    }
    Ok(())
}

fn cmd_list(service: &RoadMapService) -> CliResult<()> {
    let maps = service.list()?;
    if maps.is_empty() {
        output::detail("no roadmaps");
    }
    for map in maps {
        output::info(&format!("{}\t{}\t{} topics", map.id, map.name, map.topics));
    }
    Ok(())
}

#[instrument(level = "debug", skip(service))]
fn cmd_feeds(service: &RoadMapService, map_id: &str) -> CliResult<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| InfraError::io("start async runtime", e))?;
    let items = runtime.block_on(service.feeds(map_id))?;

    for (topic, group) in &items.iter().chunk_by(|item| item.topic.as_str()) {
        output::header(topic);
        for item in group {
            let points = item.points.map(|p| format!(" [{}]", p)).unwrap_or_default();
            output::detail(&format!("{}{} {}", item.title, points, item.url));
        }
    }
    if items.is_empty() {
        output::detail("no news");
    }
    Ok(())
}
