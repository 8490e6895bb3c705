//! teams / projects listing commands
use taskforge_core::api as core_api;
use taskforge_core::api::{CliError, Project, Team};

use crate::commands::cli::ProjectsArgs;

pub fn team_line(team: &Team) -> String {
    format!("{} (key: {}) {}", team.name, team.key, team.id)
}

pub fn project_line(project: &Project) -> String {
    match &project.state {
        Some(state) => format!("{} [{}] {}", project.name, state, project.id),
        None => format!("{} {}", project.name, project.id),
    }
}

pub async fn handle_teams(ctx: &core_api::AppContext) -> Result<i32, CliError> {
    let tracker = ctx.build_services()?.require_tracker()?;
    let teams = tracker
        .list_teams()
        .await
        .map_err(|e| CliError::upstream("tracker", e))?;

    if teams.is_empty() {
        println!("No teams found");
    }
    for team in &teams {
        println!("{}", team_line(team));
    }
    Ok(0)
}

pub async fn handle_projects(
    args: ProjectsArgs,
    ctx: &core_api::AppContext,
) -> Result<i32, CliError> {
    let tracker = ctx.build_services()?.require_tracker()?;
    let projects = tracker
        .list_projects(&args.team_id)
        .await
        .map_err(|e| CliError::upstream("tracker", e))?;

    if projects.is_empty() {
        println!("No projects found for team {}", args.team_id);
    }
    for project in &projects {
        println!("{}", project_line(project));
    }
    Ok(0)
}
