//! parse / interpret / create commands
use taskforge_core::api as core_api;
use taskforge_core::api::{
    CliError, CreatedIssue, PromptOptions, SubmitProgress, SubmitTarget, TaskRecord,
};

use crate::commands::cli::{CreateArgs, InterpretArgs, ParseArgs};
use crate::input;

fn to_pretty_json<T: serde::Serialize>(value: &T) -> Result<String, CliError> {
    serde_json::to_string_pretty(value).map_err(|e| CliError::Anyhow(e.into()))
}

/// One-line summary used by the text output and the confirmation preview.
pub fn task_line(index: usize, task: &TaskRecord) -> String {
    let mut line = format!("{:>2}. [{}] {}", index + 1, task.priority, task.title);
    if let Some(project) = &task.project {
        line.push_str(&format!("  (project: {project})"));
    }
    if !task.tags.is_empty() {
        line.push_str(&format!("  #{}", task.tags.join(" #")));
    }
    line
}

pub async fn handle_parse(args: ParseArgs, ctx: &core_api::AppContext) -> Result<i32, CliError> {
    let text = match &args.file {
        Some(path) => input::read_file(path).await?,
        None => input::read_stdin().await?,
    };

    let parser = ctx.parser();
    let tasks = parser.parse(&text);

    if args.inspect {
        let report = parser.inspect(&text);
        eprintln!(
            "grammar={} segments={} parsed={} dropped={:?}",
            report.grammar_version, report.segments, report.parsed, report.dropped
        );
    }

    println!("{}", to_pretty_json(&tasks)?);
    Ok(0)
}

pub async fn handle_interpret(
    args: InterpretArgs,
    ctx: &core_api::AppContext,
) -> Result<i32, CliError> {
    let text = input::read_request(&args.input).await?;
    let generator = ctx.build_services()?.require_generator()?;

    let out = core_api::interpret(
        generator.as_ref(),
        &ctx.parser(),
        &text,
        PromptOptions {
            with_project: args.with_project,
        },
    )
    .await
    .map_err(|e| CliError::upstream("generator", e))?;

    if args.json {
        println!("{}", to_pretty_json(&out)?);
        return Ok(0);
    }

    println!("{}\n", out.structured_text);
    if out.is_empty() {
        eprintln!("⚠️  No tasks found in the generated text");
        return Ok(0);
    }
    println!("Parsed {} task(s):", out.tasks.len());
    for (i, task) in out.tasks.iter().enumerate() {
        println!("{}", task_line(i, task));
    }
    Ok(0)
}

/// Prints one line per issue as the submission runs.
struct ConsoleProgress;

impl SubmitProgress for ConsoleProgress {
    fn on_start(&mut self, index: usize, total: usize, task: &TaskRecord) {
        println!("[{}/{}] {}", index + 1, total, task.title);
    }

    fn on_created(&mut self, _index: usize, issue: &CreatedIssue) {
        match &issue.identifier {
            Some(id) => println!("   ✅ {} {}", id, issue.url),
            None => println!("   ✅ {}", issue.url),
        }
    }

    fn on_failed(&mut self, _index: usize, error: &str) {
        println!("   ❌ {error}");
    }
}

pub async fn handle_create(args: CreateArgs, ctx: &core_api::AppContext) -> Result<i32, CliError> {
    let text = input::read_request(&args.input).await?;
    let services = ctx.build_services()?;
    let tracker = services.require_tracker()?;
    let generator = services.require_generator()?;

    let submit_cfg = &ctx.cfg().submit;
    let resolve_projects =
        args.project_id.is_none() && (args.resolve_projects || submit_cfg.resolve_projects);

    let out = core_api::interpret(
        generator.as_ref(),
        &ctx.parser(),
        &text,
        PromptOptions {
            with_project: resolve_projects,
        },
    )
    .await
    .map_err(|e| CliError::upstream("generator", e))?;

    if out.is_empty() {
        eprintln!("⚠️  No tasks found in the generated text:\n{}", out.structured_text);
        return Err(CliError::NothingParsed);
    }

    println!("Parsed {} task(s):", out.tasks.len());
    for (i, task) in out.tasks.iter().enumerate() {
        println!("{}", task_line(i, task));
    }

    if !args.yes {
        let question = format!("Create {} issue(s) in Linear?", out.tasks.len());
        if !input::confirm(&question).await? {
            println!("Cancelled, nothing was created.");
            return Ok(0);
        }
    }

    let target = SubmitTarget::team(args.team_id)
        .with_project(args.project_id)
        .resolving(resolve_projects, submit_cfg.default_project.clone());
    let report = core_api::submit_tasks_with_progress(
        tracker.as_ref(),
        &out.tasks,
        &target,
        &mut ConsoleProgress,
    )
    .await;

    println!(
        "\n{}/{} issue(s) created{}",
        report.succeeded(),
        report.total,
        if report.projects_created > 0 {
            format!(", {} project(s) created", report.projects_created)
        } else {
            String::new()
        }
    );
    if !report.failures.is_empty() {
        for f in &report.failures {
            eprintln!("failed #{} {}: {}", f.index + 1, f.title, f.error);
        }
        return Ok(30);
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskforge_core::api::Priority;

    #[test]
    fn task_line_includes_priority_project_and_tags() {
        let task = TaskRecord {
            title: "Build login".into(),
            description: String::new(),
            priority: Priority::High,
            tags: vec!["auth".into(), "frontend".into()],
            project: Some("App".into()),
            parent: None,
        };
        assert_eq!(
            task_line(0, &task),
            " 1. [high] Build login  (project: App)  #auth #frontend"
        );
    }
}
