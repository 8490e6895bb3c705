use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "taskforge",
    version,
    about = "Turn free-form requests into structured tasks and Linear issues"
)]
pub struct Args {
    /// Config file to use instead of ~/.taskforge/config.toml or ./config.toml.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Free-form request text, from exactly one source.
#[derive(ClapArgs, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct InputArgs {
    #[arg(long)]
    pub text: Option<String>,

    #[arg(long)]
    pub file: Option<PathBuf>,

    #[arg(long)]
    pub stdin: bool,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct ServeArgs {
    /// Overrides `http_server.host`.
    #[arg(long)]
    pub host: Option<String>,

    /// Overrides `http_server.port`.
    #[arg(long)]
    pub port: Option<u16>,

    #[arg(long)]
    pub session_id: Option<String>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct ParseArgs {
    /// Structured text file; stdin is read when omitted.
    #[arg(long, conflicts_with = "stdin")]
    pub file: Option<PathBuf>,

    #[arg(long)]
    pub stdin: bool,

    /// Print segment diagnostics to stderr.
    #[arg(long)]
    pub inspect: bool,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct InterpretArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Print a single JSON document instead of text.
    #[arg(long)]
    pub json: bool,

    /// Ask the generator for a project line per task.
    #[arg(long)]
    pub with_project: bool,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct CreateArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[arg(long)]
    pub team_id: String,

    /// Put every issue in this project.
    #[arg(long, conflicts_with = "resolve_projects")]
    pub project_id: Option<String>,

    /// Find or create each task's project by name.
    #[arg(long)]
    pub resolve_projects: bool,

    /// Skip the confirmation prompt.
    #[arg(long, short = 'y')]
    pub yes: bool,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct ProjectsArgs {
    #[arg(long)]
    pub team_id: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP API.
    Serve(ServeArgs),
    /// Parse structured task text and print the tasks as JSON.
    Parse(ParseArgs),
    /// Generate structured text from a request and parse it.
    Interpret(InterpretArgs),
    /// Generate, parse and create the tasks as Linear issues.
    Create(CreateArgs),
    /// List Linear teams.
    Teams,
    /// List a team's Linear projects.
    Projects(ProjectsArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_requires_one_input_source() {
        assert!(Args::try_parse_from(["taskforge", "create", "--team-id", "t"]).is_err());
        assert!(Args::try_parse_from([
            "taskforge", "create", "--team-id", "t", "--text", "a", "--stdin"
        ])
        .is_err());

        let args =
            Args::try_parse_from(["taskforge", "create", "--team-id", "t", "--text", "login", "-y"])
                .unwrap();
        match args.command {
            Commands::Create(c) => {
                assert_eq!(c.input.text.as_deref(), Some("login"));
                assert!(c.yes);
                assert!(!c.resolve_projects);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn project_id_conflicts_with_resolution() {
        assert!(Args::try_parse_from([
            "taskforge",
            "create",
            "--team-id",
            "t",
            "--text",
            "x",
            "--project-id",
            "p",
            "--resolve-projects"
        ])
        .is_err());
    }

    #[test]
    fn global_config_flag() {
        let args =
            Args::try_parse_from(["taskforge", "teams", "--config", "/tmp/tf.toml"]).unwrap();
        assert_eq!(args.config, Some(PathBuf::from("/tmp/tf.toml")));
        assert!(matches!(args.command, Commands::Teams));
    }

    #[test]
    fn parse_defaults_to_stdin() {
        let args = Args::try_parse_from(["taskforge", "parse"]).unwrap();
        match args.command {
            Commands::Parse(p) => assert!(p.file.is_none() && !p.stdin),
            other => panic!("unexpected command {other:?}"),
        }
    }
}
