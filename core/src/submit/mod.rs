//! Sequential issue creation for a batch of parsed tasks.

mod resolve;

pub use resolve::ProjectResolver;

use serde::Serialize;

use crate::task::TaskRecord;
use crate::tracker::{CreatedIssue, IssueDraft, IssueTracker};

pub const DEFAULT_PROJECT_NAME: &str = "General";

#[derive(Debug, Clone)]
pub struct SubmitTarget {
    pub team_id: String,
    /// Fixed project for every issue; wins over per-task resolution.
    pub project_id: Option<String>,
    pub resolve_projects: bool,
    pub default_project: String,
}

impl SubmitTarget {
    pub fn team(team_id: impl Into<String>) -> Self {
        Self {
            team_id: team_id.into(),
            project_id: None,
            resolve_projects: false,
            default_project: DEFAULT_PROJECT_NAME.to_string(),
        }
    }

    pub fn with_project(mut self, project_id: Option<String>) -> Self {
        self.project_id = project_id.filter(|p| !p.trim().is_empty());
        self
    }

    pub fn resolving(mut self, resolve: bool, default_project: impl Into<String>) -> Self {
        self.resolve_projects = resolve;
        self.default_project = default_project.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionFailure {
    pub index: usize,
    pub title: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SubmissionReport {
    pub total: usize,
    pub created: Vec<CreatedIssue>,
    pub failures: Vec<SubmissionFailure>,
    pub projects_created: usize,
}

impl SubmissionReport {
    pub fn succeeded(&self) -> usize {
        self.created.len()
    }

    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty() && self.created.len() == self.total
    }
}

/// Observer for per-task progress, used by the CLI to print as it goes.
pub trait SubmitProgress: Send {
    fn on_start(&mut self, _index: usize, _total: usize, _task: &TaskRecord) {}
    fn on_created(&mut self, _index: usize, _issue: &CreatedIssue) {}
    fn on_failed(&mut self, _index: usize, _error: &str) {}
}

pub struct NoProgress;

impl SubmitProgress for NoProgress {}

/// Creates one issue per task, in order, one call at a time. A failure is
/// recorded and the loop moves on; earlier issues are never rolled back.
pub async fn submit_tasks(
    tracker: &dyn IssueTracker,
    tasks: &[TaskRecord],
    target: &SubmitTarget,
) -> SubmissionReport {
    submit_tasks_with_progress(tracker, tasks, target, &mut NoProgress).await
}

pub async fn submit_tasks_with_progress(
    tracker: &dyn IssueTracker,
    tasks: &[TaskRecord],
    target: &SubmitTarget,
    progress: &mut dyn SubmitProgress,
) -> SubmissionReport {
    let mut report = SubmissionReport {
        total: tasks.len(),
        ..Default::default()
    };
    let mut resolver = (target.project_id.is_none() && target.resolve_projects)
        .then(|| ProjectResolver::new(tracker, target.team_id.clone()));

    for (index, task) in tasks.iter().enumerate() {
        progress.on_start(index, tasks.len(), task);

        let project_id = match (&target.project_id, resolver.as_mut()) {
            (Some(id), _) => Some(id.clone()),
            (None, Some(r)) => {
                let name = task.project.as_deref().unwrap_or(&target.default_project);
                r.resolve(name).await
            }
            (None, None) => None,
        };

        let draft = IssueDraft::from_task(task, &target.team_id, project_id);
        match tracker.create_issue(draft).await {
            Ok(issue) => {
                tracing::info!(
                    target: "taskforge.submit",
                    index,
                    issue_id = %issue.id,
                    url = %issue.url,
                    "issue created"
                );
                progress.on_created(index, &issue);
                report.created.push(issue);
            }
            Err(e) => {
                let error = e.to_string();
                tracing::warn!(
                    target: "taskforge.submit",
                    index,
                    title = %task.title,
                    error = %error,
                    "issue creation failed"
                );
                progress.on_failed(index, &error);
                report.failures.push(SubmissionFailure {
                    index,
                    title: task.title.clone(),
                    error,
                });
            }
        }
    }

    report.projects_created = resolver.map(|r| r.created_count()).unwrap_or(0);
    tracing::info!(
        target: "taskforge.submit",
        total = report.total,
        succeeded = report.succeeded(),
        failed = report.failures.len(),
        "submission finished"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Priority;
    use crate::tracker::{Project, Team};
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockTracker {
        fail_titles: Vec<String>,
        existing: Vec<Project>,
        fail_list: bool,
        drafts: Mutex<Vec<IssueDraft>>,
        created_projects: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl IssueTracker for MockTracker {
        fn name(&self) -> &str {
            "mock"
        }

        async fn list_teams(&self) -> anyhow::Result<Vec<Team>> {
            Ok(vec![])
        }

        async fn list_projects(&self, _team_id: &str) -> anyhow::Result<Vec<Project>> {
            if self.fail_list {
                anyhow::bail!("list failed")
            }
            Ok(self.existing.clone())
        }

        async fn create_project(&self, name: &str, _team_id: &str) -> anyhow::Result<Project> {
            let mut created = self.created_projects.lock().unwrap();
            created.push(name.to_string());
            Ok(Project {
                id: format!("new-{}", created.len()),
                name: name.to_string(),
                state: None,
                description: None,
                icon: None,
                color: None,
            })
        }

        async fn create_issue(&self, draft: IssueDraft) -> anyhow::Result<CreatedIssue> {
            if self.fail_titles.contains(&draft.title) {
                anyhow::bail!("rejected {}", draft.title)
            }
            let mut drafts = self.drafts.lock().unwrap();
            drafts.push(draft.clone());
            Ok(CreatedIssue {
                id: format!("id-{}", drafts.len()),
                identifier: Some(format!("ENG-{}", drafts.len())),
                title: draft.title,
                url: format!("https://linear.app/i/{}", drafts.len()),
            })
        }
    }

    fn task(title: &str, project: Option<&str>) -> TaskRecord {
        TaskRecord {
            title: title.into(),
            description: format!("{title} desc"),
            priority: Priority::High,
            tags: vec![],
            project: project.map(str::to_string),
            parent: None,
        }
    }

    fn project(id: &str, name: &str) -> Project {
        Project {
            id: id.into(),
            name: name.into(),
            state: None,
            description: None,
            icon: None,
            color: None,
        }
    }

    #[tokio::test]
    async fn creates_in_order_and_continues_after_failure() {
        let tracker = MockTracker {
            fail_titles: vec!["B".into()],
            ..Default::default()
        };
        let tasks = vec![task("A", None), task("B", None), task("C", None)];
        let report = submit_tasks(&tracker, &tasks, &SubmitTarget::team("team")).await;

        assert_eq!(report.total, 3);
        assert_eq!(report.succeeded(), 2);
        assert!(!report.all_succeeded());
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].index, 1);
        assert!(report.failures[0].error.contains("rejected B"));

        let drafts = tracker.drafts.lock().unwrap();
        let titles: Vec<&str> = drafts.iter().map(|d| d.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "C"]);
        assert!(drafts.iter().all(|d| d.priority == 3 && d.project_id.is_none()));
    }

    #[tokio::test]
    async fn fixed_project_applies_to_every_issue() {
        let tracker = MockTracker::default();
        let target = SubmitTarget::team("team")
            .with_project(Some("p1".into()))
            .resolving(true, "General");
        let report = submit_tasks(&tracker, &[task("A", Some("Other"))], &target).await;

        assert!(report.all_succeeded());
        assert_eq!(
            tracker.drafts.lock().unwrap()[0].project_id.as_deref(),
            Some("p1")
        );
        assert!(tracker.created_projects.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn resolves_existing_and_creates_missing_projects_once() {
        let tracker = MockTracker {
            existing: vec![project("p-api", "Backend API")],
            ..Default::default()
        };
        let tasks = vec![
            task("A", Some("Backend API")),
            task("B", Some("App Mobile")),
            task("C", Some("App Mobile")),
            task("D", None),
        ];
        let target = SubmitTarget::team("team").resolving(true, "General");
        let report = submit_tasks(&tracker, &tasks, &target).await;

        assert_eq!(report.succeeded(), 4);
        assert_eq!(report.projects_created, 2);
        assert_eq!(
            *tracker.created_projects.lock().unwrap(),
            vec!["App Mobile".to_string(), "General".to_string()]
        );
        let ids: Vec<Option<String>> = tracker
            .drafts
            .lock()
            .unwrap()
            .iter()
            .map(|d| d.project_id.clone())
            .collect();
        assert_eq!(
            ids,
            vec![
                Some("p-api".to_string()),
                Some("new-1".to_string()),
                Some("new-1".to_string()),
                Some("new-2".to_string())
            ]
        );
    }

    #[tokio::test]
    async fn listing_failure_degrades_to_creation() {
        let tracker = MockTracker {
            fail_list: true,
            ..Default::default()
        };
        let target = SubmitTarget::team("team").resolving(true, "General");
        let report = submit_tasks(&tracker, &[task("A", Some("X"))], &target).await;
        assert!(report.all_succeeded());
        assert_eq!(*tracker.created_projects.lock().unwrap(), vec!["X".to_string()]);
    }

    #[tokio::test]
    async fn empty_blank_project_id_is_ignored() {
        let target = SubmitTarget::team("team").with_project(Some("  ".into()));
        assert!(target.project_id.is_none());
    }

    #[tokio::test]
    async fn progress_sees_every_task() {
        #[derive(Default)]
        struct Recorder(Vec<String>);
        impl SubmitProgress for Recorder {
            fn on_start(&mut self, index: usize, total: usize, task: &TaskRecord) {
                self.0.push(format!("start {index}/{total} {}", task.title));
            }
            fn on_created(&mut self, index: usize, issue: &CreatedIssue) {
                self.0.push(format!("ok {index} {}", issue.id));
            }
            fn on_failed(&mut self, index: usize, _error: &str) {
                self.0.push(format!("fail {index}"));
            }
        }

        let tracker = MockTracker {
            fail_titles: vec!["B".into()],
            ..Default::default()
        };
        let mut rec = Recorder::default();
        submit_tasks_with_progress(
            &tracker,
            &[task("A", None), task("B", None)],
            &SubmitTarget::team("t"),
            &mut rec,
        )
        .await;
        assert_eq!(
            rec.0,
            vec!["start 0/2 A", "ok 0 id-1", "start 1/2 B", "fail 1"]
        );
    }
}
