pub const TEAMS: &str = "query Teams { teams { nodes { id name key } } }";

pub const TEAM_PROJECTS: &str = "query TeamProjects($teamId: String!) { team(id: $teamId) { projects { nodes { id name state description icon color } } } }";

pub const PROJECT_CREATE: &str = "mutation ProjectCreate($input: ProjectCreateInput!) { projectCreate(input: $input) { success project { id name state description icon color } } }";

pub const ISSUE_CREATE: &str = "mutation IssueCreate($input: IssueCreateInput!) { issueCreate(input: $input) { success issue { id identifier title url } } }";
