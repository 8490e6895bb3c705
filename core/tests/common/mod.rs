use taskforge_core::api::{TaskParser, TaskRecord};

pub const STRUCTURED_OUTPUT: &str = include_str!("../fixtures/structured_output.txt");

pub fn parse_fixture() -> Vec<TaskRecord> {
    TaskParser::default().parse(STRUCTURED_OUTPUT)
}

pub fn find_by_title_prefix<'a>(tasks: &'a [TaskRecord], prefix: &str) -> Option<&'a TaskRecord> {
    tasks.iter().find(|t| t.title.starts_with(prefix))
}
