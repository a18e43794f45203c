pub mod time;

/// Generate a url-safe unique id for executions and history entries.
pub fn longid() -> String {
    nanoid::nanoid!()
}

/// Generate a random UUID v4 for workflow and step definitions.
pub fn uuid() -> String {
    uuid::Uuid::new_v4().to_string()
}
