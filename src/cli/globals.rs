use std::time::Duration;

#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub origins: Vec<String>,
    pub session_idle: Duration,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(origins: Vec<String>, session_idle_seconds: u64) -> Self {
        Self {
            origins,
            session_idle: Duration::from_secs(session_idle_seconds),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_args() {
        let args = GlobalArgs::new(vec!["http://localhost:3000".to_string()], 30);
        assert_eq!(args.origins, vec!["http://localhost:3000".to_string()]);
        assert_eq!(args.session_idle, Duration::from_secs(30));
    }
}
