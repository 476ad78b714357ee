pub mod server;

/// Actions the CLI can dispatch to
#[derive(Debug)]
pub enum Action {
    Server {
        port: u16,
        dsn: String,
        origins: Vec<String>,
        session_idle_seconds: u64,
    },
}
