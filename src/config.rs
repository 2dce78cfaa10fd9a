mod options;
mod server;

pub use self::options::Options;
pub use self::server::Server;

/// Serializes tests that change process-wide environment variables.
#[cfg(test)]
static ENV_MUTEX: std::sync::LazyLock<std::sync::Mutex<()>> =
    std::sync::LazyLock::new(|| std::sync::Mutex::new(()));
