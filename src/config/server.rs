use super::Options;
use static_or_continue_env_vars::var_parsed;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

const DEFAULT_PORT: u16 = 9999;

#[derive(Debug)]
pub struct Server {
    pub ip: IpAddr,
    pub port: u16,
    pub static_files: Options,
}

impl Server {
    /// Reads the server configuration from the environment.
    ///
    /// - `IP`: address to bind to, defaults to `127.0.0.1`.
    /// - `PORT`: port to listen on, defaults to `9999`.
    ///
    /// The static file options are read by [`Options::from_environment`].
    pub fn from_environment() -> anyhow::Result<Self> {
        let ip = var_parsed("IP")?.unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST));
        let port = var_parsed("PORT")?.unwrap_or(DEFAULT_PORT);

        Ok(Server {
            ip,
            port,
            static_files: Options::from_environment()?,
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.ip, self.port)
    }
}
