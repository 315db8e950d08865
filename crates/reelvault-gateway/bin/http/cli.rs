use clap::{Parser, ValueEnum};
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;

pub const LISTEN_ADDR_ENV: &str = "REELVAULT_GATEWAY_LISTEN_ADDR";
pub const STORAGE_BACKEND_ENV: &str = "REELVAULT_STORAGE_BACKEND";
pub const MYSQL_DSN_ENV: &str = "REELVAULT_MYSQL_DSN";
pub const JWT_SECRET_ENV: &str = "REELVAULT_JWT_SECRET";
pub const CORS_ORIGIN_ENV: &str = "REELVAULT_CORS_ORIGIN";

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8080";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackendArg {
    #[value(name = "in-memory")]
    InMemory,
    #[value(name = "mysql")]
    Mysql,
}

impl Display for StorageBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackendArg::InMemory => write!(f, "in-memory"),
            StorageBackendArg::Mysql => write!(f, "mysql"),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "reelvault-gateway")]
pub struct CLI {
    #[arg(long, env = LISTEN_ADDR_ENV, default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: SocketAddr,

    #[arg(
        long,
        env = STORAGE_BACKEND_ENV,
        value_enum,
        default_value_t = StorageBackendArg::InMemory
    )]
    pub storage: StorageBackendArg,

    #[arg(long, env = MYSQL_DSN_ENV, required_if_eq("storage", "mysql"))]
    pub mysql_dsn: Option<String>,

    /// Shared secret for verifying bearer tokens minted by the
    /// credential service.
    #[arg(long, env = JWT_SECRET_ENV, hide_env_values = true)]
    pub jwt_secret: String,

    /// Browser origin allowed by CORS; permissive when unset.
    #[arg(long, env = CORS_ORIGIN_ENV)]
    pub cors_origin: Option<String>,
}
