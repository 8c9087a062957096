//! Runtime configuration from command-line flags and environment variables.

use clap::Parser;

use crate::middleware::UserContextLayer;
use crate::middleware::context::{
    DEFAULT_PATH_PREFIX, DEFAULT_USER_ID_HEADER, DEFAULT_VIP_LEVEL_HEADER,
    DEFAULT_WALLET_BALANCE_HEADER,
};

/// bizshop - shop service with request-scoped user context
#[derive(Parser, Debug, Clone)]
#[command(name = "bizshop")]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Host address to bind the server to
    #[arg(long, short = 'H', default_value = "0.0.0.0", env = "HOST")]
    pub host: String,

    /// Port to listen on
    #[arg(long, short, default_value_t = 3000, env = "PORT")]
    pub port: u16,

    /// Requests under this path get a user context
    #[arg(long, default_value = DEFAULT_PATH_PREFIX, env = "SHOPPING_PREFIX")]
    pub shopping_prefix: String,

    /// Header carrying the authenticated user id
    #[arg(long, default_value = DEFAULT_USER_ID_HEADER, env = "USER_ID_HEADER")]
    pub user_id_header: String,

    /// Header carrying the user's VIP level
    #[arg(long, default_value = DEFAULT_VIP_LEVEL_HEADER, env = "VIP_LEVEL_HEADER")]
    pub vip_level_header: String,

    /// Header carrying the user's wallet balance
    #[arg(long, default_value = DEFAULT_WALLET_BALANCE_HEADER, env = "WALLET_BALANCE_HEADER")]
    pub wallet_balance_header: String,
}

impl Config {
    /// `host:port`, bracketing IPv6 hosts.
    pub fn addr(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }

    pub fn context_layer(&self) -> UserContextLayer {
        UserContextLayer::new()
            .path_prefix(&self.shopping_prefix)
            .user_id_header(&self.user_id_header)
            .vip_level_header(&self.vip_level_header)
            .wallet_balance_header(&self.wallet_balance_header)
    }
}
