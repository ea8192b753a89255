pub use web3::types::{Address, H256, U256, U64};

pub use serde::{Deserialize, Serialize};

pub use chain::{ChainClient, ChainConfig};
pub use config::{Config, ConfigInstance};
pub use ipfs::{IpfsClient, IpfsConfig};
pub use types::{AllowanceState, Amount, AvailableTasks, TaskId, TaskRecord, TaskStatus};

pub mod chain;
pub mod config;
pub mod error;
pub mod ipfs;
pub mod types;
pub mod utils;

pub use error::{Error, Result};
