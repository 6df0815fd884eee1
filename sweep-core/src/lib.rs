pub mod batch;
pub mod cancel;
pub mod config;
pub mod error;
pub mod logging;
pub mod nmap;
pub mod parser;
pub mod paths;
pub mod report;
pub mod rules_engine;
pub mod types;

pub use batch::{scan_host, scan_hosts, BatchEvent, BatchOptions};
pub use cancel::{CancelHandle, CancelToken};
pub use error::{ConfigError, RulesError, ScanError, SkipReason};
pub use nmap::{NmapScanner, Scanner};
pub use rules_engine::CipherRules;
pub use types::{HostReport, ScanReport};
