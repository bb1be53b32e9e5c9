//! Trait definitions (hexagonal ports). Depend only on domain.

pub mod outbound;

pub use outbound::chain::{ChainReader, MarketMakerSeed};
pub use outbound::offchain::{IndexerStatus, RelayInfo, RelayInfoSource, SafeTransactionService};
pub use outbound::provider::WalletProvider;
pub use outbound::proxy::{ProxyExecutor, ProxyMode};
