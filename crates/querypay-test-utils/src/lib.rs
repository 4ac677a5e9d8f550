pub mod helpers;
pub mod mock_wallet;

pub use helpers::*;
pub use mock_wallet::MockWallet;
