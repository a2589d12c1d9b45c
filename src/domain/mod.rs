//! Domain Layer - Core logic for swapdesk
//!
//! Pure, synchronous types and functions with no I/O. Async settlement and
//! price loading live behind the ports layer.
//!
//! - `balance`: wallet balances and ranked display rows
//! - `priority`: blockchain priority table
//! - `ranker`: filter/sort/value pipeline for balances
//! - `price`: price-feed records and snapshot table
//! - `quote`: USD-denominated conversion
//! - `form`: swap form state and field validation
//! - `wallet`: currency -> balance mapping mutated by swaps
//! - `swap`: swap requests and committed swap records

pub mod balance;
pub mod priority;
pub mod ranker;
pub mod price;
pub mod quote;
pub mod form;
pub mod wallet;
pub mod swap;

pub use balance::{Balance, Blockchain, BlockchainError, RankedBalance};
pub use priority::{PriorityTable, UNRANKED_PRIORITY};
pub use ranker::{rank_balances, BalanceRanker};
pub use price::{PriceTable, TokenPrice};
pub use quote::{calculate_swap, convert, quote, Conversion, QuoteError};
pub use form::{validate_form, FormField, SwapForm, ValidationErrors};
pub use wallet::{WalletBalances, WalletError};
pub use swap::{generate_transaction_id, SwapQuote, SwapRequest};
