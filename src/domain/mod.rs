mod expr;
mod ledger;
mod money;
mod transaction;

pub use expr::*;
pub use ledger::*;
pub use money::*;
pub use transaction::*;
