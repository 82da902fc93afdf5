//! Repositories module - Coordinatore per tutti i repository del progetto
//!
//! Questo modulo organizza i repository in sotto-moduli separati per una migliore manutenibilità.
//! Ogni repository gestisce le operazioni di database per una specifica entità.

// ************************* NOTA SU SQLX ************************* //

/*
   Le query usano sqlx::query / query_as / query_scalar con i bind espliciti
   (controllo a run-time) invece delle macro query! / query_as!: le macro
   vogliono il database raggiungibile in fase di compilazione.
   Le entità derivano FromRow, quindi query_as::<_, Product>(...) fa già il parsing.
   Metodi da concatenare:
   .execute(..)         -> INSERT/UPDATE/DELETE, ritorna MySqlQueryResult (rows_affected)
   .fetch_optional(..)  -> zero o una riga
   .fetch_one(..)       -> esattamente una riga (aggregate come COUNT(*))
   .fetch_all(..)       -> Vec di righe
   Sempre .await? in modo che l'errore arrivi all'handler.

   Le letture passano dal pool. Le scritture dei prodotti NON vanno subito sul
   database: il repository le registra nel DbContext e diventano durevoli solo
   con UnitOfWork::save_changes.
*/

// ************************* MODULI REPOSITORY ************************* //

pub mod context;
#[cfg(test)]
pub mod fakes;
pub mod product;
pub mod traits;
pub mod transaction;
pub mod user;

// Re-esportazione dei trait per facilitare l'import
pub use traits::{ProductStore, UnitOfWork, UserStore};

// Re-esportazione delle struct dei repository per facilitare l'import
pub use context::{DbContext, PendingChange};
pub use product::ProductRepository;
pub use transaction::{MySqlDriver, TransactionDriver, TransactionSlot};
pub use user::UserRepository;
