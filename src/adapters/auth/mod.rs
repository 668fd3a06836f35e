//! Authentication adapters.
//!
//! Implementations of the `AuthBackend` port:
//!
//! - `supabase` - Supabase GoTrue over REST
//! - `in_memory` - Accounts and session held in memory, for tests and local runs
//! - `notifier` - Broadcast fan-out of session changes shared by both

mod in_memory;
mod notifier;
mod supabase;

pub use in_memory::InMemoryAuthBackend;
pub use notifier::AuthStateNotifier;
pub use supabase::{SupabaseAuthClient, SupabaseAuthConfig};
