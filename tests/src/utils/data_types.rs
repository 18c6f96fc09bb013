use chrono::{DateTime, Utc};
use civic_ledger::{ActorId, Role};

use crate::utils::send_utils::InMemoryLedger;

pub struct LedgerTestContext {
    pub ledger: InMemoryLedger,
    pub admin: ActorId,
    pub voters: Vec<ActorId>,
    pub petitioners: Vec<ActorId>,
}

/// Fresh ledger at `now` with one bootstrapped admin and granted voters and
/// petitioners.
pub fn setup_context(now: DateTime<Utc>, voters: usize, petitioners: usize) -> LedgerTestContext {
    let mut ledger = InMemoryLedger::new(now);
    let admin = "admin".to_string();
    ledger.bootstrap_admin(&admin);

    let voters: Vec<ActorId> = (0..voters).map(|i| format!("voter-{i}")).collect();
    let petitioners: Vec<ActorId> = (0..petitioners).map(|i| format!("petitioner-{i}")).collect();
    for voter in &voters {
        ledger.send_grant_role(&admin, voter, Role::Voter).unwrap();
    }
    for petitioner in &petitioners {
        ledger.send_grant_role(&admin, petitioner, Role::Petitioner).unwrap();
    }

    LedgerTestContext {
        ledger,
        admin,
        voters,
        petitioners,
    }
}
