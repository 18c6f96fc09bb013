use serde_json::json;

use crate::{
    error::{ErrorCode, Result},
    instructions::Context,
    ledger::simulate_ledger_entry,
    policy::{enforce, Operation},
    require,
    state::{LedgerEntry, LedgerEntryType, Role},
};

pub fn grant(ctx: &Context, user_id: &str, role: Role) -> Result<LedgerEntry> {
    role_change(ctx, LedgerEntryType::RoleGranted, user_id, role)
}

pub fn revoke(ctx: &Context, user_id: &str, role: Role) -> Result<LedgerEntry> {
    role_change(ctx, LedgerEntryType::RoleRevoked, user_id, role)
}

fn role_change(
    ctx: &Context,
    entry_type: LedgerEntryType,
    user_id: &str,
    role: Role,
) -> Result<LedgerEntry> {
    enforce(ctx.actor, Operation::ManageRoles)?;

    let user_id = user_id.trim();
    require!(!user_id.is_empty(), ErrorCode::BlankUserId);

    Ok(simulate_ledger_entry(
        entry_type,
        Some(user_id.to_string()),
        Some(&ctx.actor.id),
        json!({ "role": role }),
        ctx.now,
    ))
}
