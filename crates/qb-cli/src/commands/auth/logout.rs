use qb_auth::SessionStore;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::output::output;

#[derive(Serialize)]
struct AuthLogoutResponse {
    cleared: bool,
}

pub fn handle(flags: &GlobalFlags, store: &SessionStore) -> anyhow::Result<()> {
    qb_auth::logout(store)?;
    output(&AuthLogoutResponse { cleared: true }, flags.format)
}
