//! The `quizscan delete-student` command.

use anyhow::{Context, Result};

use quizscan_core::traits::RecordStore;

use super::{open_session, GlobalOpts};

pub async fn execute(opts: &GlobalOpts, id: String) -> Result<()> {
    let session = open_session(opts).await?;
    let student = session
        .gradebook
        .store()
        .get_student(&id)
        .await?
        .with_context(|| format!("no student with id '{id}'"))?;

    let removed = session.gradebook.delete_student(&student.id).await?;
    println!(
        "Deleted {} and {removed} quiz record(s)",
        student.name
    );
    Ok(())
}
