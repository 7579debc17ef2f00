use shopkeep_db::{SeedDataset, SeedResult};

use crate::commands::{with_migrated_store, CommandResult};

pub fn run() -> CommandResult {
    let result = with_migrated_store("seed", |pool| async move {
        let seeded = SeedDataset::load(&pool)
            .await
            .map_err(|error| ("seed_execution", error.to_string(), 5u8))?;

        let verification = SeedDataset::verify(&pool)
            .await
            .map_err(|error| ("seed_verification", error.to_string(), 6u8))?;

        if !verification.all_present {
            let message = verification_failure_message(&verification.checks);
            return Err(("seed_verification", message, 6u8));
        }

        Ok(seeded)
    });

    match result {
        Ok(seeded) => CommandResult::success("seed", success_message(&seeded)),
        Err(failure) => failure,
    }
}

fn success_message(seeded: &SeedResult) -> String {
    let already_present = seeded.item_names.len() as u64 - seeded.inserted;
    format!(
        "demo inventory ready: {} inserted, {} already present ({})",
        seeded.inserted,
        already_present,
        seeded.item_names.join(", ")
    )
}

fn verification_failure_message(checks: &[(&str, bool)]) -> String {
    let failed_checks =
        checks.iter().filter_map(|(check, passed)| (!passed).then_some(*check)).collect::<Vec<_>>();

    if failed_checks.is_empty() {
        "Some seed data failed to load".to_string()
    } else {
        format!("Seed verification failed for items: {}", failed_checks.join(", "))
    }
}
